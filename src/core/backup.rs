use crate::db::log::ttlog_quiet;
use crate::errors::{AppError, AppResult};
use crate::export::ensure_writable;
use crate::ui::messages::{success, warning};
use rusqlite::Connection;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the database to `dest_file`; with `compress` the copy is
    /// replaced by a `.zip` next to it. Returns the path actually written.
    pub fn backup(db_path: &str, dest_file: &str, compress: bool, force: bool) -> AppResult<PathBuf> {
        let src = Path::new(db_path);
        let dest = Path::new(dest_file);

        if !src.is_file() {
            return Err(AppError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Database not found: {}", src.display()),
            )));
        }
        if !dest.is_absolute() {
            return Err(AppError::Other(format!(
                "Backup path must be absolute: {}",
                dest.display()
            )));
        }

        if let Some(dir) = dest.parent() {
            fs::create_dir_all(dir)?;
        }
        ensure_writable(dest, force)?;

        fs::copy(src, dest)?;

        let written = if compress {
            let archive = zip_single_file(dest)?;
            if let Err(e) = fs::remove_file(dest) {
                warning(format!("Uncompressed copy left in place: {e}"));
            }
            archive
        } else {
            dest.to_path_buf()
        };

        success(format!("Backup created: {}", written.display()));

        let conn = Connection::open(src)?;
        ttlog_quiet(
            &conn,
            "backup",
            &written.to_string_lossy(),
            if compress { "zip archive" } else { "plain copy" },
        );

        Ok(written)
    }
}

/// `<name>.zip` beside `path`, holding `path` as its only entry.
fn zip_single_file(path: &Path) -> AppResult<PathBuf> {
    let archive = path.with_extension("zip");
    let entry = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "rollbook.sqlite".into());

    let mut zip = ZipWriter::new(File::create(&archive)?);
    zip.start_file(
        entry,
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated),
    )
    .map_err(io::Error::other)?;
    io::copy(&mut File::open(path)?, &mut zip)?;
    zip.finish().map_err(io::Error::other)?;

    Ok(archive)
}
