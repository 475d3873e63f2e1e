use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, warning};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Refuse to clobber an existing file unless `force` is set or the
/// operator confirms on stdin.
pub fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    ensure_writable_with(path, force, &mut io::stdin().lock())
}

/// Same as [`ensure_writable`] with the confirmation read from `answers`.
pub fn ensure_writable_with(path: &Path, force: bool, answers: &mut impl BufRead) -> AppResult<()> {
    if force || !path.exists() {
        return Ok(());
    }

    warning(format!("'{}' already exists.", path.display()));
    print!("Overwrite? [y/N]: ");
    io::stdout().flush()?;

    let mut line = String::new();
    answers.read_line(&mut line)?;

    if matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
        info("Overwriting.");
        return Ok(());
    }

    Err(AppError::Export(format!(
        "cancelled, '{}' left untouched",
        path.display()
    )))
}
