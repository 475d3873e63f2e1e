use crate::db::log::ttlog_quiet;
use crate::db::summaries;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{MatriculaReport, SummaryExport};
use crate::export::xlsx::export_xlsx;
use crate::ui::messages::{info, success, warning};
use chrono::Local;
use rusqlite::Connection;
use std::path::Path;

/// High-level logic for the `export` command.
pub struct ExportLogic;

impl ExportLogic {
    /// Export the stored summaries of one month.
    ///
    /// Returns the number of grade rows written (0 when the month has no
    /// summaries; nothing is written then).
    pub fn export(
        conn: &Connection,
        month: u32,
        year: i32,
        academic_year: &str,
        format: ExportFormat,
        file: &str,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        let stored = summaries::list_month(conn, month, year)?;

        if stored.is_empty() {
            warning(format!(
                "No summaries stored for {:04}-{:02}. Run `summary --month {:04}-{:02}` first.",
                year, month, year, month
            ));
            return Ok(0);
        }

        ensure_writable(path, force)?;

        let rows: Vec<SummaryExport> = stored.iter().map(SummaryExport::from).collect();
        info(format!("Exporting to {format}: {}", path.display()));

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => {
                let total_students = stored.iter().map(|s| s.total_students).sum();
                let average_attendance = stored
                    .iter()
                    .map(|s| s.attendance_percentage)
                    .sum::<f64>()
                    / stored.len() as f64;

                let report = MatriculaReport {
                    month,
                    year,
                    academic_year: academic_year.to_string(),
                    generated_at: Local::now().to_rfc3339(),
                    total_students,
                    average_attendance: (average_attendance * 100.0).round() / 100.0,
                    data: rows.clone(),
                };
                export_json(&report, path)?
            }
            ExportFormat::Xlsx => {
                export_xlsx(&rows, &format!("Matricula {:04}-{:02}", year, month), path)?
            }
        }

        ttlog_quiet(
            conn,
            "export",
            file,
            &format!(
                "{} rows for {:04}-{:02} as {}",
                rows.len(),
                year,
                month,
                format
            ),
        );
        success(format!("{format} export completed: {}", path.display()));

        Ok(rows.len())
    }
}
