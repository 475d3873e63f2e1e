//! Application error type shared by every layer. `main` prints it once and
//! exits non-zero; row-level problems during imports are skips, not errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    /// Workbook could not be opened or decoded.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Sheet '{0}' not found in workbook")]
    SheetNotFound(String),

    #[error("Required column '{0}' not found in sheet header")]
    MissingColumn(String),

    /// Fatal for a schedule import: nothing has been written yet.
    #[error("Section '{0}' not found or inactive; import aborted before any write")]
    SectionNotFound(String),

    #[error("Student {0} not found")]
    StudentNotFound(i64),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),
    #[error("Invalid time format: {0}")]
    InvalidTime(String),
    #[error("Invalid month: {0} (expected YYYY-MM)")]
    InvalidMonth(String),
    #[error("Invalid grade level: {0} (expected 0-11)")]
    InvalidGrade(i64),
    #[error("Invalid academic year: {0} (expected YYYY-YYYY)")]
    InvalidAcademicYear(String),

    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Failed to load configuration: {0}")]
    ConfigLoad(String),
    #[error("Failed to save configuration")]
    ConfigSave,

    #[error("Export error: {0}")]
    Export(String),

    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
