use crate::errors::{AppError, AppResult};
use crate::export::{MatriculaReport, SummaryExport};
use std::fs;
use std::path::Path;

/// Pretty-printed JSON document.
pub(crate) fn export_json(report: &MatriculaReport, path: &Path) -> AppResult<()> {
    let body = serde_json::to_string_pretty(report)
        .map_err(|e| AppError::Export(format!("JSON serialization error: {e}")))?;
    fs::write(path, body)?;
    Ok(())
}

/// CSV; the header row comes from the serde renames on `SummaryExport`.
pub(crate) fn export_csv(rows: &[SummaryExport], path: &Path) -> AppResult<()> {
    let csv_err = |e: csv::Error| AppError::Export(format!("CSV write error: {e}"));

    let mut wtr = csv::Writer::from_path(path).map_err(csv_err)?;
    rows.iter().try_for_each(|row| wtr.serialize(row).map_err(csv_err))?;
    wtr.flush()?;
    Ok(())
}
