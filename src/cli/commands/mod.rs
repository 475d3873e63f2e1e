pub mod alerts;
pub mod attendance;
pub mod backup;
pub mod config;
pub mod db;
pub mod export;
pub mod import;
pub mod init;
pub mod log;
pub mod refs;
pub mod summary;
pub mod timetable;

use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::report::ImportReport;
use crate::ui::messages::{info, skipped, success, warning};

/// Open the configured database and bring its schema up to date.
pub(crate) fn open_db(cfg: &Config) -> AppResult<DbPool> {
    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;
    Ok(pool)
}

/// Print the outcome of an import run.
pub(crate) fn print_report(label: &str, report: &ImportReport) {
    for w in &report.warnings {
        skipped(w);
    }

    success(format!(
        "{label}: {} imported, {} updated, {} skipped",
        report.imported, report.updated, report.skipped
    ));
    if report.empty > 0 {
        info(format!("{} empty or break cells", report.empty));
    }
    if report.processed() == 0 {
        warning("Nothing was imported.");
    }
}
