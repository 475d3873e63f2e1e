//! The `log` table: audit lines written by every command that changes
//! data, plus the `migration_applied` markers used by the migrator.

use crate::errors::AppResult;
use crate::ui::messages::warning;
use chrono::Local;
use rusqlite::{Connection, params};

#[derive(Debug, Clone)]
pub struct LogRow {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message) VALUES (?1, ?2, ?3, ?4)",
    )?
    .execute(params![Local::now().to_rfc3339(), operation, target, message])?;
    Ok(())
}

/// `ttlog` for callers whose own work already succeeded: a failed audit
/// line is reported, not returned.
pub fn ttlog_quiet(conn: &Connection, operation: &str, target: &str, message: &str) {
    if let Err(e) = ttlog(conn, operation, target, message) {
        warning(format!("Audit line '{}' not written: {}", operation, e));
    }
}

/// Oldest first. `operation_prefix` keeps e.g. both import kinds with "import".
pub fn read_log(conn: &Connection, operation_prefix: Option<&str>) -> AppResult<Vec<LogRow>> {
    let pattern = format!("{}%", operation_prefix.unwrap_or_default());

    let mut stmt = conn.prepare_cached(
        "SELECT id, date, operation, COALESCE(target, ''), message
         FROM log
         WHERE operation LIKE ?1
         ORDER BY id",
    )?;
    let rows = stmt.query_map([pattern], |r| {
        Ok(LogRow {
            id: r.get(0)?,
            date: r.get(1)?,
            operation: r.get(2)?,
            target: r.get(3)?,
            message: r.get(4)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
