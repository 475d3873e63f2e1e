use crate::db::migrate::run_pending_migrations;
use crate::errors::AppResult;
use rusqlite::Connection;

/// Bring a database (new or existing) to the current schema and return how
/// many migrations were applied. Tables are only ever created by migrations.
pub fn init_db(conn: &Connection) -> AppResult<usize> {
    conn.pragma_update(None, "foreign_keys", true)?;
    Ok(run_pending_migrations(conn)?.len())
}
