use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log::ttlog_quiet;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, success};
use rusqlite::Connection;

/// `init`: config directory, config file (not in test mode), database file
/// and schema.
pub fn handle(cli: &Cli) -> AppResult<()> {
    header("rollbook setup");

    let db_path = Config::init_all(cli.db.clone(), cli.test)?;
    let shown = db_path.display().to_string();

    let conn = Connection::open(&db_path)?;
    match init_db(&conn)? {
        0 => info("Schema already current."),
        n => info(format!("{n} migrations applied.")),
    }

    ttlog_quiet(&conn, "init", &shown, "Database initialized");
    success(format!("Database initialized at {shown}"));
    Ok(())
}
