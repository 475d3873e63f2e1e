use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::{pending_migrations, run_pending_migrations};
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

/// `db`: maintenance steps, run in a fixed order (migrate, info, check,
/// vacuum) over a single connection.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        migrate,
        check,
        vacuum,
        info: show_info,
    } = cmd
    else {
        return Ok(());
    };

    let mut pool = DbPool::new(&cfg.database)?;

    if *migrate {
        match run_pending_migrations(&pool.conn)?.len() {
            0 => info("Schema already up to date."),
            n => success(format!("Migration completed ({n} applied).")),
        }
    }

    if *show_info {
        stats::print_db_info(&mut pool, &cfg.database)?;
    }

    if *check {
        let problems = stats::integrity_problems(&pool.conn)?;
        if problems.is_empty() {
            success("Integrity check passed.");
        } else {
            warning(format!("Integrity check failed: {}", problems.join("; ")));
        }

        let pending = pending_migrations(&pool.conn)?;
        if pending.is_empty() {
            success("No pending migrations.");
        } else {
            warning(format!("Pending migrations: {}", pending.join(", ")));
        }
    }

    if *vacuum {
        pool.conn.execute_batch("VACUUM;")?;
        success("Vacuum completed.");
    }

    Ok(())
}
