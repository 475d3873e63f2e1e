//! rollbook library root.
//! Exposes the CLI parser, the high-level run() function and the import,
//! attendance and summary modules behind it.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod spreadsheet;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    use cli::commands as cmd;

    match &cli.command {
        Commands::Init => cmd::init::handle(cli),
        Commands::Config { .. } => cmd::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cmd::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cmd::log::handle(&cli.command, cfg),
        Commands::Backup { .. } => cmd::backup::handle(&cli.command, cfg),
        Commands::Import { .. } => cmd::import::handle(&cli.command, cfg),
        Commands::Refs { .. } => cmd::refs::handle(&cli.command, cfg),
        Commands::Timetable { .. } => cmd::timetable::handle(&cli.command, cfg),
        Commands::Attendance { .. } => cmd::attendance::handle(&cli.command, cfg),
        Commands::Summary { .. } => cmd::summary::handle(&cli.command, cfg),
        Commands::Alerts { .. } => cmd::alerts::handle(&cli.command, cfg),
        Commands::Export { .. } => cmd::export::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if let Some(year) = &cli.academic_year {
        cfg.academic_year = year.clone();
    }

    // init and config must stay usable with a broken configuration
    if !matches!(cli.command, Commands::Init | Commands::Config { .. }) {
        cfg.validate()?;
    }

    dispatch(&cli, &cfg)
}
