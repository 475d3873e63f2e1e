use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::errors::AppResult;
use crate::ui::messages::warning;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Log { print, operation } = cmd else {
        return Ok(());
    };

    if !print {
        warning("Nothing to do: pass --print.");
        return Ok(());
    }

    let pool = super::open_db(cfg)?;
    LogLogic::print_log(&pool, operation.as_deref())
}
