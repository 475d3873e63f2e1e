use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::utils::date::parse_month;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        month,
        format,
        file,
        force,
    } = cmd
    {
        let (year, month) = parse_month(month)?;
        let pool = super::open_db(cfg)?;
        ExportLogic::export(
            &pool.conn,
            month,
            year,
            &cfg.academic_year,
            *format,
            file,
            *force,
        )?;
    }
    Ok(())
}
