use crate::cli::parser::{Commands, ImportKind};
use crate::config::Config;
use crate::core::aliases::AliasTable;
use crate::core::import_roster::{RosterImportOptions, default_enrollment_date, import_roster};
use crate::core::import_schedule::{ScheduleImportOptions, import_schedule};
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::date::parse_date_arg;
use crate::utils::path::expand_tilde;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Import { kind } = cmd else {
        return Ok(());
    };

    let pool = super::open_db(cfg)?;

    match kind {
        ImportKind::Roster {
            file,
            sheet,
            skip_rows,
            enrollment_date,
        } => {
            let enrollment_date = match enrollment_date {
                Some(d) => parse_date_arg(d)?,
                None => default_enrollment_date(&cfg.academic_year)?,
            };

            let opts = RosterImportOptions {
                sheet: sheet.clone(),
                skip_rows: skip_rows.unwrap_or(cfg.roster_skip_rows),
                enrollment_date,
                academic_year: cfg.academic_year.clone(),
                batch_size: cfg.commit_batch_size,
                section_capacity: cfg.default_section_capacity,
            };

            let path = expand_tilde(file);
            info(format!(
                "Importing roster from {} ({})",
                path.display(),
                cfg.academic_year
            ));

            let report = import_roster(&pool.conn, &path, &opts)?;
            super::print_report("Roster import", &report);
        }

        ImportKind::Schedule {
            file,
            sheet,
            section,
            header_rows,
        } => {
            let aliases = AliasTable::load(&cfg.aliases_path())?;

            let opts = ScheduleImportOptions {
                sheet: sheet.clone(),
                section: section.clone(),
                header_rows: header_rows.unwrap_or(cfg.schedule_header_rows),
                academic_year: cfg.academic_year.clone(),
                tenant_id: cfg.tenant_id,
                batch_size: cfg.commit_batch_size,
            };

            let path = expand_tilde(file);
            info(format!(
                "Importing timetable for '{}' from {} ({})",
                section,
                path.display(),
                cfg.academic_year
            ));

            let report = import_schedule(&pool.conn, &path, &opts, &aliases)?;
            super::print_report("Schedule import", &report);
        }
    }

    Ok(())
}
