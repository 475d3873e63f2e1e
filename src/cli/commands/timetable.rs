use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::resolver::resolve_section_by_name;
use crate::db::assignments::list_for_section;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Timetable { section } = cmd {
        let pool = super::open_db(cfg)?;
        let section_id = resolve_section_by_name(&pool.conn, section, &cfg.academic_year)?;
        let rows = list_for_section(&pool.conn, section_id, &cfg.academic_year)?;

        header(format!("Timetable {} ({})", section, cfg.academic_year));

        if rows.is_empty() {
            info("No assignments stored for this section.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::left("DAY"),
            Column::left("START"),
            Column::left("END"),
            Column::left("SUBJECT"),
            Column::left("TEACHER"),
            Column::left("CLASSROOM"),
        ]);
        for r in rows {
            table.add_row(vec![
                r.day.to_db_str().to_string(),
                r.start_time,
                r.end_time,
                r.subject,
                r.teacher,
                r.classroom,
            ]);
        }
        print!("{}", table.render());
    }

    Ok(())
}
