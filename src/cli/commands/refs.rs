use crate::cli::parser::{Commands, RefKind, RefsAction};
use crate::config::Config;
use crate::core::normalizer::normalize_section_letter;
use crate::core::resolver::section_display_name;
use crate::db::log::ttlog_quiet;
use crate::db::reference;
use crate::errors::{AppError, AppResult};
use crate::models::section_letter::SectionLetter;
use crate::ui::messages::{info, success, warning};
use crate::utils::table::{Column, Table};
use crate::utils::time::parse_clock;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Refs { action } = cmd else {
        return Ok(());
    };

    let pool = super::open_db(cfg)?;
    let conn = &pool.conn;
    let year = cfg.academic_year.as_str();

    match action {
        RefsAction::List { kind } => print_list(conn, *kind, year)?,

        RefsAction::AddTeacher { name } => {
            let id = reference::insert_teacher(conn, name, year)?;
            ttlog_quiet(conn, "refs_teacher", name, &format!("id={id} ({year})"));
            success(format!("Teacher #{id} added: {}", name.trim()));
        }

        RefsAction::AddSubject { name } => {
            let id = reference::insert_subject(conn, name, year)?;
            ttlog_quiet(conn, "refs_subject", name, &format!("id={id} ({year})"));
            success(format!("Subject #{id} added: {}", name.trim()));
        }

        RefsAction::AddPeriod {
            name,
            start,
            end,
            is_break,
        } => {
            let s = parse_clock(start).ok_or_else(|| AppError::InvalidTime(start.clone()))?;
            let e = parse_clock(end).ok_or_else(|| AppError::InvalidTime(end.clone()))?;
            if e <= s {
                return Err(AppError::InvalidTime(format!("{start} - {end}: end must follow start")));
            }
            let id = reference::insert_time_period(conn, name, s, e, *is_break, year)?;
            ttlog_quiet(conn, "refs_period", name, &format!("id={id} {start}-{end} ({year})"));
            success(format!("Time period #{id} added: {} {} - {}", name.trim(), start, end));
        }

        RefsAction::AddClassroom { name, capacity } => {
            let cap = capacity.unwrap_or(cfg.default_section_capacity);
            let id = reference::insert_classroom(conn, name, cap)?;
            ttlog_quiet(conn, "refs_classroom", name, &format!("id={id} capacity={cap}"));
            success(format!("Classroom #{id} added: {}", name.trim()));
        }

        RefsAction::AddSection {
            grade,
            letter,
            name,
        } => {
            if *grade > 11 {
                return Err(AppError::InvalidGrade(*grade as i64));
            }
            let letter = letter
                .as_deref()
                .map(normalize_section_letter)
                .unwrap_or(SectionLetter::Unassigned);
            let display = name
                .clone()
                .unwrap_or_else(|| section_display_name(*grade, letter));

            let created = reference::insert_section_if_absent(
                conn,
                &display,
                *grade,
                letter,
                cfg.default_section_capacity,
                year,
            )?;
            if created {
                ttlog_quiet(conn, "refs_section", &display, &format!("grade={grade} ({year})"));
                success(format!("Section added: {display}"));
            } else {
                warning(format!(
                    "Section for grade {} letter {} already exists in {}",
                    grade,
                    letter.code(),
                    year
                ));
            }
        }
    }

    Ok(())
}

fn print_list(conn: &rusqlite::Connection, kind: RefKind, year: &str) -> AppResult<()> {
    let table = match kind {
        RefKind::Sections => {
            let mut t = Table::new(vec![
                Column::right("ID"),
                Column::left("NAME"),
                Column::right("GRADE"),
                Column::left("LETTER"),
                Column::right("CAPACITY"),
            ]);
            for s in reference::list_sections(conn, year)? {
                t.add_row(vec![
                    s.id.to_string(),
                    s.name,
                    s.grade_level.to_string(),
                    s.section_letter.code().to_string(),
                    s.max_students.to_string(),
                ]);
            }
            t
        }
        RefKind::Teachers | RefKind::Subjects | RefKind::Classrooms => {
            let rows = match kind {
                RefKind::Teachers => reference::active_teachers(conn)?,
                RefKind::Subjects => reference::active_subjects(conn)?,
                _ => reference::active_classrooms(conn)?,
            };
            let mut t = Table::new(vec![Column::right("ID"), Column::left("NAME")]);
            for (id, name) in rows {
                t.add_row(vec![id.to_string(), name]);
            }
            t
        }
        RefKind::Periods => {
            let mut t = Table::new(vec![
                Column::right("ID"),
                Column::left("NAME"),
                Column::left("START"),
                Column::left("END"),
                Column::left("BREAK"),
            ]);
            for p in reference::list_time_periods(conn, year)? {
                t.add_row(vec![
                    p.id.to_string(),
                    p.period_name,
                    p.start_time,
                    p.end_time,
                    if p.is_break { "yes".into() } else { String::new() },
                ]);
            }
            t
        }
    };

    if table.is_empty() {
        info("No rows.");
    } else {
        print!("{}", table.render());
    }
    Ok(())
}
