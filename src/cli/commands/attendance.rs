use crate::cli::parser::{AttendanceAction, Commands};
use crate::config::Config;
use crate::core::attendance::{DayMarks, mark_section, student_percentage};
use crate::core::resolver::resolve_section_by_name;
use crate::db::attendance::load_student_attendance;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::{RESET, color_for_percentage};
use crate::utils::date::{is_weekend, parse_date_arg, parse_period};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Attendance { action } = cmd else {
        return Ok(());
    };

    let pool = super::open_db(cfg)?;

    match action {
        AttendanceAction::Mark {
            section,
            date,
            absent,
            excused,
            late,
            by,
        } => {
            let date = parse_date_arg(date)?;
            if is_weekend(&date) {
                warning(format!("{} is a weekend day.", date));
            }

            let section_id = resolve_section_by_name(&pool.conn, section, &cfg.academic_year)?;
            let marks = DayMarks {
                absent: absent.clone(),
                excused: excused.clone(),
                late: late.clone(),
                recorded_by: *by,
            };

            let report = mark_section(&pool.conn, section_id, date, &marks, &cfg.academic_year)?;

            if !report.unknown_ids.is_empty() {
                warning(format!(
                    "Not active students of '{}': {:?}",
                    section, report.unknown_ids
                ));
            }
            if report.marked() == 0 {
                warning(format!("Section '{}' has no active students.", section));
            } else {
                success(format!(
                    "{} {}: {} present, {} absent",
                    section, date, report.present, report.absent
                ));
            }
        }

        AttendanceAction::Show { student, period } => {
            let (from, to) = parse_period(period)?;
            let (pct, present, total) = student_percentage(&pool.conn, *student, from, to)?;

            if total == 0 {
                info(format!("No attendance recorded for student {} in {}.", student, period));
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::left("DATE"),
                Column::left("PRESENT"),
                Column::left("EXCUSED"),
                Column::left("LATE"),
            ]);
            let flag = |b: bool| if b { "x".to_string() } else { String::new() };
            for row in load_student_attendance(&pool.conn, *student, from, to)? {
                table.add_row(vec![
                    row.date.to_string(),
                    flag(row.present),
                    flag(row.excused),
                    flag(row.late_arrival),
                ]);
            }
            print!("{}", table.render());

            let color = color_for_percentage(pct, cfg.alert_warning_below, cfg.alert_critical_below);
            println!(
                "\nStudent {}: {}{:.1}%{} ({} of {} days)",
                student, color, pct, RESET, present, total
            );
        }
    }

    Ok(())
}
