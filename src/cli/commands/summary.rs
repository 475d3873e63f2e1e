use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::aggregator::{SummaryRequest, compute, compute_all};
use crate::core::resolver::grade_label;
use crate::db::summaries::list_month;
use crate::errors::AppResult;
use crate::models::summary::MonthlySummary;
use crate::ui::messages::{header, info, success};
use crate::utils::colors::{RESET, color_for_percentage};
use crate::utils::date::{month_name, parse_month};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Summary {
        month,
        grade,
        working_days,
        by,
        list,
    } = cmd
    {
        let (year, month) = parse_month(month)?;
        let pool = super::open_db(cfg)?;

        header(format!(
            "{} {} ({})",
            month_name(month),
            year,
            cfg.academic_year
        ));

        let rows = if *list {
            let mut stored = list_month(&pool.conn, month, year)?;
            if let Some(g) = grade {
                stored.retain(|s| s.grade_level == *g);
            }
            stored
        } else {
            let req = SummaryRequest {
                month,
                year,
                academic_year: &cfg.academic_year,
                working_days: *working_days,
                holidays: &cfg.holidays,
                calculated_by: by.as_deref().unwrap_or(&cfg.calculated_by),
            };

            let computed = match grade {
                Some(g) => vec![compute(&pool.conn, *g, &req)?],
                None => compute_all(&pool.conn, &req)?,
            };
            success(format!(
                "{} grade summaries computed ({} working days)",
                computed.len(),
                req.effective_working_days()
            ));
            computed
        };

        if rows.is_empty() {
            info("No summaries.");
            return Ok(());
        }

        print_summaries(&rows, cfg);
    }

    Ok(())
}

fn print_summaries(rows: &[MonthlySummary], cfg: &Config) {
    let mut table = Table::new(vec![
        Column::left("GRADE"),
        Column::right("SECTIONS"),
        Column::right("M"),
        Column::right("F"),
        Column::right("TOTAL"),
        Column::right("DAYS"),
        Column::right("SUM"),
        Column::right("AVG"),
        Column::right("%"),
    ]);

    for s in rows {
        table.add_row(vec![
            grade_label(s.grade_level),
            s.section_count.to_string(),
            s.male_students.to_string(),
            s.female_students.to_string(),
            s.total_students.to_string(),
            s.working_days.to_string(),
            s.attendance_sum.to_string(),
            format!("{:.2}", s.average_attendance),
            format!("{:.2}", s.attendance_percentage),
        ]);
    }

    print!("{}", table.render());

    // Weighted by enrolment, grades without students do not count.
    let students: i64 = rows.iter().map(|s| s.total_students).sum();
    if students > 0 {
        let overall = rows
            .iter()
            .map(|s| s.attendance_percentage * s.total_students as f64)
            .sum::<f64>()
            / students as f64;
        let color = color_for_percentage(overall, cfg.alert_warning_below, cfg.alert_critical_below);
        println!("\n{} students, overall {}{:.2}%{}", students, color, overall, RESET);
    }
}
