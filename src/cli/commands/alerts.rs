use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::attendance::{AlertThresholds, scan_chronic_absence};
use crate::db::alerts::list_active;
use crate::errors::AppResult;
use crate::models::attendance::AlertSeverity;
use crate::ui::messages::{info, success, warning};
use crate::utils::date::{parse_date_arg, today};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Alerts {
        scan,
        as_of,
        days,
        list,
    } = cmd
    else {
        return Ok(());
    };

    if !*scan && !*list {
        warning("Nothing to do: pass --scan and/or --list.");
        return Ok(());
    }

    let pool = super::open_db(cfg)?;

    if *scan {
        let as_of = match as_of {
            Some(d) => parse_date_arg(d)?,
            None => today(),
        };
        let thresholds = AlertThresholds {
            days_back: days.unwrap_or(cfg.alert_days_back),
            min_days: cfg.alert_min_days,
            warning_below: cfg.alert_warning_below,
            critical_below: cfg.alert_critical_below,
        };

        let report = scan_chronic_absence(&pool.conn, &cfg.academic_year, as_of, &thresholds)?;
        success(format!(
            "Scanned {} students up to {}: {} new alerts, {} refreshed",
            report.scanned, as_of, report.raised, report.updated
        ));
        if report.insufficient > 0 {
            info(format!(
                "{} students have fewer than {} recorded days",
                report.insufficient, thresholds.min_days
            ));
        }
    }

    if *list {
        let alerts = list_active(&pool.conn)?;
        if alerts.is_empty() {
            info("No active alerts.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::right("ID"),
            Column::left("STUDENT"),
            Column::left("SEVERITY"),
            Column::right("ABSENT"),
            Column::right("ABSENCE %"),
            Column::right("DAYS"),
            Column::left("CREATED"),
        ]);
        for a in alerts {
            let severity = match a.severity {
                AlertSeverity::Critical => "CRITICAL",
                AlertSeverity::High => "high",
            };
            table.add_row(vec![
                a.id.to_string(),
                a.student_name,
                severity.to_string(),
                a.absence_count.to_string(),
                format!("{:.2}", a.absence_percentage),
                a.period_days.to_string(),
                a.created_at,
            ]);
        }
        print!("{}", table.render());
    }

    Ok(())
}
