//! Daily attendance marking, per-student rates and chronic-absence alerts.

use crate::db::alerts::{self, AlertDraft};
use crate::db::attendance as att;
use crate::db::log::ttlog_quiet;
use crate::db::students;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AlertSeverity, DailyAttendance};
use chrono::{Duration, NaiveDate};
use rusqlite::Connection;

/// Who was not simply present on a given day.
#[derive(Debug, Clone, Default)]
pub struct DayMarks {
    pub absent: Vec<i64>,
    /// Excused ids are absent as well.
    pub excused: Vec<i64>,
    pub late: Vec<i64>,
    pub recorded_by: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkReport {
    pub present: usize,
    pub absent: usize,
    /// Listed ids that are not active students of the section.
    pub unknown_ids: Vec<i64>,
}

impl MarkReport {
    pub fn marked(&self) -> usize {
        self.present + self.absent
    }
}

/// One row per active student of the section for `date`. Students not
/// listed in `marks` are present. Re-marking a day overwrites it.
pub fn mark_section(
    conn: &Connection,
    section_id: i64,
    date: NaiveDate,
    marks: &DayMarks,
    academic_year: &str,
) -> AppResult<MarkReport> {
    let roster = students::active_students_in_section(conn, section_id)?;
    let mut report = MarkReport::default();

    let tx = conn.unchecked_transaction()?;

    for s in &roster {
        let excused = marks.excused.contains(&s.id);
        let present = !excused && !marks.absent.contains(&s.id);

        att::upsert_attendance(
            &tx,
            &DailyAttendance {
                id: 0,
                student_id: s.id,
                section_id,
                date,
                present,
                excused,
                late_arrival: present && marks.late.contains(&s.id),
                absence_reason: excused.then(|| "excused".to_string()),
                notes: None,
                recorded_by: marks.recorded_by,
                academic_year: academic_year.to_string(),
                recorded_at: String::new(),
            },
        )?;

        if present {
            report.present += 1;
        } else {
            report.absent += 1;
        }
    }

    tx.commit()?;

    let mut listed: Vec<i64> = marks
        .absent
        .iter()
        .chain(&marks.excused)
        .chain(&marks.late)
        .copied()
        .collect();
    listed.sort_unstable();
    listed.dedup();
    report.unknown_ids = listed
        .into_iter()
        .filter(|id| !roster.iter().any(|s| s.id == *id))
        .collect();

    ttlog_quiet(
        conn,
        "attendance",
        &format!("section {} {}", section_id, date),
        &format!("present={} absent={}", report.present, report.absent),
    );

    Ok(report)
}

/// `(percentage, present_days, total_days)` over [from, to]; 0 % without rows.
pub fn student_percentage(
    conn: &Connection,
    student_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> AppResult<(f64, i64, i64)> {
    if students::get_student(conn, student_id)?.is_none() {
        return Err(AppError::StudentNotFound(student_id));
    }

    let (present, total) = att::student_counts(conn, student_id, from, to)?;
    let pct = if total > 0 {
        present as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    Ok((pct, present, total))
}

#[derive(Debug, Clone)]
pub struct AlertThresholds {
    pub days_back: i64,
    pub min_days: i64,
    pub warning_below: f64,
    pub critical_below: f64,
}

impl AlertThresholds {
    pub fn severity_for(&self, percentage: f64) -> Option<AlertSeverity> {
        if percentage < self.critical_below {
            Some(AlertSeverity::Critical)
        } else if percentage < self.warning_below {
            Some(AlertSeverity::High)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub scanned: usize,
    /// Not enough recorded days in the window.
    pub insufficient: usize,
    pub raised: usize,
    pub updated: usize,
}

/// Check every active student of the academic year over
/// [as_of - days_back, as_of]. An active chronic alert is refreshed in
/// place rather than duplicated.
pub fn scan_chronic_absence(
    conn: &Connection,
    academic_year: &str,
    as_of: NaiveDate,
    t: &AlertThresholds,
) -> AppResult<ScanReport> {
    let from = as_of - Duration::days(t.days_back);
    let mut report = ScanReport::default();

    for s in students::active_students(conn, academic_year)? {
        report.scanned += 1;

        let (present, total) = att::student_counts(conn, s.id, from, as_of)?;
        if total < t.min_days {
            report.insufficient += 1;
            continue;
        }

        let pct = present as f64 / total as f64 * 100.0;
        let Some(severity) = t.severity_for(pct) else {
            continue;
        };

        let message = format!(
            "Student has {:.1}% attendance rate over last {} days",
            pct, t.days_back
        );
        let draft = AlertDraft {
            student_id: s.id,
            severity,
            message: &message,
            absence_count: total - present,
            absence_percentage: ((100.0 - pct) * 100.0).round() / 100.0,
            period_days: total,
        };

        match alerts::find_active_chronic(conn, s.id)? {
            Some(id) => {
                alerts::update_alert(conn, id, &draft)?;
                report.updated += 1;
            }
            None => {
                alerts::insert_alert(conn, &draft)?;
                report.raised += 1;
            }
        }
    }

    ttlog_quiet(
        conn,
        "alerts_scan",
        &as_of.to_string(),
        &format!(
            "scanned={} raised={} updated={}",
            report.scanned, report.raised, report.updated
        ),
    );

    Ok(report)
}
