//! Monthly per-grade attendance summary (the "matrícula" figures).

use crate::db::log::{ttlog, ttlog_quiet};
use crate::db::summaries;
use crate::errors::{AppError, AppResult};
use crate::models::summary::MonthlySummary;
use crate::ui::messages::warning;
use crate::utils::date::{month_bounds, working_days};
use chrono::{Local, NaiveDate};
use rusqlite::Connection;

pub const MAX_GRADE: u8 = 11;

/// Parameters shared by every grade of one computation run.
#[derive(Debug, Clone)]
pub struct SummaryRequest<'a> {
    pub month: u32,
    pub year: i32,
    pub academic_year: &'a str,
    /// Fixed working-day count; `None` derives it from the calendar.
    pub working_days: Option<i64>,
    pub holidays: &'a [NaiveDate],
    pub calculated_by: &'a str,
}

impl SummaryRequest<'_> {
    pub fn effective_working_days(&self) -> i64 {
        self.working_days
            .unwrap_or_else(|| working_days(self.year, self.month, self.holidays))
    }
}

/// Compute and upsert the summary of one grade. A grade with no active
/// students yields an all-zero summary.
pub fn compute(conn: &Connection, grade_level: u8, req: &SummaryRequest<'_>) -> AppResult<MonthlySummary> {
    if grade_level > MAX_GRADE {
        return Err(AppError::InvalidGrade(grade_level as i64));
    }
    let (from, to) = month_bounds(req.year, req.month)?;

    let (male, female, total) = summaries::grade_student_counts(conn, grade_level, req.academic_year)?;
    let section_count = summaries::grade_section_count(conn, grade_level, req.academic_year)?;
    let attendance_sum =
        summaries::grade_attendance_sum(conn, grade_level, req.academic_year, from, to)?;
    let wd = req.effective_working_days();

    let average = MonthlySummary::average(attendance_sum, total, wd);

    let summary = MonthlySummary {
        grade_level,
        month: req.month,
        year: req.year,
        academic_year: req.academic_year.to_string(),
        section_count,
        male_students: male,
        female_students: female,
        total_students: total,
        working_days: wd,
        attendance_sum,
        average_attendance: average,
        attendance_percentage: average * 100.0,
        calculated_at: Local::now().to_rfc3339(),
        calculated_by: req.calculated_by.to_string(),
    };

    summaries::upsert_summary(conn, &summary)?;

    ttlog(
        conn,
        "summary",
        &format!("grade {} {:04}-{:02}", grade_level, req.year, req.month),
        &format!(
            "students={} sum={} working_days={} pct={:.2}",
            total, attendance_sum, wd, summary.attendance_percentage
        ),
    )?;

    Ok(summary)
}

/// Every grade with active students. A grade that fails is reported and
/// left out; the others are still computed.
pub fn compute_all(conn: &Connection, req: &SummaryRequest<'_>) -> AppResult<Vec<MonthlySummary>> {
    month_bounds(req.year, req.month)?;

    let grades = summaries::grades_with_students(conn, req.academic_year)?;
    let mut out = Vec::with_capacity(grades.len());

    for grade in grades {
        match compute(conn, grade, req) {
            Ok(s) => out.push(s),
            Err(e) => {
                warning(format!("Grade {}: summary not computed: {}", grade, e));
                ttlog_quiet(
                    conn,
                    "summary_failed",
                    &format!("grade {} {:04}-{:02}", grade, req.year, req.month),
                    &e.to_string(),
                );
            }
        }
    }

    Ok(out)
}
