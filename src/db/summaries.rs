use crate::errors::AppResult;
use crate::models::summary::MonthlySummary;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};

/// `(male, female, total)` active students of a grade. Total includes
/// students whose gender is unknown.
pub fn grade_student_counts(
    conn: &Connection,
    grade_level: u8,
    academic_year: &str,
) -> AppResult<(i64, i64, i64)> {
    Ok(conn.query_row(
        "SELECT
            COALESCE(SUM(CASE WHEN gender = 'M' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN gender = 'F' THEN 1 ELSE 0 END), 0),
            COUNT(*)
         FROM students
         WHERE grade_level = ?1 AND academic_year = ?2 AND is_active = 1",
        params![grade_level, academic_year],
        |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
    )?)
}

pub fn grade_section_count(conn: &Connection, grade_level: u8, academic_year: &str) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(DISTINCT section_id)
         FROM students
         WHERE grade_level = ?1 AND academic_year = ?2 AND is_active = 1
           AND section_id IS NOT NULL",
        params![grade_level, academic_year],
        |r| r.get(0),
    )?)
}

/// Present marks in [from, to] for students of the grade.
pub fn grade_attendance_sum(
    conn: &Connection,
    grade_level: u8,
    academic_year: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*)
         FROM daily_attendance d
         JOIN students s ON s.id = d.student_id
         WHERE s.grade_level = ?1 AND s.academic_year = ?2
           AND d.present = 1
           AND d.attendance_date BETWEEN ?3 AND ?4",
        params![
            grade_level,
            academic_year,
            from.format("%Y-%m-%d").to_string(),
            to.format("%Y-%m-%d").to_string()
        ],
        |r| r.get(0),
    )?)
}

/// Grades with at least one active student, ascending.
pub fn grades_with_students(conn: &Connection, academic_year: &str) -> AppResult<Vec<u8>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT grade_level FROM students
         WHERE academic_year = ?1 AND is_active = 1
         ORDER BY grade_level",
    )?;
    let rows = stmt.query_map([academic_year], |r| r.get::<_, u8>(0))?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Insert or replace the (grade, month, year) summary.
pub fn upsert_summary(conn: &Connection, s: &MonthlySummary) -> AppResult<()> {
    conn.execute(
        "INSERT INTO monthly_attendance_summary
            (grade_level, month, year, academic_year, section_count, male_students,
             female_students, total_students, working_days, attendance_sum,
             average_attendance, attendance_percentage, calculated_at, calculated_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
         ON CONFLICT(grade_level, month, year) DO UPDATE SET
            academic_year         = excluded.academic_year,
            section_count         = excluded.section_count,
            male_students         = excluded.male_students,
            female_students       = excluded.female_students,
            total_students        = excluded.total_students,
            working_days          = excluded.working_days,
            attendance_sum        = excluded.attendance_sum,
            average_attendance    = excluded.average_attendance,
            attendance_percentage = excluded.attendance_percentage,
            calculated_at         = excluded.calculated_at,
            calculated_by         = excluded.calculated_by",
        params![
            s.grade_level,
            s.month,
            s.year,
            s.academic_year,
            s.section_count,
            s.male_students,
            s.female_students,
            s.total_students,
            s.working_days,
            s.attendance_sum,
            s.average_attendance,
            s.attendance_percentage,
            s.calculated_at,
            s.calculated_by
        ],
    )?;
    Ok(())
}

const SUMMARY_COLUMNS: &str = "grade_level, month, year, academic_year, section_count,
    male_students, female_students, total_students, working_days, attendance_sum,
    average_attendance, attendance_percentage, calculated_at, calculated_by";

fn map_summary(r: &rusqlite::Row<'_>) -> rusqlite::Result<MonthlySummary> {
    Ok(MonthlySummary {
        grade_level: r.get(0)?,
        month: r.get(1)?,
        year: r.get(2)?,
        academic_year: r.get(3)?,
        section_count: r.get(4)?,
        male_students: r.get(5)?,
        female_students: r.get(6)?,
        total_students: r.get(7)?,
        working_days: r.get(8)?,
        attendance_sum: r.get(9)?,
        average_attendance: r.get(10)?,
        attendance_percentage: r.get(11)?,
        calculated_at: r.get(12)?,
        calculated_by: r.get(13)?,
    })
}

pub fn load_summary(
    conn: &Connection,
    grade_level: u8,
    month: u32,
    year: i32,
) -> AppResult<Option<MonthlySummary>> {
    let sql = format!(
        "SELECT {SUMMARY_COLUMNS} FROM monthly_attendance_summary
         WHERE grade_level = ?1 AND month = ?2 AND year = ?3"
    );
    Ok(conn
        .query_row(&sql, params![grade_level, month, year], map_summary)
        .optional()?)
}

/// All stored summaries of a month, ordered by grade.
pub fn list_month(conn: &Connection, month: u32, year: i32) -> AppResult<Vec<MonthlySummary>> {
    let sql = format!(
        "SELECT {SUMMARY_COLUMNS} FROM monthly_attendance_summary
         WHERE month = ?1 AND year = ?2
         ORDER BY grade_level"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![month, year], map_summary)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
