use crate::errors::AppResult;
use crate::models::attendance::DailyAttendance;
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, params};

/// Insert or update the (student, date) row.
pub fn upsert_attendance(conn: &Connection, a: &DailyAttendance) -> AppResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO daily_attendance
            (student_id, section_id, attendance_date, present, excused, late_arrival,
             absence_reason, notes, recorded_by, academic_year, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
         ON CONFLICT(student_id, attendance_date) DO UPDATE SET
            section_id     = excluded.section_id,
            present        = excluded.present,
            excused        = excluded.excused,
            late_arrival   = excluded.late_arrival,
            absence_reason = excluded.absence_reason,
            notes          = excluded.notes,
            recorded_by    = excluded.recorded_by,
            academic_year  = excluded.academic_year,
            recorded_at    = excluded.recorded_at",
    )?;

    stmt.execute(params![
        a.student_id,
        a.section_id,
        a.date.format("%Y-%m-%d").to_string(),
        a.present,
        a.excused,
        a.late_arrival,
        a.absence_reason,
        a.notes,
        a.recorded_by,
        a.academic_year,
        Local::now().to_rfc3339()
    ])?;
    Ok(())
}

/// Rows for one student in [from, to], oldest first.
pub fn load_student_attendance(
    conn: &Connection,
    student_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> AppResult<Vec<DailyAttendance>> {
    let mut stmt = conn.prepare(
        "SELECT id, student_id, section_id, attendance_date, present, excused, late_arrival,
                absence_reason, notes, recorded_by, academic_year, recorded_at
         FROM daily_attendance
         WHERE student_id = ?1 AND attendance_date BETWEEN ?2 AND ?3
         ORDER BY attendance_date",
    )?;

    let rows = stmt.query_map(
        params![
            student_id,
            from.format("%Y-%m-%d").to_string(),
            to.format("%Y-%m-%d").to_string()
        ],
        |r| {
            let date: String = r.get(3)?;
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    3,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;
            Ok(DailyAttendance {
                id: r.get(0)?,
                student_id: r.get(1)?,
                section_id: r.get::<_, Option<i64>>(2)?.unwrap_or_default(),
                date,
                present: r.get(4)?,
                excused: r.get(5)?,
                late_arrival: r.get(6)?,
                absence_reason: r.get(7)?,
                notes: r.get(8)?,
                recorded_by: r.get(9)?,
                academic_year: r.get(10)?,
                recorded_at: r.get(11)?,
            })
        },
    )?;

    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// `(present, total)` rows for a student in [from, to].
pub fn student_counts(
    conn: &Connection,
    student_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> AppResult<(i64, i64)> {
    Ok(conn.query_row(
        "SELECT COALESCE(SUM(present), 0), COUNT(*)
         FROM daily_attendance
         WHERE student_id = ?1 AND attendance_date BETWEEN ?2 AND ?3",
        params![
            student_id,
            from.format("%Y-%m-%d").to_string(),
            to.format("%Y-%m-%d").to_string()
        ],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )?)
}
