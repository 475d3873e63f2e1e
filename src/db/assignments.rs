use crate::errors::AppResult;
use crate::models::schedule::ResolvedAssignment;
use crate::models::weekday::Weekday;
use chrono::Local;
use rusqlite::{Connection, params};

/// Timetable line joined with its reference names, for display.
#[derive(Debug, Clone)]
pub struct AssignmentView {
    pub day: Weekday,
    pub start_time: String,
    pub end_time: String,
    pub subject: String,
    pub teacher: String,
    pub classroom: String,
}

/// Remove every assignment of the section for the academic year.
pub fn clear_for_section(conn: &Connection, section_id: i64, academic_year: &str) -> AppResult<usize> {
    Ok(conn.execute(
        "DELETE FROM schedule_assignments WHERE section_id = ?1 AND academic_year = ?2",
        params![section_id, academic_year],
    )?)
}

pub fn insert_assignment(conn: &Connection, tenant_id: i64, a: &ResolvedAssignment) -> AppResult<i64> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO schedule_assignments
            (tenant_id, section_id, subject_id, teacher_id, classroom_id, time_period_id,
             day_of_week, academic_year, assignment_type, is_active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 1, ?10)",
    )?;
    stmt.execute(params![
        tenant_id,
        a.section_id,
        a.subject_id,
        a.teacher_id,
        a.classroom_id,
        a.time_period_id,
        a.day.to_db_str(),
        a.academic_year,
        a.assignment_type,
        Local::now().to_rfc3339()
    ])?;
    Ok(conn.last_insert_rowid())
}

pub fn count_for_section(conn: &Connection, section_id: i64, academic_year: &str) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM schedule_assignments WHERE section_id = ?1 AND academic_year = ?2",
        params![section_id, academic_year],
        |r| r.get(0),
    )?)
}

/// Assignments of a section ordered by period then weekday column.
pub fn list_for_section(
    conn: &Connection,
    section_id: i64,
    academic_year: &str,
) -> AppResult<Vec<AssignmentView>> {
    let mut stmt = conn.prepare(
        "SELECT a.day_of_week, p.start_time, p.end_time, s.subject_name, t.teacher_name, c.name
         FROM schedule_assignments a
         JOIN time_periods p ON p.id = a.time_period_id
         JOIN subjects s     ON s.id = a.subject_id
         JOIN teachers t     ON t.id = a.teacher_id
         JOIN classrooms c   ON c.id = a.classroom_id
         WHERE a.section_id = ?1 AND a.academic_year = ?2 AND a.is_active = 1
         ORDER BY p.start_time,
            CASE a.day_of_week
                WHEN 'lunes' THEN 1 WHEN 'martes' THEN 2 WHEN 'miercoles' THEN 3
                WHEN 'jueves' THEN 4 ELSE 5 END",
    )?;

    type Raw = (String, String, String, String, String, String);
    let rows = stmt.query_map(params![section_id, academic_year], |r| -> rusqlite::Result<Raw> {
        Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?, r.get(5)?))
    })?;

    let mut out = Vec::new();
    for row in rows {
        let (day, start_time, end_time, subject, teacher, classroom) = row?;
        if let Some(day) = Weekday::from_db_str(&day) {
            out.push(AssignmentView {
                day,
                start_time,
                end_time,
                subject,
                teacher,
                classroom,
            });
        }
    }
    Ok(out)
}
