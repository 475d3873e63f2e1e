//! Reference data read by the importers: sections, teachers, subjects,
//! time periods and classrooms. The `refs` command provisions them.

use crate::errors::AppResult;
use crate::models::section_letter::SectionLetter;
use crate::utils::time::format_clock;
use chrono::{Local, NaiveTime};
use rusqlite::{Connection, OptionalExtension, params};

#[derive(Debug, Clone)]
pub struct SectionRow {
    pub id: i64,
    pub name: String,
    pub grade_level: u8,
    pub section_letter: SectionLetter,
    pub max_students: i64,
    pub academic_year: String,
}

#[derive(Debug, Clone)]
pub struct TimePeriodRow {
    pub id: i64,
    pub period_name: String,
    pub start_time: String,
    pub end_time: String,
    pub is_break: bool,
}

fn now() -> String {
    Local::now().to_rfc3339()
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Active section of one academic year by display name (ASCII
/// case-insensitive). Names repeat across years.
pub fn find_section_by_name(
    conn: &Connection,
    name: &str,
    academic_year: &str,
) -> AppResult<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT id FROM sections
             WHERE name = ?1 COLLATE NOCASE AND academic_year = ?2 AND is_active = 1
             ORDER BY id LIMIT 1",
            params![name.trim(), academic_year],
            |r| r.get(0),
        )
        .optional()?;
    Ok(id)
}

pub fn find_section(
    conn: &Connection,
    grade_level: u8,
    letter: SectionLetter,
    academic_year: &str,
) -> AppResult<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT id FROM sections
             WHERE grade_level = ?1 AND section_letter = ?2 AND academic_year = ?3",
            params![grade_level, letter.to_db_str(), academic_year],
            |r| r.get(0),
        )
        .optional()?;
    Ok(id)
}

/// Insert a section unless its (grade, letter, year) key already exists.
/// Returns `true` when a row was created.
pub fn insert_section_if_absent(
    conn: &Connection,
    name: &str,
    grade_level: u8,
    letter: SectionLetter,
    max_students: i64,
    academic_year: &str,
) -> AppResult<bool> {
    let n = conn.execute(
        "INSERT INTO sections
            (name, grade_level, section_letter, max_students, academic_year, is_active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)
         ON CONFLICT(grade_level, section_letter, academic_year) DO NOTHING",
        params![
            name,
            grade_level,
            letter.to_db_str(),
            max_students,
            academic_year,
            now()
        ],
    )?;
    Ok(n > 0)
}

pub fn list_sections(conn: &Connection, academic_year: &str) -> AppResult<Vec<SectionRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, grade_level, section_letter, max_students, academic_year
         FROM sections
         WHERE academic_year = ?1 AND is_active = 1
         ORDER BY grade_level, section_letter",
    )?;

    let rows = stmt.query_map([academic_year], |r| {
        let letter: String = r.get(3)?;
        Ok(SectionRow {
            id: r.get(0)?,
            name: r.get(1)?,
            grade_level: r.get(2)?,
            section_letter: SectionLetter::from_db_str(&letter).unwrap_or(SectionLetter::Unassigned),
            max_students: r.get(4)?,
            academic_year: r.get(5)?,
        })
    })?;

    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

// ---------------------------------------------------------------------------
// Teachers / subjects
// ---------------------------------------------------------------------------

/// `(id, teacher_name)` for every active teacher, by id.
pub fn active_teachers(conn: &Connection) -> AppResult<Vec<(i64, String)>> {
    id_name_pairs(
        conn,
        "SELECT id, teacher_name FROM teachers WHERE is_active = 1 ORDER BY id",
    )
}

/// `(id, subject_name)` for every active subject, by id.
pub fn active_subjects(conn: &Connection) -> AppResult<Vec<(i64, String)>> {
    id_name_pairs(
        conn,
        "SELECT id, subject_name FROM subjects WHERE is_active = 1 ORDER BY id",
    )
}

fn id_name_pairs(conn: &Connection, sql: &str) -> AppResult<Vec<(i64, String)>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?)))?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn insert_teacher(conn: &Connection, name: &str, academic_year: &str) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO teachers (teacher_name, academic_year, is_active, created_at)
         VALUES (?1, ?2, 1, ?3)",
        params![name.trim(), academic_year, now()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_subject(conn: &Connection, name: &str, academic_year: &str) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO subjects (subject_name, academic_year, is_active, created_at)
         VALUES (?1, ?2, 1, ?3)",
        params![name.trim(), academic_year, now()],
    )?;
    Ok(conn.last_insert_rowid())
}

// ---------------------------------------------------------------------------
// Time periods
// ---------------------------------------------------------------------------

pub fn find_time_period(
    conn: &Connection,
    start: &str,
    end: &str,
    academic_year: &str,
) -> AppResult<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT id FROM time_periods
             WHERE start_time = ?1 AND end_time = ?2 AND academic_year = ?3 AND is_active = 1
             ORDER BY id LIMIT 1",
            params![start, end, academic_year],
            |r| r.get(0),
        )
        .optional()?;
    Ok(id)
}

pub fn insert_time_period(
    conn: &Connection,
    name: &str,
    start: NaiveTime,
    end: NaiveTime,
    is_break: bool,
    academic_year: &str,
) -> AppResult<i64> {
    let next_order: i64 = conn.query_row(
        "SELECT COALESCE(MAX(display_order), 0) + 1 FROM time_periods WHERE academic_year = ?1",
        [academic_year],
        |r| r.get(0),
    )?;

    conn.execute(
        "INSERT INTO time_periods
            (period_name, start_time, end_time, is_break, display_order, academic_year, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1)",
        params![
            name.trim(),
            format_clock(&start),
            format_clock(&end),
            is_break,
            next_order,
            academic_year
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_time_periods(conn: &Connection, academic_year: &str) -> AppResult<Vec<TimePeriodRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, period_name, start_time, end_time, is_break
         FROM time_periods
         WHERE academic_year = ?1 AND is_active = 1
         ORDER BY display_order, start_time",
    )?;
    let rows = stmt.query_map([academic_year], |r| {
        Ok(TimePeriodRow {
            id: r.get(0)?,
            period_name: r.get(1)?,
            start_time: r.get(2)?,
            end_time: r.get(3)?,
            is_break: r.get(4)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

// ---------------------------------------------------------------------------
// Classrooms
// ---------------------------------------------------------------------------

pub fn first_active_classroom(conn: &Connection) -> AppResult<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT id FROM classrooms WHERE is_active = 1 ORDER BY id LIMIT 1",
            [],
            |r| r.get(0),
        )
        .optional()?;
    Ok(id)
}

pub fn insert_classroom(conn: &Connection, name: &str, capacity: i64) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO classrooms (name, capacity, is_active, created_at)
         VALUES (?1, ?2, 1, ?3)",
        params![name.trim(), capacity, now()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn active_classrooms(conn: &Connection) -> AppResult<Vec<(i64, String)>> {
    id_name_pairs(
        conn,
        "SELECT id, name FROM classrooms WHERE is_active = 1 ORDER BY id",
    )
}
