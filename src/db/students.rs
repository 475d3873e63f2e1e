use crate::errors::AppResult;
use crate::models::gender::Gender;
use crate::models::roster::RosterRecord;
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, params};

#[derive(Debug, Clone)]
pub struct StudentRow {
    pub id: i64,
    pub full_name: String,
    pub national_id: Option<String>,
    pub gender: Gender,
    pub grade_level: u8,
    pub section_id: Option<i64>,
    pub academic_year: String,
}

/// Existing student of `academic_year` for a roster record: national id
/// first, then (full name, grade). A returning student gets one row per year.
pub fn find_existing(
    conn: &Connection,
    rec: &RosterRecord,
    grade_level: u8,
    academic_year: &str,
) -> AppResult<Option<i64>> {
    if let Some(nid) = &rec.national_id {
        let id = conn
            .query_row(
                "SELECT id FROM students WHERE national_id = ?1 AND academic_year = ?2",
                params![nid, academic_year],
                |r| r.get(0),
            )
            .optional()?;
        if id.is_some() {
            return Ok(id);
        }
    }

    let id = conn
        .query_row(
            "SELECT id FROM students
             WHERE full_name = ?1 AND grade_level = ?2 AND academic_year = ?3
             ORDER BY id LIMIT 1",
            params![rec.full_name, grade_level, academic_year],
            |r| r.get(0),
        )
        .optional()?;
    Ok(id)
}

pub fn insert_student(
    conn: &Connection,
    rec: &RosterRecord,
    grade_level: u8,
    section_id: i64,
    enrollment_date: NaiveDate,
    academic_year: &str,
) -> AppResult<i64> {
    let now = Local::now().to_rfc3339();
    conn.execute(
        "INSERT INTO students
            (first_name, last_name, full_name, national_id, birth_date, gender,
             grade_level, section_id, phone, enrollment_date, academic_year,
             is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 1, ?12, ?12)",
        params![
            rec.first_name,
            rec.last_name,
            rec.full_name,
            rec.national_id,
            rec.birth_date.map(|d| d.format("%Y-%m-%d").to_string()),
            rec.gender.to_db_str(),
            grade_level,
            section_id,
            rec.phone,
            enrollment_date.format("%Y-%m-%d").to_string(),
            academic_year,
            now
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Refresh an existing student from a newer roster row and re-activate it.
pub fn update_student(
    conn: &Connection,
    id: i64,
    rec: &RosterRecord,
    grade_level: u8,
    section_id: i64,
) -> AppResult<()> {
    conn.execute(
        "UPDATE students SET
            first_name = ?1, last_name = ?2, full_name = ?3,
            national_id = COALESCE(?4, national_id),
            birth_date = COALESCE(?5, birth_date),
            gender = ?6, grade_level = ?7, section_id = ?8,
            phone = COALESCE(?9, phone),
            is_active = 1, updated_at = ?10
         WHERE id = ?11",
        params![
            rec.first_name,
            rec.last_name,
            rec.full_name,
            rec.national_id,
            rec.birth_date.map(|d| d.format("%Y-%m-%d").to_string()),
            rec.gender.to_db_str(),
            grade_level,
            section_id,
            rec.phone,
            Local::now().to_rfc3339(),
            id
        ],
    )?;
    Ok(())
}

fn map_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<StudentRow> {
    let gender: String = r.get(3)?;
    Ok(StudentRow {
        id: r.get(0)?,
        full_name: r.get(1)?,
        national_id: r.get(2)?,
        gender: Gender::from_db_str(&gender).unwrap_or(Gender::Unknown),
        grade_level: r.get(4)?,
        section_id: r.get(5)?,
        academic_year: r.get(6)?,
    })
}

const STUDENT_COLUMNS: &str =
    "id, full_name, national_id, gender, grade_level, section_id, academic_year";

pub fn get_student(conn: &Connection, id: i64) -> AppResult<Option<StudentRow>> {
    let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], map_row).optional()?)
}

pub fn active_students_in_section(conn: &Connection, section_id: i64) -> AppResult<Vec<StudentRow>> {
    let sql = format!(
        "SELECT {STUDENT_COLUMNS} FROM students
         WHERE section_id = ?1 AND is_active = 1
         ORDER BY full_name"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([section_id], map_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn active_students(conn: &Connection, academic_year: &str) -> AppResult<Vec<StudentRow>> {
    let sql = format!(
        "SELECT {STUDENT_COLUMNS} FROM students
         WHERE academic_year = ?1 AND is_active = 1
         ORDER BY grade_level, full_name"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([academic_year], map_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn count_active(conn: &Connection, academic_year: &str) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM students WHERE academic_year = ?1 AND is_active = 1",
        [academic_year],
        |r| r.get(0),
    )?)
}
