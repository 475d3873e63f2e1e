#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveTime};
use rollbook::core::normalizer::build_roster_record;
use rollbook::db::initialize::init_db;
use rollbook::db::{reference, students};
use rollbook::models::roster::RawRosterRow;
use rollbook::models::section_letter::SectionLetter;
use rusqlite::Connection;
use rust_xlsxwriter::Workbook;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const YEAR: &str = "2025-2026";

/// Binary under test with HOME pointed at a scratch directory, so the
/// operator's real configuration is never read or written.
pub fn rb() -> Command {
    let mut cmd = cargo_bin_cmd!("rollbook");
    cmd.env("HOME", test_home());
    cmd
}

fn test_home() -> PathBuf {
    let home = env::temp_dir().join("rollbook_test_home");
    fs::create_dir_all(&home).ok();
    home
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rollbook.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rollbook_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Open (and migrate) a fresh database for library-level tests.
pub fn open_test_db(name: &str) -> Connection {
    let path = setup_test_db(name);
    let conn = Connection::open(&path).expect("open db");
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .expect("foreign keys");
    init_db(&conn).expect("init db");
    conn
}

/// Write a single-sheet workbook. Empty strings leave the cell blank.
pub fn write_sheet(path: &Path, sheet: &str, rows: &[Vec<&str>]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet).expect("sheet name");

    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if !value.is_empty() {
                worksheet
                    .write_string(r as u32, c as u16, *value)
                    .expect("write cell");
            }
        }
    }

    workbook.save(path).expect("save workbook");
}

pub fn temp_sheet(name: &str) -> PathBuf {
    let path = env::temp_dir().join(format!("{}_rollbook_in.xlsx", name));
    fs::remove_file(&path).ok();
    path
}

/// Ids of the reference rows created by [`seed_reference`].
pub struct Seed {
    pub section_id: i64,
    pub classroom_id: i64,
    pub abreu: i64,
    pub nieto: i64,
    pub math: i64,
    pub english: i64,
}

/// A small school: one secondary section, three teachers, three subjects,
/// four periods (one break) and a classroom.
pub fn seed_reference(conn: &Connection) -> Seed {
    reference::insert_section_if_absent(conn, "1° año", 7, SectionLetter::Unassigned, 35, YEAR)
        .expect("section");
    let section_id = reference::find_section_by_name(conn, "1° año", YEAR)
        .expect("lookup section")
        .expect("section exists");

    let abreu = reference::insert_teacher(conn, "LUISA ELENA ABREU", YEAR).expect("teacher");
    let nieto = reference::insert_teacher(conn, "MARIA NIETO", YEAR).expect("teacher");
    reference::insert_teacher(conn, "CARLOS PEREZ", YEAR).expect("teacher");

    let math = reference::insert_subject(conn, "MATEMÁTICAS", YEAR).expect("subject");
    let english = reference::insert_subject(conn, "INGLÉS", YEAR).expect("subject");
    reference::insert_subject(conn, "CASTELLANO", YEAR).expect("subject");

    for (name, start, end, is_break) in [
        ("1", (7, 0), (7, 40), false),
        ("2", (7, 40), (8, 20), false),
        ("Receso", (8, 20), (8, 40), true),
        ("7", (13, 0), (13, 40), false),
    ] {
        reference::insert_time_period(
            conn,
            name,
            clock(start.0, start.1),
            clock(end.0, end.1),
            is_break,
            YEAR,
        )
        .expect("time period");
    }

    let classroom_id = reference::insert_classroom(conn, "Aula 1", 35).expect("classroom");

    Seed {
        section_id,
        classroom_id,
        abreu,
        nieto,
        math,
        english,
    }
}

pub fn clock(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Insert an active student straight through the db layer.
pub fn add_student(conn: &Connection, name: &str, gender: &str, grade: u8, section_id: i64) -> i64 {
    let rec = build_roster_record(&RawRosterRow {
        first_name: Some(name.to_string()),
        gender: Some(gender.to_string()),
        ..Default::default()
    })
    .expect("record");

    students::insert_student(conn, &rec, grade, section_id, date(2025, 9, 1), YEAR)
        .expect("insert student")
}
