//! Student roster import: header-matched columns, one student per row.

use super::normalizer::build_roster_record;
use super::resolver::ensure_section;
use crate::db::log::ttlog_quiet;
use crate::db::pool::BatchTx;
use crate::db::students;
use crate::errors::{AppError, AppResult};
use crate::models::report::ImportReport;
use crate::models::roster::{RawRosterRow, RosterRecord};
use crate::spreadsheet::{SheetGrid, read_sheet};
use crate::utils::date::parse_academic_year;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct RosterImportOptions {
    pub sheet: Option<String>,
    /// Title rows above the header row.
    pub skip_rows: usize,
    pub enrollment_date: NaiveDate,
    pub academic_year: String,
    pub batch_size: usize,
    pub section_capacity: i64,
}

/// September 1st of the academic year's first calendar year.
pub fn default_enrollment_date(academic_year: &str) -> AppResult<NaiveDate> {
    let (start, _) = parse_academic_year(academic_year)?;
    NaiveDate::from_ymd_opt(start, 9, 1)
        .ok_or_else(|| AppError::InvalidAcademicYear(academic_year.to_string()))
}

/// Column positions found in the header row.
#[derive(Debug, Clone, Default)]
struct RosterColumns {
    first_name: usize,
    last_name: Option<usize>,
    grade: Option<usize>,
    section: Option<usize>,
    birth_date: Option<usize>,
    national_id: Option<usize>,
    gender: Option<usize>,
    phone: Option<usize>,
}

/// Lower-case and drop Spanish accents so "Seccion" matches "Sección".
fn header_key(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            other => other,
        })
        .collect()
}

impl RosterColumns {
    fn detect(grid: &SheetGrid, header_row: usize) -> AppResult<Self> {
        let headers: Vec<String> = grid
            .rows
            .get(header_row)
            .map(|r| r.iter().map(|h| header_key(h)).collect())
            .unwrap_or_default();

        let find = |name: &str| headers.iter().position(|h| *h == header_key(name));

        Ok(Self {
            first_name: find("Nombre").ok_or_else(|| AppError::MissingColumn("Nombre".into()))?,
            last_name: find("Apellido"),
            grade: find("Grado"),
            section: find("Sección"),
            birth_date: find("Fecha de nacimiento"),
            national_id: find("Cédula de identidad"),
            gender: find("Género"),
            phone: find("Teléfono celular"),
        })
    }

    fn raw_row(&self, grid: &SheetGrid, row: usize) -> RawRosterRow {
        let get = |col: Option<usize>| col.and_then(|c| grid.text(row, c)).map(str::to_string);

        RawRosterRow {
            first_name: get(Some(self.first_name)),
            last_name: get(self.last_name),
            grade: get(self.grade),
            section: get(self.section),
            birth_date: get(self.birth_date),
            national_id: get(self.national_id),
            gender: get(self.gender),
            phone: get(self.phone),
        }
    }
}

fn is_blank(raw: &RawRosterRow) -> bool {
    [
        &raw.first_name,
        &raw.last_name,
        &raw.grade,
        &raw.section,
        &raw.birth_date,
        &raw.national_id,
        &raw.gender,
        &raw.phone,
    ]
    .iter()
    .all(|v| v.is_none())
}

enum Stored {
    Inserted,
    Updated,
}

fn store_student(conn: &Connection, rec: &RosterRecord, opts: &RosterImportOptions) -> AppResult<Stored> {
    let grade = rec.effective_grade();
    let section_id = ensure_section(
        conn,
        grade,
        rec.section_letter,
        &opts.academic_year,
        opts.section_capacity,
    )?;

    match students::find_existing(conn, rec, grade, &opts.academic_year)? {
        Some(id) => {
            students::update_student(conn, id, rec, grade, section_id)?;
            Ok(Stored::Updated)
        }
        None => {
            students::insert_student(
                conn,
                rec,
                grade,
                section_id,
                opts.enrollment_date,
                &opts.academic_year,
            )?;
            Ok(Stored::Inserted)
        }
    }
}

/// Import every roster row of the sheet. Re-running the same file updates
/// the students it created instead of duplicating them.
pub fn import_roster(conn: &Connection, path: &Path, opts: &RosterImportOptions) -> AppResult<ImportReport> {
    parse_academic_year(&opts.academic_year)?;

    let grid = read_sheet(path, opts.sheet.as_deref())?;
    let columns = RosterColumns::detect(&grid, opts.skip_rows)?;

    let mut report = ImportReport::default();
    let mut tx = BatchTx::begin(conn, opts.batch_size)?;

    for row in (opts.skip_rows + 1)..grid.height() {
        let raw = columns.raw_row(&grid, row);
        if is_blank(&raw) {
            continue;
        }

        // spreadsheet row numbers are 1-based
        let line = row + 1;

        let Some(rec) = build_roster_record(&raw) else {
            report.skip(format!("row {line}: missing first name"));
            continue;
        };

        if rec.grade_level.is_none()
            && let Some(g) = &raw.grade
        {
            report.warnings.push(format!(
                "row {line}: unknown grade '{g}', using grade {}",
                RosterRecord::FALLBACK_GRADE
            ));
        }

        match store_student(tx.conn(), &rec, opts) {
            Ok(Stored::Inserted) => report.imported += 1,
            Ok(Stored::Updated) => report.updated += 1,
            Err(e) => {
                report.skip(format!("row {line}: {} ({})", rec.full_name, e));
                continue;
            }
        }

        tx.record()?;
    }

    tx.commit()?;

    ttlog_quiet(
        conn,
        "import_roster",
        &path.to_string_lossy(),
        &format!(
            "imported={} updated={} skipped={} ({})",
            report.imported, report.updated, report.skipped, opts.academic_year
        ),
    );

    Ok(report)
}
