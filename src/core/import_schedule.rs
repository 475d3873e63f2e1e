//! Weekly timetable import for one section.
//!
//! Sheet layout: `header_rows` title rows, then one row per period with the
//! time label in column A and Monday..Friday cells in columns B..F.

use super::aliases::AliasTable;
use super::cell_parser::{candidates_for_row, is_break};
use super::resolver::{EntityResolver, Resolution, resolve_section_by_name, resolve_time_period};
use crate::db::assignments;
use crate::db::log::ttlog_quiet;
use crate::db::pool::BatchTx;
use crate::errors::AppResult;
use crate::models::report::ImportReport;
use crate::spreadsheet::read_sheet;
use crate::utils::date::parse_academic_year;
use rusqlite::Connection;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ScheduleImportOptions {
    pub sheet: Option<String>,
    pub section: String,
    pub header_rows: usize,
    pub academic_year: String,
    pub tenant_id: i64,
    pub batch_size: usize,
}

/// Replace the section's timetable for the academic year with the sheet's.
///
/// The section must exist and the sheet must be readable before anything
/// is deleted; a failure after that rolls back the uncommitted batch.
pub fn import_schedule(
    conn: &Connection,
    path: &Path,
    opts: &ScheduleImportOptions,
    aliases: &AliasTable,
) -> AppResult<ImportReport> {
    parse_academic_year(&opts.academic_year)?;

    let section_id = resolve_section_by_name(conn, &opts.section, &opts.academic_year)?;
    let grid = read_sheet(path, opts.sheet.as_deref())?;
    let resolver = EntityResolver::load(conn, aliases)?;

    let mut report = ImportReport::default();
    let mut tx = BatchTx::begin(conn, opts.batch_size)?;

    let cleared = assignments::clear_for_section(tx.conn(), section_id, &opts.academic_year)?;

    for row in opts.header_rows..grid.height() {
        let line = row + 1;

        let Some(label) = grid.text(row, 0) else {
            continue;
        };
        if is_break(label) {
            continue;
        }

        let day_cells: Vec<Option<&str>> = (1..=5).map(|c| grid.text(row, c)).collect();

        let parsed = match candidates_for_row(label, &day_cells) {
            Ok(p) => p,
            Err(e) => {
                report.skip(format!("row {line}: {e}"));
                continue;
            }
        };
        report.empty += parsed.empty_cells;

        if parsed.candidates.is_empty() {
            continue;
        }

        let period_id = match resolve_time_period(tx.conn(), &parsed.time, &opts.academic_year)? {
            Resolution::Found(id) => id,
            Resolution::Skipped(reason) => {
                // a missing period drops the whole row
                report.skipped += parsed.candidates.len();
                report.warnings.push(format!("row {line}: {reason}"));
                continue;
            }
        };

        for candidate in &parsed.candidates {
            let resolved =
                match resolver.resolve_candidate(section_id, period_id, candidate, &opts.academic_year) {
                    Resolution::Found(a) => a,
                    Resolution::Skipped(reason) => {
                        report.skip(format!(
                            "row {line} {}: {reason}",
                            candidate.day.to_db_str()
                        ));
                        continue;
                    }
                };

            if let Err(e) = assignments::insert_assignment(tx.conn(), opts.tenant_id, &resolved) {
                report.skip(format!(
                    "row {line} {}: insert failed ({e})",
                    candidate.day.to_db_str()
                ));
                continue;
            }

            report.imported += 1;
            tx.record()?;
        }
    }

    tx.commit()?;

    ttlog_quiet(
        conn,
        "import_schedule",
        &opts.section,
        &format!(
            "replaced {} with {} assignments, skipped={} empty={} ({})",
            cleared, report.imported, report.skipped, report.empty, opts.academic_year
        ),
    );

    Ok(report)
}
