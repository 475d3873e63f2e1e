//! Workbook reading (xlsx, xls, ods through calamine) into a plain text grid.

pub mod cell;

use crate::errors::{AppError, AppResult};
use calamine::{Reader, open_workbook_auto};
use std::path::Path;

/// One worksheet as text: `rows[r][c]`, blank cells as empty strings.
#[derive(Debug, Clone)]
pub struct SheetGrid {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl SheetGrid {
    /// Trimmed cell text, `None` for blank or out-of-range cells.
    pub fn text(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

/// Read a worksheet. `sheet = None` picks the first one.
pub fn read_sheet(path: &Path, sheet: Option<&str>) -> AppResult<SheetGrid> {
    if !path.exists() {
        return Err(AppError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{}: file not found", path.display()),
        )));
    }

    let mut workbook = open_workbook_auto(path)?;
    let names = workbook.sheet_names().to_vec();

    let name = match sheet {
        Some(wanted) => names
            .iter()
            .find(|n| n.trim().eq_ignore_ascii_case(wanted.trim()))
            .cloned()
            .ok_or_else(|| AppError::SheetNotFound(wanted.to_string()))?,
        None => names
            .first()
            .cloned()
            .ok_or_else(|| AppError::SheetNotFound("(first sheet)".into()))?,
    };

    let range = workbook.worksheet_range(&name)?;

    // calamine ranges start at the first used cell; pad back to A1 so that
    // row/column offsets match what the operator sees in the workbook.
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<String>> = vec![Vec::new(); row_offset];
    for r in range.rows() {
        let mut line = vec![String::new(); col_offset];
        line.extend(r.iter().map(cell::cell_to_string));
        rows.push(line);
    }

    Ok(SheetGrid { name, rows })
}
