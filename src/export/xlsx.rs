use crate::errors::{AppError, AppResult};
use crate::export::SummaryExport;
use crate::export::model::{get_headers, summary_to_row};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

const HEADER_BG: u32 = 0x2F75B5;
const BANDS: [u32; 2] = [0xEAF3FB, 0xFFFFFF];
const TOTAL_BG: u32 = 0xD9E1F2;
const MAX_COL_WIDTH: usize = 28;

fn xlsx_err(e: rust_xlsxwriter::XlsxError) -> AppError {
    AppError::Export(e.to_string())
}

/// Worksheet plus the widest text seen per column.
struct GradeSheet<'a> {
    ws: &'a mut Worksheet,
    widths: Vec<usize>,
}

impl GradeSheet<'_> {
    fn put(&mut self, row: u32, col: usize, text: &str, fmt: &Format) -> AppResult<()> {
        let c = col as u16;
        match text.parse::<f64>() {
            Ok(n) => self
                .ws
                .write_with_format(row, c, n, &fmt.clone().set_align(FormatAlign::Right)),
            Err(_) => self.ws.write_with_format(row, c, text, fmt),
        }
        .map_err(xlsx_err)?;

        if let Some(w) = self.widths.get_mut(col) {
            *w = (*w).max(text.width());
        }
        Ok(())
    }

    fn fit_columns(&mut self) -> AppResult<()> {
        for (c, w) in self.widths.iter().enumerate() {
            self.ws
                .set_column_width(c as u16, ((*w).min(MAX_COL_WIDTH) + 2) as f64)
                .map_err(xlsx_err)?;
        }
        Ok(())
    }
}

fn cell_format(bg: u32) -> Format {
    Format::new()
        .set_background_color(Color::RGB(bg))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin)
}

/// Header row, one banded row per grade, then a TOTAL line with the
/// additive columns only.
pub(crate) fn export_xlsx(rows: &[SummaryExport], sheet_name: &str, path: &Path) -> AppResult<()> {
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.set_name(sheet_name).map_err(xlsx_err)?;
    ws.set_freeze_panes(1, 0).map_err(xlsx_err)?;

    let headers = get_headers();
    let mut sheet = GradeSheet {
        widths: headers.iter().map(|h| h.width()).collect(),
        ws,
    };

    let header_fmt = cell_format(HEADER_BG)
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_text_wrap();
    for (col, h) in headers.iter().enumerate() {
        sheet.put(0, col, h, &header_fmt)?;
    }

    for (i, item) in rows.iter().enumerate() {
        let fmt = cell_format(BANDS[i % 2]);
        for (col, value) in summary_to_row(item).iter().enumerate() {
            sheet.put(i as u32 + 1, col, value, &fmt)?;
        }
    }

    let sum = |f: fn(&SummaryExport) -> i64| rows.iter().map(f).sum::<i64>().to_string();
    let totals = [
        "TOTAL".to_string(),
        sum(|r| r.section_count),
        sum(|r| r.male),
        sum(|r| r.female),
        sum(|r| r.total),
        String::new(),
        sum(|r| r.attendance_sum),
    ];
    let total_fmt = cell_format(TOTAL_BG).set_bold();
    let total_row = rows.len() as u32 + 1;
    for (col, value) in totals.iter().enumerate() {
        sheet.put(total_row, col, value, &total_fmt)?;
    }

    sheet.fit_columns()?;
    workbook.save(path).map_err(xlsx_err)?;
    Ok(())
}
