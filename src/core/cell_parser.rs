//! Timetable grid parsing: time labels and `SUBJECT\nTEACHER` cells.

use crate::errors::{AppError, AppResult};
use crate::models::schedule::{AssignmentCandidate, ScheduleCell, TimeRange};
use crate::models::weekday::Weekday;
use crate::utils::time::parse_clock;

const BREAK_MARKER: &str = "RECESO";
const EMPTY_MARKER: &str = "---";

/// One timetable row after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    pub time: TimeRange,
    pub candidates: Vec<AssignmentCandidate>,
    /// Break and blank day cells.
    pub empty_cells: usize,
}

pub fn is_break(text: &str) -> bool {
    text.to_uppercase().contains(BREAK_MARKER)
}

/// `"7:00:00 - 7:40:00"` → 07:00:00..07:40:00. Afternoon periods are
/// written with a bare `1` hour, which means 13.
pub fn parse_time_range(label: &str) -> AppResult<TimeRange> {
    let invalid = || AppError::InvalidTime(label.trim().to_string());

    let (start, end) = label.split_once('-').ok_or_else(invalid)?;
    let start = parse_clock(&afternoon_hour(start)).ok_or_else(invalid)?;
    let end = parse_clock(&afternoon_hour(end)).ok_or_else(invalid)?;

    Ok(TimeRange { start, end })
}

fn afternoon_hour(side: &str) -> String {
    let side = side.trim();
    match side.split_once(':') {
        Some(("1", rest)) => format!("13:{rest}"),
        _ => side.to_string(),
    }
}

pub fn parse_cell(content: &str) -> ScheduleCell {
    let text = content.trim();

    if text.is_empty() || text == EMPTY_MARKER {
        return ScheduleCell::Empty;
    }
    if is_break(text) {
        return ScheduleCell::Break;
    }

    // Some exports carry the line break as a literal backslash-n
    let text = text.replace("\\n", "\n");
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

    match lines.next() {
        Some(subject) => ScheduleCell::Class {
            subject: subject.to_string(),
            teacher: lines.next().map(str::to_string),
        },
        None => ScheduleCell::Empty,
    }
}

/// `day_cells[0]` is Monday. Missing trailing columns count as empty.
pub fn candidates_for_row(time_label: &str, day_cells: &[Option<&str>]) -> AppResult<ParsedRow> {
    let time = parse_time_range(time_label)?;
    let mut candidates = Vec::new();
    let mut empty_cells = 0;

    for (idx, day) in Weekday::ALL.iter().enumerate() {
        let content = day_cells.get(idx).copied().flatten().unwrap_or_default();

        match parse_cell(content) {
            ScheduleCell::Class { subject, teacher } => candidates.push(AssignmentCandidate {
                day: *day,
                time,
                subject,
                teacher,
            }),
            ScheduleCell::Break | ScheduleCell::Empty => empty_cells += 1,
        }
    }

    Ok(ParsedRow {
        time,
        candidates,
        empty_cells,
    })
}
