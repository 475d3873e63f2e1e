//! Roster rows: the raw text pulled from the student spreadsheet and the
//! normalized record built from it.

use super::{gender::Gender, section_letter::SectionLetter};
use chrono::NaiveDate;
use serde::Serialize;

/// One spreadsheet row, every field as the cell text (already trimmed,
/// `None` for blank cells).
#[derive(Debug, Clone, Default)]
pub struct RawRosterRow {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub grade: Option<String>,
    pub section: Option<String>,
    pub birth_date: Option<String>,
    pub national_id: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterRecord {
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub national_id: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Gender,
    /// 0 = pre-primary, 1-6 primary, 7-11 secondary. `None` when unmapped.
    pub grade_level: Option<u8>,
    pub section_letter: SectionLetter,
    pub phone: Option<String>,
}

impl RosterRecord {
    /// Unmapped grade names land in grade 1.
    pub const FALLBACK_GRADE: u8 = 1;

    pub fn effective_grade(&self) -> u8 {
        self.grade_level.unwrap_or(Self::FALLBACK_GRADE)
    }
}
