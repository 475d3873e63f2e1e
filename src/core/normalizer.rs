//! Roster normalization: free-text spreadsheet fields → typed values.
//!
//! Nothing here fails. Unrecognized input becomes `None` (or the
//! `Unknown` / `Unassigned` variant) and the importer decides what to do.

use crate::models::gender::Gender;
use crate::models::roster::{RawRosterRow, RosterRecord};
use crate::models::section_letter::SectionLetter;
use chrono::NaiveDate;

/// Grade names as written by the school office.
const GRADE_TABLE: &[(&str, u8)] = &[
    ("1er grupo", 0),
    ("2do grupo", 0),
    ("3er grupo", 0),
    ("1er grado", 1),
    ("2do grado", 2),
    ("3er grado", 3),
    ("4to grado", 4),
    ("5to grado", 5),
    ("6to grado", 6),
    ("1er año", 7),
    ("2do año", 8),
    ("3er año", 9),
    ("4to año", 10),
    ("5to año", 11),
];

const BIRTH_DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y"];

const NATIONAL_ID_MAX_LEN: usize = 20;

/// `"2do. Grado"` → `Some(2)`, `"3er año"` → `Some(9)`, unknown → `None`.
pub fn normalize_grade_level(text: &str) -> Option<u8> {
    let lowered = text.trim().to_lowercase();
    // "1er. grado" and "1er grado" are the same grade
    let key = lowered
        .split_whitespace()
        .map(|w| w.trim_end_matches('.'))
        .collect::<Vec<_>>()
        .join(" ");

    GRADE_TABLE
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, grade)| *grade)
}

pub fn normalize_section_letter(text: &str) -> SectionLetter {
    let first = text
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_uppercase();

    match first.as_str() {
        "A" => SectionLetter::A,
        "B" => SectionLetter::B,
        "C" => SectionLetter::C,
        "D" => SectionLetter::D,
        _ => SectionLetter::Unassigned,
    }
}

pub fn parse_birth_date(text: &str) -> Option<NaiveDate> {
    let t = text.trim();
    // spreadsheet dates come back as "YYYY-MM-DD HH:MM:SS" when the cell has a time part
    let t = t.split_whitespace().next().unwrap_or(t);

    BIRTH_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(t, fmt).ok())
}

pub fn parse_national_id(text: &str) -> Option<String> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    if cleaned.is_empty()
        || cleaned.chars().count() > NATIONAL_ID_MAX_LEN
        || !cleaned.chars().all(char::is_alphanumeric)
    {
        return None;
    }
    Some(cleaned)
}

pub fn determine_gender(text: &str) -> Gender {
    let t = text.trim().to_lowercase();

    if t.contains("femenino") || t == "f" {
        Gender::Female
    } else if t.contains("masculino") || t == "m" {
        Gender::Male
    } else {
        Gender::Unknown
    }
}

/// `None` when the row has no first name.
pub fn build_roster_record(raw: &RawRosterRow) -> Option<RosterRecord> {
    let first_name = clean(raw.first_name.as_deref())?;
    let last_name = clean(raw.last_name.as_deref()).unwrap_or_default();

    let full_name = if last_name.is_empty() {
        first_name.clone()
    } else {
        format!("{first_name} {last_name}")
    };

    Some(RosterRecord {
        full_name,
        first_name,
        last_name,
        national_id: raw.national_id.as_deref().and_then(parse_national_id),
        birth_date: raw.birth_date.as_deref().and_then(parse_birth_date),
        gender: raw
            .gender
            .as_deref()
            .map(determine_gender)
            .unwrap_or(Gender::Unknown),
        grade_level: raw.grade.as_deref().and_then(normalize_grade_level),
        section_letter: raw
            .section
            .as_deref()
            .map(normalize_section_letter)
            .unwrap_or(SectionLetter::Unassigned),
        phone: clean(raw.phone.as_deref()),
    })
}

fn clean(v: Option<&str>) -> Option<String> {
    v.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
}
