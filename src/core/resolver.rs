//! Name → id resolution for imported rows.
//!
//! Lookups go alias table → canonical name → (teachers only) a
//! "FIRST LAST" fragment match. What happens when a reference is missing
//! depends on its kind, see [`ReferenceKind::missing_policy`].

use super::aliases::{AliasTable, name_key};
use crate::db::reference;
use crate::errors::{AppError, AppResult};
use crate::models::schedule::{AssignmentCandidate, ResolvedAssignment, TimeRange};
use crate::models::section_letter::SectionLetter;
use rusqlite::Connection;

pub const ASSIGNMENT_TYPE_REGULAR: &str = "regular";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Section,
    Subject,
    Teacher,
    TimePeriod,
    Classroom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Fatal, checked before anything is written.
    AbortImport,
    /// Drop this candidate, keep the rest of the row.
    SkipCandidate,
    /// Drop every candidate of the row.
    SkipRow,
    /// Fall back to the first active row; skip the candidate if there is none.
    UseFirstActive,
}

impl ReferenceKind {
    pub fn missing_policy(&self) -> MissingPolicy {
        match self {
            ReferenceKind::Section => MissingPolicy::AbortImport,
            ReferenceKind::Subject | ReferenceKind::Teacher => MissingPolicy::SkipCandidate,
            ReferenceKind::TimePeriod => MissingPolicy::SkipRow,
            ReferenceKind::Classroom => MissingPolicy::UseFirstActive,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReferenceKind::Section => "section",
            ReferenceKind::Subject => "subject",
            ReferenceKind::Teacher => "teacher",
            ReferenceKind::TimePeriod => "time period",
            ReferenceKind::Classroom => "classroom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    Found(T),
    Skipped(String),
}

impl<T> Resolution<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Resolution::Found(v) => Some(v),
            Resolution::Skipped(_) => None,
        }
    }
}

/// Active rows keyed by `name_key`. SQLite's UPPER() only folds ASCII, so
/// accented names are compared here instead of in SQL.
#[derive(Debug, Clone, Default)]
struct NameIndex {
    entries: Vec<(i64, String)>,
}

impl NameIndex {
    fn new(rows: Vec<(i64, String)>) -> Self {
        Self {
            entries: rows
                .into_iter()
                .map(|(id, name)| (id, name_key(&name)))
                .collect(),
        }
    }

    fn exact(&self, key: &str) -> Option<i64> {
        self.entries.iter().find(|(_, k)| k == key).map(|(id, _)| *id)
    }

    fn containing(&self, fragment: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(_, k)| k.contains(fragment))
            .map(|(id, _)| *id)
    }
}

/// Reference data snapshot used for one schedule import.
pub struct EntityResolver<'a> {
    aliases: &'a AliasTable,
    teachers: NameIndex,
    subjects: NameIndex,
    classroom: Option<i64>,
}

impl<'a> EntityResolver<'a> {
    pub fn load(conn: &Connection, aliases: &'a AliasTable) -> AppResult<Self> {
        Ok(Self {
            aliases,
            teachers: NameIndex::new(reference::active_teachers(conn)?),
            subjects: NameIndex::new(reference::active_subjects(conn)?),
            classroom: reference::first_active_classroom(conn)?,
        })
    }

    pub fn resolve_subject(&self, name: &str) -> Resolution<i64> {
        let mapped = self.aliases.subject(name).unwrap_or(name);

        match self.subjects.exact(&name_key(mapped)) {
            Some(id) => Resolution::Found(id),
            None => Resolution::Skipped(not_found(ReferenceKind::Subject, name, mapped)),
        }
    }

    pub fn resolve_teacher(&self, name: Option<&str>) -> Resolution<i64> {
        let Some(name) = name else {
            return Resolution::Skipped("no teacher in cell".into());
        };

        let mapped = self.aliases.teacher(name).unwrap_or(name);
        let key = name_key(mapped);

        if let Some(id) = self.teachers.exact(&key) {
            return Resolution::Found(id);
        }

        // "MARIA DEL CARMEN NIETO" in the sheet, "MARIA NIETO" somewhere in the db name
        let words: Vec<&str> = key.split(' ').collect();
        if words.len() >= 2 {
            let fragment = format!("{} {}", words[0], words[words.len() - 1]);
            if let Some(id) = self.teachers.containing(&fragment) {
                return Resolution::Found(id);
            }
        }

        Resolution::Skipped(not_found(ReferenceKind::Teacher, name, mapped))
    }

    pub fn classroom(&self) -> Resolution<i64> {
        match self.classroom {
            Some(id) => Resolution::Found(id),
            None => Resolution::Skipped("no active classroom".into()),
        }
    }

    /// Build the full assignment or report the first missing reference.
    pub fn resolve_candidate(
        &self,
        section_id: i64,
        time_period_id: i64,
        candidate: &AssignmentCandidate,
        academic_year: &str,
    ) -> Resolution<ResolvedAssignment> {
        let subject_id = match self.resolve_subject(&candidate.subject) {
            Resolution::Found(id) => id,
            Resolution::Skipped(r) => return Resolution::Skipped(r),
        };
        let teacher_id = match self.resolve_teacher(candidate.teacher.as_deref()) {
            Resolution::Found(id) => id,
            Resolution::Skipped(r) => return Resolution::Skipped(r),
        };
        let classroom_id = match self.classroom() {
            Resolution::Found(id) => id,
            Resolution::Skipped(r) => return Resolution::Skipped(r),
        };

        Resolution::Found(ResolvedAssignment {
            section_id,
            subject_id,
            teacher_id,
            classroom_id,
            time_period_id,
            day: candidate.day,
            academic_year: academic_year.to_string(),
            assignment_type: ASSIGNMENT_TYPE_REGULAR.to_string(),
        })
    }
}

fn not_found(kind: ReferenceKind, name: &str, mapped: &str) -> String {
    if name_key(name) == name_key(mapped) {
        format!("{} not found: {}", kind.label(), name.trim())
    } else {
        format!("{} not found: {} (mapped to: {})", kind.label(), name.trim(), mapped)
    }
}

pub fn resolve_time_period(
    conn: &Connection,
    time: &TimeRange,
    academic_year: &str,
) -> AppResult<Resolution<i64>> {
    let found = reference::find_time_period(conn, &time.start_str(), &time.end_str(), academic_year)?;

    Ok(match found {
        Some(id) => Resolution::Found(id),
        None => Resolution::Skipped(format!(
            "{} not found: {} - {}",
            ReferenceKind::TimePeriod.label(),
            time.start_str(),
            time.end_str()
        )),
    })
}

/// Target section of a schedule import (or a day's marks) within the
/// academic year. Missing is fatal.
pub fn resolve_section_by_name(conn: &Connection, name: &str, academic_year: &str) -> AppResult<i64> {
    reference::find_section_by_name(conn, name, academic_year)?
        .ok_or_else(|| AppError::SectionNotFound(name.trim().to_string()))
}

/// `Preescolar`, `3° grado`, `2° año B`...
pub fn section_display_name(grade_level: u8, letter: SectionLetter) -> String {
    let base = grade_label(grade_level);
    if letter.is_assigned() {
        format!("{} {}", base, letter.code())
    } else {
        base
    }
}

pub fn grade_label(grade_level: u8) -> String {
    match grade_level {
        0 => "Preescolar".to_string(),
        1..=6 => format!("{}° grado", grade_level),
        g => format!("{}° año", g - 6),
    }
}

/// Section for (grade, letter, year), created on first use.
pub fn ensure_section(
    conn: &Connection,
    grade_level: u8,
    letter: SectionLetter,
    academic_year: &str,
    capacity: i64,
) -> AppResult<i64> {
    if let Some(id) = reference::find_section(conn, grade_level, letter, academic_year)? {
        return Ok(id);
    }

    let name = section_display_name(grade_level, letter);
    reference::insert_section_if_absent(conn, &name, grade_level, letter, capacity, academic_year)?;

    reference::find_section(conn, grade_level, letter, academic_year)?.ok_or_else(|| {
        AppError::Other(format!(
            "section {} ({}) missing right after insert",
            name, academic_year
        ))
    })
}
