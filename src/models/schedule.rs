//! Timetable types: what a grid cell says, what the parser extracts from a
//! row, and what the resolver turns that into.

use super::weekday::Weekday;
use crate::utils::time::format_clock;
use chrono::NaiveTime;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    pub fn start_str(&self) -> String {
        format_clock(&self.start)
    }

    pub fn end_str(&self) -> String {
        format_clock(&self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleCell {
    /// `RECESO`
    Break,
    /// blank or `---`
    Empty,
    Class {
        subject: String,
        teacher: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentCandidate {
    pub day: Weekday,
    pub time: TimeRange,
    pub subject: String,
    pub teacher: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedAssignment {
    pub section_id: i64,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub classroom_id: i64,
    pub time_period_id: i64,
    pub day: Weekday,
    pub academic_year: String,
    pub assignment_type: String,
}
