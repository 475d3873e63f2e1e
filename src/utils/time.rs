//! Clock parsing for timetable labels and time-period rows.

use chrono::NaiveTime;

/// Parse `H:MM:SS` or `H:MM` (one or two hour digits).
pub fn parse_clock(t: &str) -> Option<NaiveTime> {
    let t = t.trim();
    NaiveTime::parse_from_str(t, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M"))
        .ok()
}

pub fn format_clock(t: &NaiveTime) -> String {
    t.format("%H:%M:%S").to_string()
}
