/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Attendance percentage color:
/// below critical → red
/// below warning  → yellow
/// otherwise      → green
pub fn color_for_percentage(value: f64, warning_below: f64, critical_below: f64) -> &'static str {
    if value < critical_below {
        RED
    } else if value < warning_below {
        YELLOW
    } else {
        GREEN
    }
}
