use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DailyAttendance {
    pub id: i64,
    pub student_id: i64,
    pub section_id: i64,
    pub date: NaiveDate,
    pub present: bool,
    pub excused: bool,
    pub late_arrival: bool,
    pub absence_reason: Option<String>,
    pub notes: Option<String>,
    pub recorded_by: Option<i64>,
    pub academic_year: String,
    pub recorded_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertSeverity {
    High,
    Critical,
}

impl AlertSeverity {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AlertSeverity::High => "high",
            AlertSeverity::Critical => "critical",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "high" => Some(AlertSeverity::High),
            "critical" => Some(AlertSeverity::Critical),
            _ => None,
        }
    }

    pub fn alert_type(&self) -> &'static str {
        match self {
            AlertSeverity::High => "chronic_absence_warning",
            AlertSeverity::Critical => "chronic_absence_critical",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceAlert {
    pub id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub alert_type: String,
    pub severity: AlertSeverity,
    pub message: String,
    pub absence_count: i64,
    pub absence_percentage: f64,
    pub period_days: i64,
    pub created_at: String,
}
