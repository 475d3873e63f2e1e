use serde::Serialize;

/// Per-grade monthly attendance summary (one row per grade/month/year).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub grade_level: u8,
    pub month: u32,
    pub year: i32,
    pub academic_year: String,
    pub section_count: i64,
    pub male_students: i64,
    pub female_students: i64,
    pub total_students: i64,
    pub working_days: i64,
    pub attendance_sum: i64,
    pub average_attendance: f64,
    pub attendance_percentage: f64,
    pub calculated_at: String,
    pub calculated_by: String,
}

impl MonthlySummary {
    /// attendance_sum / (total_students * working_days), 0 when undefined.
    pub fn average(attendance_sum: i64, total_students: i64, working_days: i64) -> f64 {
        let denominator = total_students * working_days;
        if denominator > 0 {
            attendance_sum as f64 / denominator as f64
        } else {
            0.0
        }
    }
}
