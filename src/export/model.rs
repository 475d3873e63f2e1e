// src/export/model.rs

use crate::core::resolver::grade_label;
use crate::models::summary::MonthlySummary;
use serde::Serialize;

/// One line of the ministry's monthly report, headings as printed on the form.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SummaryExport {
    #[serde(rename = "GRADO")]
    pub grade: String,
    #[serde(rename = "CANTIDAD DE SECCIONES")]
    pub section_count: i64,
    /// varones
    #[serde(rename = "V")]
    pub male: i64,
    /// hembras
    #[serde(rename = "H")]
    pub female: i64,
    #[serde(rename = "TOTAL")]
    pub total: i64,
    #[serde(rename = "DÍAS HABILES")]
    pub working_days: i64,
    #[serde(rename = "SUMATORIA DE LA ASISTENCIA")]
    pub attendance_sum: i64,
    #[serde(rename = "PROMEDIO DE ASISTENCIA")]
    pub average: f64,
    #[serde(rename = "PORCENTAJE DE ASISTENCIA")]
    pub percentage: f64,
}

impl From<&MonthlySummary> for SummaryExport {
    fn from(s: &MonthlySummary) -> Self {
        Self {
            grade: grade_label(s.grade_level),
            section_count: s.section_count,
            male: s.male_students,
            female: s.female_students,
            total: s.total_students,
            working_days: s.working_days,
            attendance_sum: s.attendance_sum,
            average: round2(s.average_attendance),
            percentage: round2(s.attendance_percentage),
        }
    }
}

/// JSON document: the rows plus the month they belong to.
#[derive(Serialize, Clone, Debug)]
pub struct MatriculaReport {
    pub month: u32,
    pub year: i32,
    pub academic_year: String,
    pub generated_at: String,
    pub total_students: i64,
    pub average_attendance: f64,
    pub data: Vec<SummaryExport>,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Headings in column order (CSV / XLSX)
pub(crate) fn get_headers() -> Vec<&'static str> {
    vec![
        "GRADO",
        "CANTIDAD DE SECCIONES",
        "V",
        "H",
        "TOTAL",
        "DÍAS HABILES",
        "SUMATORIA DE LA ASISTENCIA",
        "PROMEDIO DE ASISTENCIA",
        "PORCENTAJE DE ASISTENCIA",
    ]
}

pub(crate) fn summary_to_row(e: &SummaryExport) -> Vec<String> {
    vec![
        e.grade.clone(),
        e.section_count.to_string(),
        e.male.to_string(),
        e.female.to_string(),
        e.total.to_string(),
        e.working_days.to_string(),
        e.attendance_sum.to_string(),
        format!("{:.2}", e.average),
        format!("{:.2}", e.percentage),
    ]
}
