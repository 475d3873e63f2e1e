use crate::errors::AppResult;
use crate::models::attendance::{AlertSeverity, AttendanceAlert};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};

/// Figures written into an alert row.
#[derive(Debug, Clone)]
pub struct AlertDraft<'a> {
    pub student_id: i64,
    pub severity: AlertSeverity,
    pub message: &'a str,
    pub absence_count: i64,
    pub absence_percentage: f64,
    pub period_days: i64,
}

/// Active chronic-absence alert of the student, if any.
pub fn find_active_chronic(conn: &Connection, student_id: i64) -> AppResult<Option<i64>> {
    Ok(conn
        .query_row(
            "SELECT id FROM attendance_alerts
             WHERE student_id = ?1 AND is_active = 1
               AND alert_type IN ('chronic_absence_warning', 'chronic_absence_critical')
             ORDER BY id DESC LIMIT 1",
            [student_id],
            |r| r.get(0),
        )
        .optional()?)
}

pub fn insert_alert(conn: &Connection, d: &AlertDraft<'_>) -> AppResult<i64> {
    let now = Local::now().to_rfc3339();
    conn.execute(
        "INSERT INTO attendance_alerts
            (student_id, alert_type, severity, message, absence_count,
             absence_percentage, period_days, is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?8)",
        params![
            d.student_id,
            d.severity.alert_type(),
            d.severity.to_db_str(),
            d.message,
            d.absence_count,
            d.absence_percentage,
            d.period_days,
            now
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_alert(conn: &Connection, id: i64, d: &AlertDraft<'_>) -> AppResult<()> {
    conn.execute(
        "UPDATE attendance_alerts SET
            alert_type = ?1, severity = ?2, message = ?3, absence_count = ?4,
            absence_percentage = ?5, period_days = ?6, updated_at = ?7
         WHERE id = ?8",
        params![
            d.severity.alert_type(),
            d.severity.to_db_str(),
            d.message,
            d.absence_count,
            d.absence_percentage,
            d.period_days,
            Local::now().to_rfc3339(),
            id
        ],
    )?;
    Ok(())
}

pub fn list_active(conn: &Connection) -> AppResult<Vec<AttendanceAlert>> {
    let mut stmt = conn.prepare(
        "SELECT a.id, a.student_id, s.full_name, a.alert_type, a.severity, a.message,
                a.absence_count, a.absence_percentage, a.period_days, a.created_at
         FROM attendance_alerts a
         JOIN students s ON s.id = a.student_id
         WHERE a.is_active = 1
         ORDER BY CASE a.severity WHEN 'critical' THEN 0 ELSE 1 END, a.absence_percentage DESC",
    )?;

    let rows = stmt.query_map([], |r| {
        let severity: String = r.get(4)?;
        Ok(AttendanceAlert {
            id: r.get(0)?,
            student_id: r.get(1)?,
            student_name: r.get(2)?,
            alert_type: r.get(3)?,
            severity: AlertSeverity::from_db_str(&severity).unwrap_or(AlertSeverity::High),
            message: r.get(5)?,
            absence_count: r.get(6)?,
            absence_percentage: r.get(7)?,
            period_days: r.get(8)?,
            created_at: r.get(9)?,
        })
    })?;

    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
