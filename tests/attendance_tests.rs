mod common;
use common::{YEAR, add_student, date, open_test_db, seed_reference};
use chrono::NaiveDate;
use rollbook::core::attendance::{
    AlertThresholds, DayMarks, mark_section, scan_chronic_absence, student_percentage,
};
use rollbook::db::alerts::list_active;
use rollbook::db::attendance::load_student_attendance;
use rollbook::errors::AppError;
use rollbook::models::attendance::AlertSeverity;
use rusqlite::Connection;

/// School days from 2025-10-01 on, weekends skipped.
fn school_days(n: usize) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut d = date(2025, 10, 1);
    while out.len() < n {
        if !rollbook::utils::date::is_weekend(&d) {
            out.push(d);
        }
        d = d.succ_opt().expect("next day");
    }
    out
}

fn thresholds() -> AlertThresholds {
    AlertThresholds {
        days_back: 30,
        min_days: 10,
        warning_below: 80.0,
        critical_below: 70.0,
    }
}

/// Three students over ten days: absent 4, 2 and 3 times.
fn ten_days(conn: &Connection) -> (i64, i64, i64, i64) {
    let seed = seed_reference(conn);
    let a = add_student(conn, "Ana", "F", 7, seed.section_id);
    let b = add_student(conn, "Beto", "M", 7, seed.section_id);
    let c = add_student(conn, "Caro", "F", 7, seed.section_id);

    for (i, day) in school_days(10).into_iter().enumerate() {
        let mut absent = Vec::new();
        if i < 4 {
            absent.push(a);
        }
        if i < 2 {
            absent.push(b);
        }
        if i < 3 {
            absent.push(c);
        }
        let marks = DayMarks {
            absent,
            ..Default::default()
        };
        mark_section(conn, seed.section_id, day, &marks, YEAR).expect("mark");
    }

    (seed.section_id, a, b, c)
}

#[test]
fn test_mark_section_flags() {
    let conn = open_test_db("attendance_mark_flags");
    let seed = seed_reference(&conn);
    let a = add_student(&conn, "Ana", "F", 7, seed.section_id);
    let b = add_student(&conn, "Beto", "M", 7, seed.section_id);
    let c = add_student(&conn, "Caro", "F", 7, seed.section_id);
    let day = date(2025, 10, 6);

    let marks = DayMarks {
        absent: vec![b],
        excused: vec![c],
        late: vec![a, 999],
        recorded_by: Some(1),
    };
    let report = mark_section(&conn, seed.section_id, day, &marks, YEAR).expect("mark");

    assert_eq!(report.present, 1);
    assert_eq!(report.absent, 2);
    assert_eq!(report.marked(), 3);
    assert_eq!(report.unknown_ids, vec![999]);

    let ana = load_student_attendance(&conn, a, day, day).expect("ana");
    assert!(ana[0].present);
    assert!(ana[0].late_arrival);
    assert_eq!(ana[0].recorded_by, Some(1));

    let caro = load_student_attendance(&conn, c, day, day).expect("caro");
    assert!(!caro[0].present);
    assert!(caro[0].excused);
    assert_eq!(caro[0].absence_reason.as_deref(), Some("excused"));
}

#[test]
fn test_remarking_a_day_overwrites_it() {
    let conn = open_test_db("attendance_remark");
    let seed = seed_reference(&conn);
    let a = add_student(&conn, "Ana", "F", 7, seed.section_id);
    let day = date(2025, 10, 6);

    let absent = DayMarks {
        absent: vec![a],
        ..Default::default()
    };
    mark_section(&conn, seed.section_id, day, &absent, YEAR).expect("first");
    mark_section(&conn, seed.section_id, day, &DayMarks::default(), YEAR).expect("second");

    let rows = load_student_attendance(&conn, a, day, day).expect("rows");
    assert_eq!(rows.len(), 1);
    assert!(rows[0].present);
}

#[test]
fn test_section_without_students() {
    let conn = open_test_db("attendance_empty_section");
    let seed = seed_reference(&conn);

    let report = mark_section(&conn, seed.section_id, date(2025, 10, 6), &DayMarks::default(), YEAR)
        .expect("mark");
    assert_eq!(report.marked(), 0);
}

#[test]
fn test_student_percentage() {
    let conn = open_test_db("attendance_percentage");
    let (_, a, b, _) = ten_days(&conn);

    let (pct, present, total) =
        student_percentage(&conn, a, date(2025, 10, 1), date(2025, 10, 31)).expect("a");
    assert_eq!((present, total), (6, 10));
    assert!((pct - 60.0).abs() < 1e-9);

    // first week only: Oct 1-3
    let (pct, present, total) =
        student_percentage(&conn, b, date(2025, 10, 1), date(2025, 10, 3)).expect("b");
    assert_eq!((present, total), (1, 3));
    assert!((pct - 100.0 / 3.0).abs() < 1e-9);

    // nothing recorded
    let (pct, _, total) =
        student_percentage(&conn, a, date(2025, 11, 1), date(2025, 11, 30)).expect("empty");
    assert_eq!((pct, total), (0.0, 0));

    assert!(matches!(
        student_percentage(&conn, 4242, date(2025, 10, 1), date(2025, 10, 31)),
        Err(AppError::StudentNotFound(4242))
    ));
}

#[test]
fn test_severity_thresholds() {
    let t = thresholds();
    assert_eq!(t.severity_for(69.9), Some(AlertSeverity::Critical));
    assert_eq!(t.severity_for(70.0), Some(AlertSeverity::High));
    assert_eq!(t.severity_for(79.9), Some(AlertSeverity::High));
    assert_eq!(t.severity_for(80.0), None);
}

#[test]
fn test_scan_raises_then_refreshes_alerts() {
    let conn = open_test_db("attendance_alert_scan");
    let (_, a, _, c) = ten_days(&conn);
    let as_of = date(2025, 10, 14);

    let first = scan_chronic_absence(&conn, YEAR, as_of, &thresholds()).expect("scan");
    assert_eq!(first.scanned, 3);
    assert_eq!(first.raised, 2);
    assert_eq!(first.updated, 0);

    let second = scan_chronic_absence(&conn, YEAR, as_of, &thresholds()).expect("rescan");
    assert_eq!(second.raised, 0);
    assert_eq!(second.updated, 2);

    let alerts = list_active(&conn).expect("alerts");
    assert_eq!(alerts.len(), 2);

    assert_eq!(alerts[0].student_id, a);
    assert_eq!(alerts[0].severity, AlertSeverity::Critical);
    assert_eq!(alerts[0].alert_type, "chronic_absence_critical");
    assert_eq!(alerts[0].absence_count, 4);
    assert_eq!(alerts[0].period_days, 10);
    assert!((alerts[0].absence_percentage - 40.0).abs() < 1e-9);

    assert_eq!(alerts[1].student_id, c);
    assert_eq!(alerts[1].severity, AlertSeverity::High);
}

#[test]
fn test_scan_requires_minimum_days() {
    let conn = open_test_db("attendance_alert_min_days");
    ten_days(&conn);

    let strict = AlertThresholds {
        min_days: 11,
        ..thresholds()
    };
    let report = scan_chronic_absence(&conn, YEAR, date(2025, 10, 14), &strict).expect("scan");
    assert_eq!(report.insufficient, 3);
    assert_eq!(report.raised, 0);
    assert!(list_active(&conn).expect("alerts").is_empty());
}

#[test]
fn test_scan_window_ends_at_as_of() {
    let conn = open_test_db("attendance_alert_window");
    ten_days(&conn);

    // only the first five school days fall inside the window
    let report = scan_chronic_absence(&conn, YEAR, date(2025, 10, 7), &thresholds()).expect("scan");
    assert_eq!(report.insufficient, 3);
}
