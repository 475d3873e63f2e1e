mod common;
use common::{YEAR, add_student, date, open_test_db, seed_reference};
use rollbook::core::aggregator::{SummaryRequest, compute, compute_all};
use rollbook::core::attendance::{DayMarks, mark_section};
use rollbook::core::resolver::ensure_section;
use rollbook::db::summaries::{list_month, load_summary};
use rollbook::errors::AppError;
use rollbook::models::section_letter::SectionLetter;
use rollbook::models::summary::MonthlySummary;
use rusqlite::Connection;

fn october<'a>(working_days: Option<i64>, by: &'a str) -> SummaryRequest<'a> {
    SummaryRequest {
        month: 10,
        year: 2025,
        academic_year: YEAR,
        working_days,
        holidays: &[],
        calculated_by: by,
    }
}

/// Four first-year students (2 M, 1 F, 1 unknown) and two marked days.
fn first_year_with_attendance(conn: &Connection) -> Vec<i64> {
    let seed = seed_reference(conn);
    let ids = vec![
        add_student(conn, "Andrés", "M", 7, seed.section_id),
        add_student(conn, "Bruno", "M", 7, seed.section_id),
        add_student(conn, "Clara", "F", 7, seed.section_id),
        add_student(conn, "Dani", "", 7, seed.section_id),
    ];

    let day = |absent: Vec<i64>| DayMarks {
        absent,
        ..Default::default()
    };
    mark_section(conn, seed.section_id, date(2025, 10, 1), &day(vec![ids[1]]), YEAR).expect("day 1");
    mark_section(conn, seed.section_id, date(2025, 10, 2), &day(vec![ids[1], ids[2]]), YEAR)
        .expect("day 2");
    // outside the month
    mark_section(conn, seed.section_id, date(2025, 9, 30), &day(vec![]), YEAR).expect("september");

    ids
}

#[test]
fn test_summary_figures() {
    let conn = open_test_db("aggregator_figures");
    first_year_with_attendance(&conn);

    let s = compute(&conn, 7, &october(Some(2), "tester")).expect("summary");

    assert_eq!(s.section_count, 1);
    assert_eq!(s.male_students, 2);
    assert_eq!(s.female_students, 1);
    assert_eq!(s.total_students, 4);
    assert_eq!(s.working_days, 2);
    assert_eq!(s.attendance_sum, 5);
    assert!((s.average_attendance - 0.625).abs() < 1e-9);
    assert!((s.attendance_percentage - 62.5).abs() < 1e-9);
    assert_eq!(s.calculated_by, "tester");
}

#[test]
fn test_grade_without_students_is_all_zero() {
    let conn = open_test_db("aggregator_zero");

    let s = compute(&conn, 3, &october(None, "tester")).expect("summary");

    assert_eq!(s.total_students, 0);
    assert_eq!(s.section_count, 0);
    assert_eq!(s.attendance_sum, 0);
    assert_eq!(s.average_attendance, 0.0);
    assert_eq!(s.attendance_percentage, 0.0);
    assert_eq!(s.working_days, 23);

    let stored = load_summary(&conn, 3, 10, 2025).expect("load").expect("stored");
    assert_eq!(stored.total_students, 0);
}

#[test]
fn test_recompute_overwrites_single_row() {
    let conn = open_test_db("aggregator_upsert");
    first_year_with_attendance(&conn);

    compute(&conn, 7, &october(Some(2), "first")).expect("first");
    compute(&conn, 7, &october(Some(4), "second")).expect("second");

    let rows: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM monthly_attendance_summary
             WHERE grade_level = 7 AND month = 10 AND year = 2025",
            [],
            |r| r.get(0),
        )
        .expect("count");
    assert_eq!(rows, 1);

    let stored = load_summary(&conn, 7, 10, 2025).expect("load").expect("stored");
    assert_eq!(stored.working_days, 4);
    assert_eq!(stored.calculated_by, "second");
    assert!((stored.average_attendance - 5.0 / 16.0).abs() < 1e-9);
}

#[test]
fn test_compute_all_covers_grades_with_students() {
    let conn = open_test_db("aggregator_all");
    first_year_with_attendance(&conn);
    let primary = ensure_section(&conn, 2, SectionLetter::A, YEAR, 30).expect("section");
    add_student(&conn, "Elena", "F", 2, primary);

    let all = compute_all(&conn, &october(Some(2), "tester")).expect("all");
    let grades: Vec<u8> = all.iter().map(|s| s.grade_level).collect();
    assert_eq!(grades, vec![2, 7]);

    // no attendance recorded for grade 2
    assert_eq!(all[0].attendance_sum, 0);
    assert_eq!(all[0].average_attendance, 0.0);

    assert_eq!(list_month(&conn, 10, 2025).expect("list").len(), 2);
    assert!(list_month(&conn, 11, 2025).expect("list").is_empty());
}

#[test]
fn test_grade_out_of_range() {
    let conn = open_test_db("aggregator_bad_grade");
    assert!(matches!(
        compute(&conn, 12, &october(None, "tester")),
        Err(AppError::InvalidGrade(12))
    ));
}

#[test]
fn test_working_days_from_calendar() {
    let holidays = [date(2025, 10, 13), date(2025, 10, 11)];
    let req = SummaryRequest {
        holidays: &holidays,
        ..october(None, "tester")
    };
    // 23 weekdays, one of the holidays falls on a Saturday
    assert_eq!(req.effective_working_days(), 22);
    assert_eq!(october(Some(18), "tester").effective_working_days(), 18);
}

#[test]
fn test_average_guard() {
    assert_eq!(MonthlySummary::average(10, 0, 20), 0.0);
    assert_eq!(MonthlySummary::average(10, 5, 0), 0.0);
    assert!((MonthlySummary::average(90, 5, 20) - 0.9).abs() < 1e-9);
}
