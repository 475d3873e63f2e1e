mod common;
use common::date;
use rollbook::core::normalizer::{
    build_roster_record, determine_gender, normalize_grade_level, normalize_section_letter,
    parse_birth_date, parse_national_id,
};
use rollbook::models::gender::Gender;
use rollbook::models::roster::{RawRosterRow, RosterRecord};
use rollbook::models::section_letter::SectionLetter;

#[test]
fn test_grade_table_maps_every_documented_name() {
    let expected = [
        ("1er grupo", 0),
        ("2do grupo", 0),
        ("3er grupo", 0),
        ("1er grado", 1),
        ("2do grado", 2),
        ("3er grado", 3),
        ("4to grado", 4),
        ("5to grado", 5),
        ("6to grado", 6),
        ("1er año", 7),
        ("2do año", 8),
        ("3er año", 9),
        ("4to año", 10),
        ("5to año", 11),
    ];

    for (name, grade) in expected {
        assert_eq!(normalize_grade_level(name), Some(grade), "{name}");
    }
}

#[test]
fn test_grade_matching_ignores_case_spacing_and_dots() {
    assert_eq!(normalize_grade_level("  2DO GRADO "), Some(2));
    assert_eq!(normalize_grade_level("4to.   Año"), Some(10));
    assert_eq!(normalize_grade_level("1er. grupo"), Some(0));
}

#[test]
fn test_unknown_grade_is_none() {
    assert_eq!(normalize_grade_level("7mo grado"), None);
    assert_eq!(normalize_grade_level(""), None);
    assert_eq!(normalize_grade_level("primero"), None);
}

#[test]
fn test_section_letter() {
    assert_eq!(normalize_section_letter("a"), SectionLetter::A);
    assert_eq!(normalize_section_letter(" D "), SectionLetter::D);
    assert_eq!(normalize_section_letter("B (tarde)"), SectionLetter::B);
    assert_eq!(normalize_section_letter("E"), SectionLetter::Unassigned);
    assert_eq!(normalize_section_letter(""), SectionLetter::Unassigned);
}

#[test]
fn test_birth_date_formats() {
    let d = date(2012, 3, 7);
    assert_eq!(parse_birth_date("07/03/2012"), Some(d));
    assert_eq!(parse_birth_date("2012-03-07"), Some(d));
    assert_eq!(parse_birth_date("07-03-2012"), Some(d));
    assert_eq!(parse_birth_date("2012-03-07 00:00:00"), Some(d));

    assert_eq!(parse_birth_date("31/02/2012"), None);
    assert_eq!(parse_birth_date("marzo 2012"), None);
}

#[test]
fn test_national_id_cleanup() {
    assert_eq!(parse_national_id("V-12 345 678"), Some("V12345678".to_string()));
    assert_eq!(parse_national_id("30123456"), Some("30123456".to_string()));

    assert_eq!(parse_national_id("  - "), None);
    assert_eq!(parse_national_id("12.345.678"), None);
    assert_eq!(parse_national_id("123456789012345678901"), None);
}

#[test]
fn test_gender() {
    assert_eq!(determine_gender("Femenino"), Gender::Female);
    assert_eq!(determine_gender("MASCULINO"), Gender::Male);
    assert_eq!(determine_gender("f"), Gender::Female);
    assert_eq!(determine_gender(" M "), Gender::Male);
    assert_eq!(determine_gender("otro"), Gender::Unknown);
    assert_eq!(determine_gender(""), Gender::Unknown);
}

#[test]
fn test_build_record_full_row() {
    let raw = RawRosterRow {
        first_name: Some("  Ana   María ".into()),
        last_name: Some("Pérez".into()),
        grade: Some("3er año".into()),
        section: Some("b".into()),
        birth_date: Some("15/01/2011".into()),
        national_id: Some("V-31.000".into()),
        gender: Some("Femenino".into()),
        phone: Some("0414 555 1234".into()),
    };

    let rec = build_roster_record(&raw).expect("record");
    assert_eq!(rec.first_name, "Ana María");
    assert_eq!(rec.full_name, "Ana María Pérez");
    assert_eq!(rec.grade_level, Some(9));
    assert_eq!(rec.section_letter, SectionLetter::B);
    assert_eq!(rec.birth_date, Some(date(2011, 1, 15)));
    // dots are not allowed in an id
    assert_eq!(rec.national_id, None);
    assert_eq!(rec.gender, Gender::Female);
    assert_eq!(rec.phone.as_deref(), Some("0414 555 1234"));
}

#[test]
fn test_build_record_requires_first_name() {
    let raw = RawRosterRow {
        last_name: Some("Pérez".into()),
        grade: Some("1er grado".into()),
        ..Default::default()
    };
    assert!(build_roster_record(&raw).is_none());

    let blank = RawRosterRow {
        first_name: Some("   ".into()),
        ..Default::default()
    };
    assert!(build_roster_record(&blank).is_none());
}

#[test]
fn test_unmapped_grade_falls_back_to_first_grade() {
    let raw = RawRosterRow {
        first_name: Some("Luis".into()),
        grade: Some("kinder".into()),
        ..Default::default()
    };

    let rec = build_roster_record(&raw).expect("record");
    assert_eq!(rec.full_name, "Luis");
    assert_eq!(rec.grade_level, None);
    assert_eq!(rec.effective_grade(), RosterRecord::FALLBACK_GRADE);
    assert_eq!(rec.section_letter, SectionLetter::Unassigned);
    assert_eq!(rec.gender, Gender::Unknown);
}
