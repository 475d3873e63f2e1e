mod common;
use common::{YEAR, clock, open_test_db, seed_reference, temp_sheet, write_sheet};
use rollbook::core::aliases::AliasTable;
use rollbook::core::import_schedule::{ScheduleImportOptions, import_schedule};
use rollbook::db::assignments::{count_for_section, list_for_section};
use rollbook::db::reference;
use rollbook::models::section_letter::SectionLetter;
use rollbook::errors::AppError;
use rollbook::models::weekday::Weekday;
use std::path::Path;

fn options(section: &str) -> ScheduleImportOptions {
    ScheduleImportOptions {
        sheet: None,
        section: section.to_string(),
        header_rows: 2,
        academic_year: YEAR.to_string(),
        tenant_id: 1,
        batch_size: 2,
    }
}

fn timetable(path: &Path) {
    write_sheet(
        path,
        "1er año",
        &[
            vec!["HORARIO 1° AÑO 2025-2026"],
            vec!["HORA", "LUNES", "MARTES", "MIÉRCOLES", "JUEVES", "VIERNES"],
            vec![
                "7:00:00 - 7:40:00",
                "MATEMÁTICA\nLUISA ABREU",
                "INGLÉS\nMARIA NIETO",
                "---",
                "",
                "CASTELLANO\nCARLOS PEREZ",
            ],
            vec![
                "7:40:00 - 8:20:00",
                "IDIOMAS\nMARÍA NIETO",
                "ASTRONOMÍA\nLUISA ABREU",
                "MATEMÁTICAS\nPEDRO GOMEZ",
                "INGLÉS",
                "",
            ],
            vec!["RECESO", "RECESO", "RECESO", "RECESO", "RECESO", "RECESO"],
            vec!["9:00:00 - 9:40:00", "MATEMÁTICAS\nLUISA ABREU"],
            vec!["1:00:00 - 1:40:00", "", "", "RECESO", "", "INGLÉS\\nMARIA NIETO"],
        ],
    );
}

#[test]
fn test_schedule_import_counts() {
    let conn = open_test_db("schedule_import_counts");
    let seed = seed_reference(&conn);
    let path = temp_sheet("schedule_import_counts");
    timetable(&path);

    let report = import_schedule(&conn, &path, &options("1° año"), &AliasTable::builtin())
        .expect("import");

    // row 3: three classes; row 4: one; 13:00 row: one
    assert_eq!(report.imported, 5);
    // unknown subject, unknown teacher, missing teacher, missing 09:00 period
    assert_eq!(report.skipped, 4);
    assert_eq!(report.empty, 11);
    assert!(report.warnings.iter().any(|w| w.contains("subject not found: ASTRONOMÍA")));
    assert!(report.warnings.iter().any(|w| w.contains("teacher not found: PEDRO GOMEZ")));
    assert!(report.warnings.iter().any(|w| w.contains("time period not found: 09:00:00 - 09:40:00")));

    assert_eq!(count_for_section(&conn, seed.section_id, YEAR).expect("count"), 5);
}

#[test]
fn test_schedule_rows_are_resolved_to_canonical_names() {
    let conn = open_test_db("schedule_import_names");
    let seed = seed_reference(&conn);
    let path = temp_sheet("schedule_import_names");
    timetable(&path);

    import_schedule(&conn, &path, &options("1° año"), &AliasTable::builtin()).expect("import");

    let rows = list_for_section(&conn, seed.section_id, YEAR).expect("list");
    assert_eq!(rows.len(), 5);

    let first = &rows[0];
    assert_eq!(first.day, Weekday::Monday);
    assert_eq!(first.start_time, "07:00:00");
    assert_eq!(first.subject, "MATEMÁTICAS");
    assert_eq!(first.teacher, "LUISA ELENA ABREU");
    assert_eq!(first.classroom, "Aula 1");

    let afternoon = rows.last().expect("last row");
    assert_eq!(afternoon.day, Weekday::Friday);
    assert_eq!(afternoon.start_time, "13:00:00");
    assert_eq!(afternoon.subject, "INGLÉS");
    assert_eq!(afternoon.teacher, "MARIA NIETO");
}

#[test]
fn test_schedule_reimport_replaces_assignments() {
    let conn = open_test_db("schedule_reimport");
    let seed = seed_reference(&conn);
    let path = temp_sheet("schedule_reimport");
    timetable(&path);
    let aliases = AliasTable::builtin();

    import_schedule(&conn, &path, &options("1° año"), &aliases).expect("first");
    let second = import_schedule(&conn, &path, &options("1° año"), &aliases).expect("second");

    assert_eq!(second.imported, 5);
    assert_eq!(count_for_section(&conn, seed.section_id, YEAR).expect("count"), 5);
}

#[test]
fn test_schedule_unknown_section_aborts_before_writing() {
    let conn = open_test_db("schedule_unknown_section");
    seed_reference(&conn);
    let path = temp_sheet("schedule_unknown_section");
    timetable(&path);

    let total = |conn: &rusqlite::Connection| -> i64 {
        conn.query_row("SELECT COUNT(*) FROM schedule_assignments", [], |r| r.get(0))
            .expect("count")
    };

    assert!(matches!(
        import_schedule(&conn, &path, &options("4° año"), &AliasTable::builtin()),
        Err(AppError::SectionNotFound(_))
    ));
    assert_eq!(total(&conn), 0);
}

#[test]
fn test_schedule_unreadable_sheet_keeps_existing_timetable() {
    let conn = open_test_db("schedule_unreadable");
    let seed = seed_reference(&conn);
    let path = temp_sheet("schedule_unreadable");
    timetable(&path);
    let aliases = AliasTable::builtin();

    import_schedule(&conn, &path, &options("1° año"), &aliases).expect("import");

    let mut opts = options("1° año");
    opts.sheet = Some("2do año".into());
    assert!(matches!(
        import_schedule(&conn, &path, &opts, &aliases),
        Err(AppError::SheetNotFound(_))
    ));

    assert_eq!(count_for_section(&conn, seed.section_id, YEAR).expect("count"), 5);
}

#[test]
fn test_schedule_custom_alias_table() {
    let conn = open_test_db("schedule_custom_alias");
    let seed = seed_reference(&conn);
    let path = temp_sheet("schedule_custom_alias");
    write_sheet(
        &path,
        "Hoja1",
        &[
            vec![],
            vec!["HORA", "LUNES"],
            vec!["7:00 - 7:40", "MATE\nPROF. PEREZ"],
        ],
    );

    // without the aliases nothing resolves
    let plain = import_schedule(&conn, &path, &options("1° año"), &AliasTable::builtin())
        .expect("import");
    assert_eq!(plain.imported, 0);
    assert_eq!(plain.skipped, 1);

    let mut aliases = AliasTable::builtin();
    aliases.subjects.insert("MATE".into(), "MATEMÁTICAS".into());
    aliases.teachers.insert("PROF. PEREZ".into(), "CARLOS PEREZ".into());

    let report = import_schedule(&conn, &path, &options("1° año"), &aliases).expect("import");
    assert_eq!(report.imported, 1);
    assert_eq!(report.empty, 4);

    let rows = list_for_section(&conn, seed.section_id, YEAR).expect("list");
    assert_eq!(rows[0].teacher, "CARLOS PEREZ");
}

#[test]
fn test_schedule_import_targets_the_section_of_its_academic_year() {
    const NEXT: &str = "2026-2027";

    let conn = open_test_db("schedule_two_years");
    let seed = seed_reference(&conn);
    reference::insert_section_if_absent(&conn, "1° año", 7, SectionLetter::Unassigned, 35, NEXT)
        .expect("next year section");
    let next_section = reference::find_section_by_name(&conn, "1° año", NEXT)
        .expect("lookup")
        .expect("next year section exists");
    assert_ne!(next_section, seed.section_id);

    for (name, start, end) in [("1", (7, 0), (7, 40)), ("2", (7, 40), (8, 20)), ("7", (13, 0), (13, 40))] {
        reference::insert_time_period(&conn, name, clock(start.0, start.1), clock(end.0, end.1), false, NEXT)
            .expect("period");
    }

    let path = temp_sheet("schedule_two_years");
    timetable(&path);
    let aliases = AliasTable::builtin();

    import_schedule(&conn, &path, &options("1° año"), &aliases).expect("this year");
    let next = ScheduleImportOptions {
        academic_year: NEXT.to_string(),
        ..options("1° año")
    };
    let report = import_schedule(&conn, &path, &next, &aliases).expect("next year");
    assert_eq!(report.imported, 5);

    assert_eq!(count_for_section(&conn, next_section, NEXT).expect("count"), 5);
    assert_eq!(count_for_section(&conn, seed.section_id, NEXT).expect("count"), 0);
    // last year's timetable is left alone
    assert_eq!(count_for_section(&conn, seed.section_id, YEAR).expect("count"), 5);
}
