use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;
use std::path::Path;

mod common;
use common::{rb, setup_test_db, temp_out, temp_sheet, write_sheet};

fn init(db: &str) {
    rb().args(["--db", db, "--test", "init"]).assert().success();
}

/// Reference rows for one secondary section, added through `refs`.
fn provision(db: &str) {
    let steps: [&[&str]; 6] = [
        &["refs", "add-section", "--grade", "7", "--name", "1° año"],
        &["refs", "add-teacher", "LUISA ELENA ABREU"],
        &["refs", "add-subject", "MATEMÁTICAS"],
        &["refs", "add-period", "1", "--start", "07:00", "--end", "07:40"],
        &["refs", "add-period", "Receso", "--start", "07:40", "--end", "08:00", "--break"],
        &["refs", "add-classroom", "Aula 1", "--capacity", "30"],
    ];
    for args in steps {
        rb().args(["--db", db]).args(args).assert().success();
    }
}

#[test]
fn test_init_creates_database() {
    let db = setup_test_db("cli_init");
    init(&db);
    assert!(Path::new(&db).exists());

    rb().args(["--db", &db, "db", "--check"])
        .assert()
        .success()
        .stdout(contains("Integrity check passed").and(contains("No pending migrations")));
}

#[test]
fn test_refs_listing() {
    let db = setup_test_db("cli_refs");
    init(&db);
    provision(&db);

    rb().args(["--db", &db, "refs", "list", "sections"])
        .assert()
        .success()
        .stdout(contains("1° año"));

    rb().args(["--db", &db, "refs", "list", "periods"])
        .assert()
        .success()
        .stdout(contains("07:00:00").and(contains("Receso")));

    rb().args(["--db", &db, "refs", "add-section", "--grade", "12"])
        .assert()
        .failure()
        .stderr(contains("Invalid grade level"));
}

#[test]
fn test_schedule_import_and_timetable() {
    let db = setup_test_db("cli_schedule");
    init(&db);
    provision(&db);

    let sheet = temp_sheet("cli_schedule");
    write_sheet(
        &sheet,
        "Horario",
        &[
            vec!["HORARIO"],
            vec!["HORA", "LUNES", "MARTES"],
            vec!["7:00 - 7:40", "MATEMÁTICA\nLUISA ABREU", "---"],
            vec!["RECESO", "RECESO", "RECESO"],
        ],
    );
    let sheet = sheet.to_string_lossy().to_string();

    rb().args([
        "--db", &db, "import", "schedule", "--file", &sheet, "--section", "1° año",
    ])
    .assert()
    .success()
    .stdout(contains("Schedule import: 1 imported"));

    rb().args(["--db", &db, "timetable", "--section", "1° año"])
        .assert()
        .success()
        .stdout(
            contains("lunes")
                .and(contains("MATEMÁTICAS"))
                .and(contains("LUISA ELENA ABREU")),
        );

    rb().args([
        "--db", &db, "import", "schedule", "--file", &sheet, "--section", "5° año",
    ])
    .assert()
    .failure()
    .stderr(contains("Section '5° año' not found"));
}

#[test]
fn test_school_month_flow() {
    let db = setup_test_db("cli_month_flow");
    init(&db);

    let roster = temp_sheet("cli_month_flow_roster");
    write_sheet(
        &roster,
        "Estudiantes",
        &[
            vec!["MATRÍCULA"],
            vec![],
            vec!["Nombre", "Apellido", "Grado", "Sección", "Género"],
            vec!["Ana", "Pérez", "1er año", "A", "Femenino"],
            vec!["Luis", "Gómez", "1er año", "A", "Masculino"],
        ],
    );
    let roster = roster.to_string_lossy().to_string();

    rb().args(["--db", &db, "import", "roster", "--file", &roster])
        .assert()
        .success()
        .stdout(contains("Roster import: 2 imported"));

    // ids follow insertion order on a fresh database
    rb().args([
        "--db", &db, "attendance", "mark", "--section", "1° año A", "--date", "2025-10-01",
        "--absent", "2",
    ])
    .assert()
    .success()
    .stdout(contains("1 present, 1 absent"));

    rb().args([
        "--db", &db, "attendance", "show", "--student", "2", "--period", "2025-10",
    ])
    .assert()
    .success()
    .stdout(contains("0.0%"));

    rb().args([
        "--db", &db, "summary", "--month", "2025-10", "--working-days", "1",
    ])
    .assert()
    .success()
    .stdout(contains("1 grade summaries computed").and(contains("1° año")));

    rb().args(["--db", &db, "summary", "--month", "2025-10", "--list"])
        .assert()
        .success()
        .stdout(contains("50.00"));

    let out = temp_out("cli_month_flow", "csv");
    rb().args([
        "--db", &db, "export", "--month", "2025-10", "--format", "csv", "--file", &out,
    ])
    .assert()
    .success();

    let content = fs::read_to_string(&out).expect("read exported csv");
    assert!(content.contains("1° año,1,1,1,2,1,1,0.5,50.0"));

    rb().args(["--db", &db, "log", "--print"])
        .assert()
        .success()
        .stdout(
            contains("import_roster")
                .and(contains("attendance"))
                .and(contains("summary"))
                .and(contains("export")),
        );
}

#[test]
fn test_alerts_without_data() {
    let db = setup_test_db("cli_alerts_empty");
    init(&db);

    rb().args(["--db", &db, "alerts", "--scan", "--as-of", "2025-10-31", "--list"])
        .assert()
        .success()
        .stdout(contains("Scanned 0 students").and(contains("No active alerts.")));
}

#[test]
fn test_invalid_arguments_fail() {
    let db = setup_test_db("cli_invalid_args");
    init(&db);

    rb().args(["--db", &db, "summary", "--month", "2025-13"])
        .assert()
        .failure()
        .stderr(contains("Invalid month"));

    rb().args(["--db", &db, "--academic-year", "2025", "summary", "--month", "2025-10"])
        .assert()
        .failure()
        .stderr(contains("Invalid academic year"));

    rb().args([
        "--db", &db, "attendance", "show", "--student", "99", "--period", "2025-10",
    ])
    .assert()
    .failure()
    .stderr(contains("Student 99 not found"));

    rb().args([
        "--db", &db, "export", "--month", "2025-10", "--format", "csv", "--file", "rel.csv",
    ])
    .assert()
    .failure()
    .stderr(contains("must be absolute"));
}

#[test]
fn test_backup_compressed() {
    let db = setup_test_db("cli_backup");
    init(&db);

    let dest = temp_out("cli_backup", "sqlite");
    let zip = dest.replace(".sqlite", ".zip");
    fs::remove_file(&zip).ok();

    rb().args(["--db", &db, "backup", "--file", &dest, "--compress", "--force"])
        .assert()
        .success();

    assert!(Path::new(&zip).exists());
    assert!(!Path::new(&dest).exists());
}

#[test]
fn test_db_info() {
    let db = setup_test_db("cli_db_info");
    init(&db);

    rb().args(["--db", &db, "db", "--info"])
        .assert()
        .success()
        .stdout(contains("Students").and(contains("Monthly summaries")));
}

/// Roster sheet with the usual title rows; returns its path as a string.
fn roster_file(name: &str, students: &[[&str; 5]]) -> String {
    let path = temp_sheet(name);
    let mut grid = vec![
        vec!["MATRÍCULA"],
        vec![],
        vec!["Nombre", "Apellido", "Grado", "Sección", "Género"],
    ];
    grid.extend(students.iter().map(|s| s.to_vec()));
    write_sheet(&path, "Estudiantes", &grid);
    path.to_string_lossy().to_string()
}

#[test]
fn test_attendance_mark_uses_the_configured_academic_year() {
    let db = setup_test_db("cli_two_years");
    init(&db);

    let old = roster_file(
        "cli_two_years_old",
        &[
            ["Ana", "Pérez", "1er año", "", "Femenino"],
            ["Luis", "Gómez", "1er año", "", "Masculino"],
        ],
    );
    rb().args(["--db", &db, "--academic-year", "2025-2026", "import", "roster", "--file", &old])
        .assert()
        .success();

    let new = roster_file("cli_two_years_new", &[["Sofía", "Rojas", "1er año", "", "Femenino"]]);
    rb().args(["--db", &db, "--academic-year", "2026-2027", "import", "roster", "--file", &new])
        .assert()
        .success()
        .stdout(contains("Roster import: 1 imported"));

    rb().args([
        "--db", &db, "--academic-year", "2026-2027", "attendance", "mark", "--section", "1° año",
        "--date", "2026-10-01",
    ])
    .assert()
    .success()
    .stdout(contains("1 present, 0 absent"));
}
