use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use rusqlite::{Connection, OptionalExtension};

/// A schema step, applied once and recorded in `log` as `migration_applied`.
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250901_0001_reference_tables",
        description: "Created sections, teachers, subjects, time_periods and classrooms",
        sql: r#"
        CREATE TABLE IF NOT EXISTS sections (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            name           TEXT NOT NULL,
            grade_level    INTEGER NOT NULL CHECK(grade_level BETWEEN 0 AND 11),
            section_letter TEXT NOT NULL DEFAULT 'U' CHECK(section_letter IN ('A','B','C','D','U')),
            max_students   INTEGER NOT NULL DEFAULT 35,
            academic_year  TEXT NOT NULL,
            is_active      INTEGER NOT NULL DEFAULT 1,
            created_at     TEXT NOT NULL
        );
        CREATE UNIQUE INDEX IF NOT EXISTS ux_sections_grade_letter_year
            ON sections(grade_level, section_letter, academic_year);
        CREATE INDEX IF NOT EXISTS idx_sections_name ON sections(name);

        CREATE TABLE IF NOT EXISTS teachers (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            teacher_name  TEXT NOT NULL,
            national_id   TEXT,
            academic_year TEXT NOT NULL,
            is_active     INTEGER NOT NULL DEFAULT 1,
            created_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS subjects (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            subject_name  TEXT NOT NULL,
            short_name    TEXT,
            academic_year TEXT NOT NULL,
            is_active     INTEGER NOT NULL DEFAULT 1,
            created_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS time_periods (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            period_name   TEXT NOT NULL,
            start_time    TEXT NOT NULL,
            end_time      TEXT NOT NULL,
            is_break      INTEGER NOT NULL DEFAULT 0,
            display_order INTEGER NOT NULL DEFAULT 0,
            academic_year TEXT NOT NULL,
            is_active     INTEGER NOT NULL DEFAULT 1
        );
        CREATE INDEX IF NOT EXISTS idx_time_periods_range
            ON time_periods(start_time, end_time, academic_year);

        CREATE TABLE IF NOT EXISTS classrooms (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            name       TEXT NOT NULL,
            capacity   INTEGER NOT NULL DEFAULT 35,
            is_active  INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20250901_0002_students",
        description: "Created students",
        sql: r#"
        CREATE TABLE IF NOT EXISTS students (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name      TEXT NOT NULL,
            last_name       TEXT NOT NULL DEFAULT '',
            full_name       TEXT NOT NULL,
            national_id     TEXT,
            birth_date      TEXT,
            gender          TEXT NOT NULL DEFAULT 'U' CHECK(gender IN ('M','F','U')),
            grade_level     INTEGER NOT NULL CHECK(grade_level BETWEEN 0 AND 11),
            section_id      INTEGER REFERENCES sections(id),
            phone           TEXT,
            enrollment_date TEXT,
            academic_year   TEXT NOT NULL,
            is_active       INTEGER NOT NULL DEFAULT 1,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );
        CREATE UNIQUE INDEX IF NOT EXISTS ux_students_national_id_year
            ON students(national_id, academic_year);
        CREATE INDEX IF NOT EXISTS idx_students_name_grade_year
            ON students(full_name, grade_level, academic_year);
        CREATE INDEX IF NOT EXISTS idx_students_grade_year_active
            ON students(grade_level, academic_year, is_active);
        "#,
    },
    Migration {
        version: "20250915_0003_schedule_assignments",
        description: "Created schedule_assignments",
        sql: r#"
        CREATE TABLE IF NOT EXISTS schedule_assignments (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            tenant_id       INTEGER NOT NULL,
            section_id      INTEGER NOT NULL REFERENCES sections(id),
            subject_id      INTEGER NOT NULL REFERENCES subjects(id),
            teacher_id      INTEGER NOT NULL REFERENCES teachers(id),
            classroom_id    INTEGER NOT NULL REFERENCES classrooms(id),
            time_period_id  INTEGER NOT NULL REFERENCES time_periods(id),
            day_of_week     TEXT NOT NULL
                CHECK(day_of_week IN ('lunes','martes','miercoles','jueves','viernes')),
            academic_year   TEXT NOT NULL,
            assignment_type TEXT NOT NULL DEFAULT 'regular',
            is_active       INTEGER NOT NULL DEFAULT 1,
            created_at      TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_assignments_section_year
            ON schedule_assignments(section_id, academic_year);
        "#,
    },
    Migration {
        version: "20250920_0004_daily_attendance",
        description: "Created daily_attendance",
        sql: r#"
        CREATE TABLE IF NOT EXISTS daily_attendance (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id      INTEGER NOT NULL REFERENCES students(id),
            section_id      INTEGER REFERENCES sections(id),
            attendance_date TEXT NOT NULL,
            present         INTEGER NOT NULL,
            excused         INTEGER NOT NULL DEFAULT 0,
            late_arrival    INTEGER NOT NULL DEFAULT 0,
            absence_reason  TEXT,
            notes           TEXT,
            recorded_by     INTEGER,
            academic_year   TEXT NOT NULL,
            recorded_at     TEXT NOT NULL,
            UNIQUE(student_id, attendance_date)
        );
        CREATE INDEX IF NOT EXISTS idx_attendance_date ON daily_attendance(attendance_date);
        "#,
    },
    Migration {
        version: "20251001_0005_monthly_attendance_summary",
        description: "Created monthly_attendance_summary",
        sql: r#"
        CREATE TABLE IF NOT EXISTS monthly_attendance_summary (
            id                    INTEGER PRIMARY KEY AUTOINCREMENT,
            grade_level           INTEGER NOT NULL CHECK(grade_level BETWEEN 0 AND 11),
            month                 INTEGER NOT NULL CHECK(month BETWEEN 1 AND 12),
            year                  INTEGER NOT NULL,
            academic_year         TEXT NOT NULL,
            section_count         INTEGER NOT NULL DEFAULT 0,
            male_students         INTEGER NOT NULL DEFAULT 0,
            female_students       INTEGER NOT NULL DEFAULT 0,
            total_students        INTEGER NOT NULL DEFAULT 0,
            working_days          INTEGER NOT NULL DEFAULT 0,
            attendance_sum        INTEGER NOT NULL DEFAULT 0,
            average_attendance    REAL NOT NULL DEFAULT 0,
            attendance_percentage REAL NOT NULL DEFAULT 0,
            calculated_at         TEXT NOT NULL,
            calculated_by         TEXT NOT NULL,
            UNIQUE(grade_level, month, year)
        );
        "#,
    },
    Migration {
        version: "20251010_0006_attendance_alerts",
        description: "Created attendance_alerts",
        sql: r#"
        CREATE TABLE IF NOT EXISTS attendance_alerts (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id         INTEGER NOT NULL REFERENCES students(id),
            alert_type         TEXT NOT NULL,
            severity           TEXT NOT NULL CHECK(severity IN ('high','critical')),
            message            TEXT NOT NULL,
            absence_count      INTEGER NOT NULL,
            absence_percentage REAL NOT NULL,
            period_days        INTEGER NOT NULL,
            is_active          INTEGER NOT NULL DEFAULT 1,
            created_at         TEXT NOT NULL,
            updated_at         TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_alerts_student_active
            ON attendance_alerts(student_id, is_active);
        "#,
    },
];

/// Ensure that the `log` table exists. Every other table is versioned.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Versions not yet recorded in `log`.
pub fn pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(m.sql)
        .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;

    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;

    tx.commit()?;
    success(format!("Migration applied: {} → {}", m.version, m.description));
    Ok(())
}

fn backup_before_migration(db_path: &str) -> AppResult<()> {
    use chrono::Local;
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::Path;
    use zip::CompressionMethod;
    use zip::ZipWriter;
    use zip::write::FileOptions;

    let zip_err = |stage: &str, e: &dyn std::fmt::Display| {
        AppError::Migration(format!("Backup failed ({}): {}", stage, e))
    };

    let backup_name = format!(
        "{}-backup_db_pre_migration.zip",
        Local::now().format("%Y%m%d_%H%M%S")
    );

    let parent = Path::new(db_path)
        .parent()
        .ok_or_else(|| AppError::Migration(format!("No parent directory for {}", db_path)))?;
    let backup_path = parent.join(&backup_name);

    let file = File::create(&backup_path).map_err(|e| zip_err("create", &e))?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("database.sqlite", options)
        .map_err(|e| zip_err("start_file", &e))?;

    let db_content = fs::read(db_path).map_err(|e| zip_err("read", &e))?;
    zip.write_all(&db_content)
        .map_err(|e| zip_err("write_all", &e))?;
    zip.finish().map_err(|e| zip_err("finish", &e))?;

    success(format!("📦 Backup created: {}", backup_path.display()));
    Ok(())
}

/// Public entry point: run all pending migrations in version order.
///
/// An existing database (at least one migration already recorded) is
/// zipped next to itself before it is upgraded.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let pending = pending_migrations(conn)?;
    if pending.is_empty() {
        return Ok(pending);
    }

    let upgrading = pending.len() < MIGRATIONS.len();
    if upgrading {
        warning("Existing schema detected, creating a safety backup before migration...");

        let db_path: String = conn
            .query_row("PRAGMA database_list;", [], |row| row.get::<_, String>(2))
            .unwrap_or_default();

        if db_path.is_empty() {
            warning("Could not determine DB path, backup skipped.");
        } else {
            backup_before_migration(&db_path)?;
        }
    }

    for m in MIGRATIONS.iter().filter(|m| pending.contains(&m.version)) {
        apply(conn, m)?;
    }

    Ok(pending)
}
