mod common;
use common::{YEAR, open_test_db, setup_test_db};
use rollbook::db::initialize::init_db;
use rollbook::db::log::{read_log, ttlog};
use rollbook::db::migrate::{pending_migrations, run_pending_migrations};
use rollbook::db::pool::{BatchTx, DbPool};
use rollbook::db::reference::{active_teachers, insert_teacher};
use rusqlite::Connection;

fn teacher_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM teachers", [], |r| r.get(0))
        .expect("count")
}

#[test]
fn test_fresh_database_has_no_pending_migrations() {
    let conn = open_test_db("db_fresh");
    assert!(pending_migrations(&conn).expect("pending").is_empty());

    // running again is a no-op
    assert!(run_pending_migrations(&conn).expect("rerun").is_empty());

    let applied: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM log WHERE operation = 'migration_applied'",
            [],
            |r| r.get(0),
        )
        .expect("log rows");
    assert_eq!(applied, 6);
}

#[test]
fn test_init_twice_keeps_data() {
    let path = setup_test_db("db_init_twice");
    let pool = DbPool::new(&path).expect("open");
    assert_eq!(init_db(&pool.conn).expect("init"), 6);
    insert_teacher(&pool.conn, "MARIA NIETO", YEAR).expect("teacher");

    assert_eq!(init_db(&pool.conn).expect("second init"), 0);
    assert_eq!(active_teachers(&pool.conn).expect("teachers").len(), 1);
}

#[test]
fn test_batch_commits_every_n_records() {
    let conn = open_test_db("db_batch_commit");

    let mut tx = BatchTx::begin(&conn, 2).expect("begin");
    for i in 0..5 {
        insert_teacher(tx.conn(), &format!("TEACHER {i}"), YEAR).expect("insert");
        tx.record().expect("record");
    }
    assert_eq!(tx.commit().expect("commit"), 3);
    assert_eq!(teacher_count(&conn), 5);
}

#[test]
fn test_batch_drop_rolls_back_open_tail() {
    let conn = open_test_db("db_batch_drop");

    {
        let mut tx = BatchTx::begin(&conn, 2).expect("begin");
        for i in 0..3 {
            insert_teacher(tx.conn(), &format!("TEACHER {i}"), YEAR).expect("insert");
            tx.record().expect("record");
        }
        // dropped without commit
    }

    assert_eq!(teacher_count(&conn), 2);
}

#[test]
fn test_batch_explicit_rollback() {
    let conn = open_test_db("db_batch_rollback");

    let tx = BatchTx::begin(&conn, 10).expect("begin");
    insert_teacher(tx.conn(), "CARLOS PEREZ", YEAR).expect("insert");
    tx.rollback().expect("rollback");

    assert_eq!(teacher_count(&conn), 0);
}

#[test]
fn test_foreign_keys_are_enforced() {
    let path = setup_test_db("db_foreign_keys");
    let pool = DbPool::new(&path).expect("open");
    init_db(&pool.conn).expect("init");

    let result = pool.conn.execute(
        "INSERT INTO daily_attendance
            (student_id, attendance_date, present, academic_year, recorded_at)
         VALUES (999, '2025-10-01', 1, ?1, 'now')",
        [YEAR],
    );
    assert!(result.is_err());
}

#[test]
fn test_read_log_filters_by_operation_prefix() {
    let conn = open_test_db("db_read_log");
    ttlog(&conn, "import_roster", "roster.xlsx", "4 imported").expect("log");
    ttlog(&conn, "summary", "2025-10", "2 grades").expect("log");
    ttlog(&conn, "import_schedule", "1° año", "5 imported").expect("log");

    let imports = read_log(&conn, Some("import")).expect("read");
    let ops: Vec<&str> = imports.iter().map(|r| r.operation.as_str()).collect();
    assert_eq!(ops, ["import_roster", "import_schedule"]);
    assert_eq!(imports[1].target, "1° año");

    // migrations are logged too
    let all = read_log(&conn, None).expect("read all");
    assert_eq!(all.len(), 6 + 3);
    assert!(all.windows(2).all(|w| w[0].id < w[1].id));
}
