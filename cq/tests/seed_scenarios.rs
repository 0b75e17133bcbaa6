use std::io::Write;

use cq::{EngineConfig, run_sql};
use cq_core::Value;

/// Writes `content` to a fresh `users.csv` inside a temp directory and
/// returns (the tempdir, the file's path as a string) — the tempdir must
/// stay alive for the path to remain valid.
fn users_csv(content: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("users.csv");
    let mut file = std::fs::File::create(&path).expect("create users.csv");
    file.write_all(content.as_bytes()).expect("write users.csv");
    (dir, path.to_string_lossy().into_owned())
}

const USERS: &str = "name,age,role,active\nAlice,25,admin,1\nBob,30,user,1\nEve,42,admin,0\n";

#[test]
fn group_by_role_counts_and_orders_by_n_desc() {
    let (_dir, path) = users_csv(USERS);
    let sql = format!("SELECT role, COUNT(*) AS n FROM '{path}' GROUP BY role ORDER BY n DESC");
    let result = run_sql(&sql, &EngineConfig::default()).expect("query");

    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.rows[0][0], Value::String("admin".into()));
    assert_eq!(result.rows[0][1], Value::Integer(2));
    assert_eq!(result.rows[1][0], Value::String("user".into()));
    assert_eq!(result.rows[1][1], Value::Integer(1));
}

#[test]
fn where_with_and_and_between() {
    let (_dir, path) = users_csv(USERS);
    let sql = format!("SELECT name FROM '{path}' WHERE active = 1 AND age BETWEEN 20 AND 35");
    let result = run_sql(&sql, &EngineConfig::default()).expect("query");

    let names: Vec<&str> = result
        .rows
        .iter()
        .map(|r| r[0].as_str().expect("string"))
        .collect();
    assert_eq!(names, vec!["Alice", "Bob"]);
}

#[test]
fn row_number_partitioned_by_role_ordered_by_age() {
    let (_dir, path) = users_csv(USERS);
    let sql =
        format!("SELECT name, ROW_NUMBER() OVER (PARTITION BY role ORDER BY age) AS rn FROM '{path}'");
    let result = run_sql(&sql, &EngineConfig::default()).expect("query");

    let by_name = |name: &str| -> i64 {
        let row = result
            .rows
            .iter()
            .find(|r| r[0] == Value::String(name.into()))
            .expect("row present");
        match &row[1] {
            Value::Integer(i) => *i,
            other => panic!("expected integer row number, got {other:?}"),
        }
    };
    assert_eq!(by_name("Alice"), 1);
    assert_eq!(by_name("Eve"), 2);
    assert_eq!(by_name("Bob"), 1);
}

#[test]
fn like_prefix_match_selects_one_row() {
    let (_dir, path) = users_csv(USERS);
    let sql = format!("SELECT * FROM '{path}' WHERE name LIKE 'A%'");
    let result = run_sql(&sql, &EngineConfig::default()).expect("query");

    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0][0], Value::String("Alice".into()));
    assert_eq!(result.rows[0][1], Value::Integer(25));
    assert_eq!(result.rows[0][2], Value::String("admin".into()));
    assert_eq!(result.rows[0][3], Value::Integer(1));
}

#[test]
fn scalar_subquery_filters_above_average_age() {
    let (_dir, path) = users_csv(USERS);
    let sql = format!("SELECT name FROM '{path}' WHERE age > (SELECT AVG(age) FROM '{path}')");
    let result = run_sql(&sql, &EngineConfig::default()).expect("query");

    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0][0], Value::String("Eve".into()));
}

#[test]
fn union_without_all_dedupes_to_distinct_names() {
    let (_dir, path) = users_csv(USERS);
    let sql = format!("SELECT name FROM '{path}' UNION SELECT name FROM '{path}'");
    let result = run_sql(&sql, &EngineConfig::default()).expect("query");

    assert_eq!(result.rows.len(), 3);
}

#[test]
fn insert_then_delete_exact_match_is_idempotent_on_row_count() {
    let (_dir, path) = users_csv(USERS);
    let config = EngineConfig {
        allow_delete_without_where: false,
        ..EngineConfig::default()
    };

    let insert = format!("INSERT INTO '{path}' VALUES ('Carol', 28, 'user', 1)");
    run_sql(&insert, &config).expect("insert");

    let count_sql = format!("SELECT COUNT(*) AS n FROM '{path}'");
    let before = run_sql(&count_sql, &config).expect("count after insert");
    assert_eq!(before.rows[0][0], Value::Integer(4));

    let delete = format!("DELETE FROM '{path}' WHERE name = 'Carol' AND age = 28");
    run_sql(&delete, &config).expect("delete");

    let after = run_sql(&count_sql, &config).expect("count after delete");
    assert_eq!(after.rows[0][0], Value::Integer(3));
}

#[test]
fn delete_without_where_is_rejected_unless_allowed() {
    let (_dir, path) = users_csv(USERS);
    let sql = format!("DELETE FROM '{path}'");

    let rejected = run_sql(&sql, &EngineConfig::default());
    assert!(rejected.is_err());

    let allowed = EngineConfig {
        allow_delete_without_where: true,
        ..EngineConfig::default()
    };
    run_sql(&sql, &allowed).expect("delete with force flag");

    let count_sql = format!("SELECT COUNT(*) AS n FROM '{path}'");
    let after = run_sql(&count_sql, &allowed).expect("count after forced delete");
    assert_eq!(after.rows[0][0], Value::Integer(0));
}

#[test]
fn create_table_as_select_round_trips_row_multiset() {
    let (dir, path) = users_csv(USERS);
    let copy_path = dir.path().join("admins.csv").to_string_lossy().into_owned();
    let config = EngineConfig::default();

    let create = format!("CREATE TABLE '{copy_path}' AS SELECT name, role FROM '{path}' WHERE role = 'admin'");
    run_sql(&create, &config).expect("create table as select");

    let select = format!("SELECT name FROM '{copy_path}' ORDER BY name");
    let result = run_sql(&select, &config).expect("select from created table");
    let names: Vec<&str> = result.rows.iter().map(|r| r[0].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Alice", "Eve"]);
}

#[test]
fn alter_rename_column_is_reversible() {
    let (_dir, path) = users_csv(USERS);
    let config = EngineConfig::default();

    run_sql(&format!("ALTER TABLE '{path}' RENAME COLUMN age TO years"), &config).expect("rename");
    let renamed = run_sql(&format!("SELECT years FROM '{path}' WHERE name = 'Alice'"), &config)
        .expect("select renamed column");
    assert_eq!(renamed.rows[0][0], Value::Integer(25));

    run_sql(&format!("ALTER TABLE '{path}' RENAME COLUMN years TO age"), &config).expect("rename back");
    let restored = run_sql(&format!("SELECT age FROM '{path}' WHERE name = 'Alice'"), &config)
        .expect("select restored column");
    assert_eq!(restored.rows[0][0], Value::Integer(25));
}
