// Integration tests for the migration framework

use parampersist_store::migrations::{applied_migrations, apply_migrations};
use rusqlite::Connection;

fn setup_test_db() -> Connection {
    Connection::open_in_memory().expect("Failed to create in-memory database")
}

fn get_table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

#[test]
fn test_apply_migrations_on_empty_db() {
    // Given: An empty SQLite database
    let mut conn = setup_test_db();

    // When: Migrations are applied
    let result = apply_migrations(&mut conn);

    // Then: The schema tables exist
    assert!(result.is_ok(), "Migrations should succeed: {:?}", result.err());
    assert_eq!(
        get_table_names(&conn),
        vec!["instances", "params", "schema_version"]
    );
}

#[test]
fn test_migrations_are_idempotent() {
    // Given: A database with migrations applied
    let mut conn = setup_test_db();
    apply_migrations(&mut conn).unwrap();

    // When: Migrations are applied again
    apply_migrations(&mut conn).unwrap();

    // Then: Each migration is recorded once
    assert_eq!(applied_migrations(&conn).unwrap(), vec!["001_instances_and_params"]);
}

#[test]
fn test_params_index_exists() {
    let mut conn = setup_test_db();
    apply_migrations(&mut conn).unwrap();

    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='index' AND name='idx_params_instance_id'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
}
