// End-to-end tests: Migrator driving a real SQLite database
// Migrations come from a temp directory or from memory

use dbmigrate_core::errors::ExErrorKind;
use dbmigrate_core::{MigrationState, Migrator, VendorAdapter};
use dbmigrate_core_types::Sensitive;
use dbmigrate_store::{connect, AdapterConfig, FileStorage, MemoryStorage, SqliteAdapter};
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_pair(dir: &Path, version: &str, name: &str, apply: &str, rollback: &str) {
    fs::write(dir.join(format!("{}-{}-apply.sql", version, name)), apply).unwrap();
    fs::write(dir.join(format!("{}-{}-rollback.sql", version, name)), rollback).unwrap();
}

fn setup_migrations() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp migrations directory");
    write_pair(
        dir.path(),
        "001",
        "users",
        "CREATE TABLE users (id INTEGER PRIMARY KEY, email TEXT NOT NULL);",
        "DROP TABLE users;",
    );
    write_pair(
        dir.path(),
        "002",
        "posts",
        "CREATE TABLE posts (id INTEGER PRIMARY KEY, user_id INTEGER REFERENCES users(id));",
        "DROP TABLE posts;",
    );
    write_pair(
        dir.path(),
        "003",
        "seed",
        "INSERT INTO users (email) VALUES ('a@example.com');",
        "DELETE FROM users;",
    );
    dir
}

fn tables(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

#[test]
fn test_apply_all_then_rollback_everything() {
    // Given: Three migrations on disk and an empty database
    let dir = setup_migrations();
    let storage = FileStorage::new(dir.path()).unwrap();
    let adapter = SqliteAdapter::open_in_memory(AdapterConfig::default()).unwrap();
    let mut migrator = Migrator::new(adapter, &storage).unwrap();

    // When: Applying everything
    let applied = migrator.apply_all().unwrap();

    // Then: All three ran in order and the schema exists
    assert_eq!(applied, vec!["001", "002", "003"]);
    assert_eq!(
        tables(migrator.adapter().connection()),
        vec!["dbmigrations", "posts", "users"]
    );

    // When: Rolling back three times
    assert_eq!(migrator.rollback_latest().unwrap().as_deref(), Some("003"));
    assert_eq!(migrator.rollback_latest().unwrap().as_deref(), Some("002"));
    assert_eq!(migrator.rollback_latest().unwrap().as_deref(), Some("001"));

    // Then: Only the bookkeeping table remains, and a fourth rollback is a no-op
    assert_eq!(tables(migrator.adapter().connection()), vec!["dbmigrations"]);
    assert_eq!(migrator.rollback_latest().unwrap(), None);
}

#[test]
fn test_apply_one_steps_through_pending() {
    let dir = setup_migrations();
    let storage = FileStorage::new(dir.path()).unwrap();
    let adapter = SqliteAdapter::open_in_memory(AdapterConfig::default()).unwrap();
    let mut migrator = Migrator::new(adapter, &storage).unwrap();

    assert_eq!(migrator.apply_one().unwrap().as_deref(), Some("001"));
    assert_eq!(migrator.pending().unwrap().len(), 2);
    assert_eq!(migrator.apply_one().unwrap().as_deref(), Some("002"));
    assert_eq!(migrator.apply_one().unwrap().as_deref(), Some("003"));
    assert_eq!(migrator.apply_one().unwrap(), None);
}

#[test]
fn test_failure_stops_and_resume_after_fix() {
    // Given: Migration 002 is broken
    let dir = setup_migrations();
    write_pair(
        dir.path(),
        "002",
        "posts",
        "CREATE TABLE posts (id INTEGER PRIMARY KEY,);",
        "DROP TABLE posts;",
    );
    let db = dir.path().join("app.db");

    // When: Applying everything
    let storage = FileStorage::new(dir.path()).unwrap();
    let adapter = SqliteAdapter::open(&db, AdapterConfig::default()).unwrap();
    let mut migrator = Migrator::new(adapter, &storage).unwrap();
    let err = migrator.apply_all().unwrap_err();

    // Then: 001 stays applied, 002 and 003 do not
    assert_eq!(err.version(), Some("002"));
    assert_eq!(
        migrator.adapter_mut().applied_migrations_asc().unwrap(),
        vec!["001"]
    );
    drop(migrator);

    // When: The file is fixed and a new run starts
    write_pair(
        dir.path(),
        "002",
        "posts",
        "CREATE TABLE posts (id INTEGER PRIMARY KEY, user_id INTEGER REFERENCES users(id));",
        "DROP TABLE posts;",
    );
    let storage = FileStorage::new(dir.path()).unwrap();
    let adapter = SqliteAdapter::open(&db, AdapterConfig::default()).unwrap();
    let mut migrator = Migrator::new(adapter, &storage).unwrap();

    // Then: Only the remaining versions run
    assert_eq!(migrator.apply_all().unwrap(), vec!["002", "003"]);
}

#[test]
fn test_status_reports_unknown_versions() {
    // Given: A database where a version unknown to this directory was applied
    let dir = setup_migrations();
    let storage = FileStorage::new(dir.path()).unwrap();
    let adapter = SqliteAdapter::open_in_memory(AdapterConfig::default()).unwrap();
    adapter
        .connection()
        .execute("INSERT INTO dbmigrations (version) VALUES ('000')", [])
        .unwrap();
    let mut migrator = Migrator::new(adapter, &storage).unwrap();
    migrator.apply_one().unwrap();

    // When: Asking for status
    let rows = migrator.status().unwrap();

    // Then: Unknown, applied and pending rows are ordered by version
    let summary: Vec<(&str, MigrationState)> = rows
        .iter()
        .map(|row| (row.version.as_str(), row.state))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("000", MigrationState::Unknown),
            ("001", MigrationState::Applied),
            ("002", MigrationState::Pending),
            ("003", MigrationState::Pending),
        ]
    );
    assert_eq!(
        migrator.adapter_mut().applied_migrations_asc().unwrap(),
        vec!["000", "001"]
    );
}

#[test]
fn test_memory_storage_through_connect() {
    // Given: Embedded migrations and a URL-selected adapter
    let storage = MemoryStorage::default()
        .with_pair("1", "kv", "CREATE TABLE kv (k TEXT PRIMARY KEY, v TEXT);", "DROP TABLE kv;")
        .with_pair("2", "seed", "INSERT INTO kv VALUES ('a', '1');", "DELETE FROM kv;");
    let url = Sensitive::new("sqlite::memory:".to_string());
    let adapter = connect(&url, AdapterConfig::default()).unwrap();

    // When: Applying through the boxed adapter
    let mut migrator = Migrator::new(adapter, &storage).unwrap();

    // Then: Both versions apply and roll back in order
    assert_eq!(migrator.apply_all().unwrap(), vec!["1", "2"]);
    assert_eq!(migrator.rollback_latest().unwrap().as_deref(), Some("2"));
    assert_eq!(migrator.adapter().vendor(), "sqlite");
}

#[test]
fn test_half_pair_blocks_migrator_construction() {
    let dir = setup_migrations();
    fs::remove_file(dir.path().join("003-seed-rollback.sql")).unwrap();

    let storage = FileStorage::new(dir.path()).unwrap();
    let adapter = SqliteAdapter::open_in_memory(AdapterConfig::default()).unwrap();
    let err = Migrator::new(adapter, &storage).err().unwrap();

    assert_eq!(err.kind(), ExErrorKind::MissingCounterpart);
    assert_eq!(err.message(), "rollback migration not found for version 003");
}
