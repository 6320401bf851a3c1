//! dbmigrate Store - migration sources and database backends
//!
//! Provides:
//! - Storage providers: a directory of `<version>-<name>-(apply|rollback).sql`
//!   files, and an in-memory/embedded set
//! - Vendor adapters: SQLite (always built), PostgreSQL and MySQL (cargo
//!   features `postgres` / `mysql`)
//! - Database URL parsing and runtime adapter selection

pub mod adapter;
pub mod connect;
pub mod db;
pub mod dialect;
pub mod errors;
pub mod storage;

// Re-export key types
pub use adapter::{AdapterConfig, SqliteAdapter, TransactionMode};
pub use connect::{connect, DatabaseUrl};
pub use dialect::{BookkeepingSql, Vendor};
pub use errors::Result;
pub use storage::{FileStorage, MemoryStorage, MigrationFileName};

#[cfg(feature = "mysql")]
pub use adapter::MySqlAdapter;
#[cfg(feature = "postgres")]
pub use adapter::PostgresAdapter;
