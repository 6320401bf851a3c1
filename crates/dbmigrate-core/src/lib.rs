//! dbmigrate Core - migration model and apply/rollback orchestration
//!
//! This crate provides:
//! - The `MigrationPair` value (version, name, apply body, rollback body)
//! - The `VendorAdapter` and `MigrationStorage` capability traits
//! - The `Migrator` orchestrator: pending-set computation, ordered apply,
//!   rollback of the latest applied migration, status reporting
//! - The structured error facility and the logging facility
//!
//! Backends (SQLite, PostgreSQL, MySQL) and storage providers live in
//! `dbmigrate-store`; this crate never touches a database or the filesystem.

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod orchestrator;
pub mod ports;
pub mod status;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, MigrateError, Result};
pub use model::{MigrationPair, MigrationRole};
pub use orchestrator::Migrator;
pub use ports::{MigrationStorage, VendorAdapter};
pub use status::{MigrationState, MigrationStatus};
