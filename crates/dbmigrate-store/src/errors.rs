//! Error helpers for dbmigrate-store
//!
//! Wrap driver and filesystem errors into the core `ExError` facility

use dbmigrate_core::errors::{ExError, ExErrorKind};
use std::path::Path;

/// Result type alias using ExError
pub use dbmigrate_core::errors::Result;

/// Create an error for a failed SQL statement on the given backend
pub fn sql_error(vendor: &str, err: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op(vendor.to_string())
        .with_message(err.to_string())
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    sql_error("sqlite", err)
}

/// Create an error for a connection that could not be established
pub fn connection_error(vendor: &str, err: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::Connection)
        .with_op("connect")
        .with_message(format!("{} connection failed: {}", vendor, err))
}

/// Create an IO error; a missing path maps to `NotFound`
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    let kind = match err.kind() {
        std::io::ErrorKind::NotFound => ExErrorKind::NotFound,
        _ => ExErrorKind::Io,
    };
    ExError::new(kind)
        .with_op(operation.to_string())
        .with_path(path.display().to_string())
        .with_message(err.to_string())
}
