//! Database URL parsing and runtime adapter selection

#![allow(clippy::result_large_err)]

use std::path::PathBuf;

use dbmigrate_core::errors::{MigrateError, Result};
use dbmigrate_core::ports::VendorAdapter;
use dbmigrate_core_types::Sensitive;
use tracing::info;

use crate::adapter::{AdapterConfig, SqliteAdapter};
use crate::dialect::Vendor;

const SQLITE_MEMORY: &str = ":memory:";

/// Where a database URL points
///
/// Only the SQLite target is kept; network URLs are handed to the driver
/// as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    SqliteFile(PathBuf),
    SqliteMemory,
    Postgres,
    MySql,
}

impl DatabaseUrl {
    /// Classify a URL by scheme.
    ///
    /// Accepted forms: `sqlite:<path>`, `sqlite://<path>`, `sqlite::memory:`,
    /// `postgres://...`, `postgresql://...`, `mysql://...`.
    ///
    /// # Errors
    ///
    /// `UnsupportedVendor` for a missing or unknown scheme, or a SQLite URL
    /// with no path.
    pub fn parse(url: &str) -> Result<Self> {
        let Some((scheme, rest)) = url.split_once(':') else {
            return Err(unsupported("<none>", "database URL has no scheme"));
        };

        match scheme.to_ascii_lowercase().as_str() {
            "sqlite" => {
                let target = rest.strip_prefix("//").unwrap_or(rest);
                match target {
                    "" => Err(unsupported("sqlite", "database URL has no file path")),
                    SQLITE_MEMORY => Ok(DatabaseUrl::SqliteMemory),
                    path => Ok(DatabaseUrl::SqliteFile(PathBuf::from(path))),
                }
            }
            "postgres" | "postgresql" => Ok(DatabaseUrl::Postgres),
            "mysql" => Ok(DatabaseUrl::MySql),
            other => Err(unsupported(other, "unknown URL scheme")),
        }
    }

    pub fn vendor(&self) -> Vendor {
        match self {
            DatabaseUrl::SqliteFile(_) | DatabaseUrl::SqliteMemory => Vendor::Sqlite,
            DatabaseUrl::Postgres => Vendor::Postgres,
            DatabaseUrl::MySql => Vendor::MySql,
        }
    }
}

/// Open a connection for `url` and wrap it in the matching adapter
///
/// # Errors
///
/// - `UnsupportedVendor` for an unknown scheme or a backend compiled out
/// - `InvalidInput` for a bad bookkeeping table name
/// - `Connection` / `Persistence` from the driver
pub fn connect(url: &Sensitive<String>, config: AdapterConfig) -> Result<Box<dyn VendorAdapter>> {
    let target = DatabaseUrl::parse(url.expose())?;
    info!(
        vendor = target.vendor().as_str(),
        table = %config.table,
        "connecting"
    );

    match target {
        DatabaseUrl::SqliteMemory => Ok(Box::new(SqliteAdapter::open_in_memory(config)?)),
        DatabaseUrl::SqliteFile(path) => Ok(Box::new(SqliteAdapter::open(path, config)?)),
        DatabaseUrl::Postgres => connect_postgres(url.expose(), config),
        DatabaseUrl::MySql => connect_mysql(url.expose(), config),
    }
}

#[cfg(feature = "postgres")]
fn connect_postgres(url: &str, config: AdapterConfig) -> Result<Box<dyn VendorAdapter>> {
    Ok(Box::new(crate::adapter::PostgresAdapter::connect(url, config)?))
}

#[cfg(not(feature = "postgres"))]
fn connect_postgres(_url: &str, _config: AdapterConfig) -> Result<Box<dyn VendorAdapter>> {
    Err(unsupported("postgres", "built without the `postgres` feature"))
}

#[cfg(feature = "mysql")]
fn connect_mysql(url: &str, config: AdapterConfig) -> Result<Box<dyn VendorAdapter>> {
    Ok(Box::new(crate::adapter::MySqlAdapter::connect(url, config)?))
}

#[cfg(not(feature = "mysql"))]
fn connect_mysql(_url: &str, _config: AdapterConfig) -> Result<Box<dyn VendorAdapter>> {
    Err(unsupported("mysql", "built without the `mysql` feature"))
}

fn unsupported(vendor: &str, reason: &str) -> dbmigrate_core::ExError {
    MigrateError::UnsupportedVendor {
        vendor: vendor.to_string(),
        reason: reason.to_string(),
    }
    .into()
}
