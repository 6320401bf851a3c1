//! Vendor adapters
//!
//! One `VendorAdapter` implementation per backend. Each adapter owns its
//! connection, creates the bookkeeping table on construction, and runs a
//! migration body plus its bookkeeping statement according to the
//! configured `TransactionMode`.

mod sqlite;

#[cfg(feature = "mysql")]
mod mysql;
#[cfg(feature = "postgres")]
mod postgres;

pub use sqlite::SqliteAdapter;

#[cfg(feature = "mysql")]
pub use self::mysql::MySqlAdapter;
#[cfg(feature = "postgres")]
pub use self::postgres::PostgresAdapter;

use dbmigrate_core::errors::{MigrateError, Result};

/// Default bookkeeping table name
pub const DEFAULT_TABLE: &str = "dbmigrations";

/// How a migration body and its bookkeeping statement are grouped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionMode {
    /// Body and bookkeeping statement commit or roll back together
    #[default]
    PerMigration,
    /// Body first, then the bookkeeping statement, with no enclosing
    /// transaction. Needed for bodies that manage their own transactions
    /// or run statements the backend refuses inside one.
    TwoStep,
}

/// Settings shared by every adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Bookkeeping table name
    pub table: String,
    pub transaction_mode: TransactionMode,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            transaction_mode: TransactionMode::default(),
        }
    }
}

impl AdapterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_transaction_mode(mut self, mode: TransactionMode) -> Self {
        self.transaction_mode = mode;
        self
    }

    /// Check that the table name is a plain identifier.
    ///
    /// The name is interpolated into SQL, so anything outside
    /// `[A-Za-z_][A-Za-z0-9_]*` is rejected.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the name is empty or contains other characters.
    pub fn validate(&self) -> Result<()> {
        let mut chars = self.table.chars();
        let valid = match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        };

        if valid {
            Ok(())
        } else {
            Err(MigrateError::InvalidTableName {
                table: self.table.clone(),
            }
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbmigrate_core::errors::ExErrorKind;

    #[test]
    fn test_default_config() {
        let config = AdapterConfig::default();
        assert_eq!(config.table, "dbmigrations");
        assert_eq!(config.transaction_mode, TransactionMode::PerMigration);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_valid_table_names() {
        for table in ["schema_migrations", "_log", "m2"] {
            assert!(AdapterConfig::new().with_table(table).validate().is_ok(), "{}", table);
        }
    }

    #[test]
    fn test_invalid_table_names() {
        for table in ["", "2fast", "bad-name", "x; DROP TABLE y", "a.b", "tåble"] {
            let err = AdapterConfig::new()
                .with_table(table)
                .validate()
                .unwrap_err();
            assert_eq!(err.kind(), ExErrorKind::InvalidInput, "{}", table);
        }
    }
}
