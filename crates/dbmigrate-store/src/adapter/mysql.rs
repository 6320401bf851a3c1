#![allow(clippy::result_large_err)]

use dbmigrate_core::errors::Result;
use dbmigrate_core::model::{MigrationPair, MigrationRole};
use dbmigrate_core::ports::VendorAdapter;
use mysql::prelude::Queryable;
use mysql::{Conn, Opts, TxOpts};
use tracing::debug;

use super::{AdapterConfig, TransactionMode};
use crate::dialect::{BookkeepingSql, Vendor};
use crate::errors::{connection_error, sql_error};

/// MySQL backend over the blocking `mysql` client
///
/// MySQL commits implicitly on DDL, so `PerMigration` only keeps DML
/// bodies atomic with their bookkeeping row.
pub struct MySqlAdapter {
    conn: Conn,
    sql: BookkeepingSql,
    mode: TransactionMode,
}

impl MySqlAdapter {
    /// Wrap an open connection and create the bookkeeping table if absent
    ///
    /// # Errors
    ///
    /// Invalid table name, or failure creating the table.
    pub fn new(mut conn: Conn, config: AdapterConfig) -> Result<Self> {
        config.validate()?;
        let sql = BookkeepingSql::new(Vendor::MySql, &config.table);
        conn.query_drop(&sql.create_table)
            .map_err(|e| sql_error("mysql", e).with_op("create_bookkeeping_table"))?;
        debug!(vendor = "mysql", table = %config.table, "bookkeeping table ready");

        Ok(Self {
            conn,
            sql,
            mode: config.transaction_mode,
        })
    }

    /// Connect with a `mysql://` URL
    ///
    /// # Errors
    ///
    /// Malformed URL, connection failure, or failure creating the
    /// bookkeeping table.
    pub fn connect(url: &str, config: AdapterConfig) -> Result<Self> {
        let opts = Opts::from_url(url).map_err(|e| connection_error("mysql", e))?;
        let conn = Conn::new(opts).map_err(|e| connection_error("mysql", e))?;
        Self::new(conn, config)
    }

    fn run(&mut self, pair: &MigrationPair, role: MigrationRole) -> Result<()> {
        let (op, bookkeeping) = match role {
            MigrationRole::Apply => ("apply_migration", self.sql.insert_version.as_str()),
            MigrationRole::Rollback => ("rollback_migration", self.sql.delete_version.as_str()),
        };
        let wrap = |e: mysql::Error| {
            sql_error("mysql", e)
                .with_op(op)
                .with_version(pair.version())
        };
        let version = pair.version();

        match self.mode {
            TransactionMode::PerMigration => {
                let mut tx = self
                    .conn
                    .start_transaction(TxOpts::default())
                    .map_err(wrap)?;
                tx.query_drop(pair.body(role)).map_err(wrap)?;
                tx.exec_drop(bookkeeping, (version,)).map_err(wrap)?;
                tx.commit().map_err(wrap)?;
            }
            TransactionMode::TwoStep => {
                self.conn.query_drop(pair.body(role)).map_err(wrap)?;
                self.conn
                    .exec_drop(bookkeeping, (version,))
                    .map_err(wrap)?;
            }
        }

        debug!(vendor = "mysql", version = version, role = %role, "bookkeeping updated");
        Ok(())
    }
}

impl VendorAdapter for MySqlAdapter {
    fn vendor(&self) -> &'static str {
        Vendor::MySql.as_str()
    }

    fn applied_migrations_asc(&mut self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = self
            .conn
            .query(self.sql.select_versions.as_str())
            .map_err(|e| sql_error("mysql", e).with_op("applied_migrations"))?;
        Ok(rows.into_iter().map(|(version,)| version).collect())
    }

    fn apply_migration(&mut self, pair: &MigrationPair) -> Result<()> {
        self.run(pair, MigrationRole::Apply)
    }

    fn rollback_migration(&mut self, pair: &MigrationPair) -> Result<()> {
        self.run(pair, MigrationRole::Rollback)
    }
}
