#![allow(clippy::result_large_err)]

use std::path::Path;

use dbmigrate_core::errors::Result;
use dbmigrate_core::model::{MigrationPair, MigrationRole};
use dbmigrate_core::ports::VendorAdapter;
use rusqlite::{params, Connection};
use tracing::debug;

use super::{AdapterConfig, TransactionMode};
use crate::db;
use crate::dialect::{BookkeepingSql, Vendor};
use crate::errors::from_rusqlite;

/// SQLite backend
///
/// Bodies run through `execute_batch`, so a body may hold several
/// statements separated by `;`.
pub struct SqliteAdapter {
    conn: Connection,
    sql: BookkeepingSql,
    mode: TransactionMode,
}

impl SqliteAdapter {
    /// Wrap an open connection and create the bookkeeping table if absent
    ///
    /// # Errors
    ///
    /// Invalid table name, or failure creating the table.
    pub fn new(conn: Connection, config: AdapterConfig) -> Result<Self> {
        config.validate()?;
        let sql = BookkeepingSql::new(Vendor::Sqlite, &config.table);
        conn.execute_batch(&sql.create_table)
            .map_err(|e| from_rusqlite(e).with_op("create_bookkeeping_table"))?;
        debug!(vendor = "sqlite", table = %config.table, "bookkeeping table ready");

        Ok(Self {
            conn,
            sql,
            mode: config.transaction_mode,
        })
    }

    /// Open (or create) a database file
    ///
    /// # Errors
    ///
    /// Failure opening the file or creating the bookkeeping table.
    pub fn open<P: AsRef<Path>>(path: P, config: AdapterConfig) -> Result<Self> {
        Self::new(db::open(path)?, config)
    }

    /// Open a private in-memory database
    ///
    /// # Errors
    ///
    /// Failure creating the bookkeeping table.
    pub fn open_in_memory(config: AdapterConfig) -> Result<Self> {
        Self::new(db::open_in_memory()?, config)
    }

    /// The underlying connection, e.g. for inspecting the schema after a run
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn into_connection(self) -> Connection {
        self.conn
    }

    /// Run one body and its bookkeeping statement
    fn run(&mut self, pair: &MigrationPair, role: MigrationRole) -> Result<()> {
        let (op, bookkeeping) = match role {
            MigrationRole::Apply => ("apply_migration", self.sql.insert_version.as_str()),
            MigrationRole::Rollback => ("rollback_migration", self.sql.delete_version.as_str()),
        };
        let wrap = |e: rusqlite::Error| from_rusqlite(e).with_op(op).with_version(pair.version());

        match self.mode {
            TransactionMode::PerMigration => {
                let tx = self.conn.transaction().map_err(wrap)?;
                tx.execute_batch(pair.body(role)).map_err(wrap)?;
                tx.execute(bookkeeping, params![pair.version()])
                    .map_err(wrap)?;
                tx.commit().map_err(wrap)?;
            }
            TransactionMode::TwoStep => {
                self.conn.execute_batch(pair.body(role)).map_err(wrap)?;
                self.conn
                    .execute(bookkeeping, params![pair.version()])
                    .map_err(wrap)?;
            }
        }

        debug!(vendor = "sqlite", version = pair.version(), role = %role, "bookkeeping updated");
        Ok(())
    }
}

impl VendorAdapter for SqliteAdapter {
    fn vendor(&self) -> &'static str {
        Vendor::Sqlite.as_str()
    }

    fn applied_migrations_asc(&mut self) -> Result<Vec<String>> {
        let wrap = |e: rusqlite::Error| from_rusqlite(e).with_op("applied_migrations");
        let mut stmt = self.conn.prepare(&self.sql.select_versions).map_err(wrap)?;
        let versions = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(wrap)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(wrap)?;
        Ok(versions)
    }

    fn apply_migration(&mut self, pair: &MigrationPair) -> Result<()> {
        self.run(pair, MigrationRole::Apply)
    }

    fn rollback_migration(&mut self, pair: &MigrationPair) -> Result<()> {
        self.run(pair, MigrationRole::Rollback)
    }
}
