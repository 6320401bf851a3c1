#![allow(clippy::result_large_err)]

use dbmigrate_core::errors::Result;
use dbmigrate_core::model::{MigrationPair, MigrationRole};
use dbmigrate_core::ports::VendorAdapter;
use postgres::{Client, NoTls};
use tracing::debug;

use super::{AdapterConfig, TransactionMode};
use crate::dialect::{BookkeepingSql, Vendor};
use crate::errors::{connection_error, sql_error};

/// PostgreSQL backend over the blocking `postgres` client
///
/// Bodies run through `batch_execute` (simple query protocol), so a body
/// may hold several statements.
pub struct PostgresAdapter {
    client: Client,
    sql: BookkeepingSql,
    mode: TransactionMode,
}

impl PostgresAdapter {
    /// Wrap a connected client and create the bookkeeping table if absent
    ///
    /// # Errors
    ///
    /// Invalid table name, or failure creating the table.
    pub fn new(mut client: Client, config: AdapterConfig) -> Result<Self> {
        config.validate()?;
        let sql = BookkeepingSql::new(Vendor::Postgres, &config.table);
        client
            .batch_execute(&sql.create_table)
            .map_err(|e| sql_error("postgres", e).with_op("create_bookkeeping_table"))?;
        debug!(vendor = "postgres", table = %config.table, "bookkeeping table ready");

        Ok(Self {
            client,
            sql,
            mode: config.transaction_mode,
        })
    }

    /// Connect with a `postgres://` URL (no TLS)
    ///
    /// # Errors
    ///
    /// Connection failure, or failure creating the bookkeeping table.
    pub fn connect(url: &str, config: AdapterConfig) -> Result<Self> {
        let client = Client::connect(url, NoTls).map_err(|e| connection_error("postgres", e))?;
        Self::new(client, config)
    }

    fn run(&mut self, pair: &MigrationPair, role: MigrationRole) -> Result<()> {
        let (op, bookkeeping) = match role {
            MigrationRole::Apply => ("apply_migration", self.sql.insert_version.as_str()),
            MigrationRole::Rollback => ("rollback_migration", self.sql.delete_version.as_str()),
        };
        let wrap = |e: postgres::Error| {
            sql_error("postgres", e)
                .with_op(op)
                .with_version(pair.version())
        };
        let version = pair.version();

        match self.mode {
            TransactionMode::PerMigration => {
                let mut tx = self.client.transaction().map_err(wrap)?;
                tx.batch_execute(pair.body(role)).map_err(wrap)?;
                tx.execute(bookkeeping, &[&version]).map_err(wrap)?;
                tx.commit().map_err(wrap)?;
            }
            TransactionMode::TwoStep => {
                self.client.batch_execute(pair.body(role)).map_err(wrap)?;
                self.client
                    .execute(bookkeeping, &[&version])
                    .map_err(wrap)?;
            }
        }

        debug!(vendor = "postgres", version = version, role = %role, "bookkeeping updated");
        Ok(())
    }
}

impl VendorAdapter for PostgresAdapter {
    fn vendor(&self) -> &'static str {
        Vendor::Postgres.as_str()
    }

    fn applied_migrations_asc(&mut self) -> Result<Vec<String>> {
        let wrap = |e: postgres::Error| sql_error("postgres", e).with_op("applied_migrations");
        let rows = self
            .client
            .query(self.sql.select_versions.as_str(), &[])
            .map_err(wrap)?;
        rows.iter()
            .map(|row| row.try_get::<_, String>(0).map_err(wrap))
            .collect()
    }

    fn apply_migration(&mut self, pair: &MigrationPair) -> Result<()> {
        self.run(pair, MigrationRole::Apply)
    }

    fn rollback_migration(&mut self, pair: &MigrationPair) -> Result<()> {
        self.run(pair, MigrationRole::Rollback)
    }
}
