//! Subcommands and the flags they share

use clap::{Args, ValueEnum};
use dbmigrate_core::{Migrator, VendorAdapter};
use dbmigrate_core_types::Sensitive;
use dbmigrate_store::adapter::DEFAULT_TABLE;
use dbmigrate_store::{connect, AdapterConfig, FileStorage, TransactionMode};
use std::path::PathBuf;

pub mod apply;
pub mod new;
pub mod rollback;
pub mod status;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Pretty,
    /// One JSON object per line
    Json,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Database URL (sqlite:<path>, postgres://..., mysql://...)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    pub database_url: Option<String>,

    /// Directory holding the migration files
    #[arg(long, env = "DBMIGRATE_DIR", default_value = "migrations", global = true)]
    pub dir: PathBuf,

    /// Bookkeeping table name
    #[arg(long, default_value = DEFAULT_TABLE, global = true)]
    pub table: String,

    /// Run each body and its bookkeeping statement separately, without a
    /// wrapping transaction
    #[arg(long, global = true)]
    pub no_transaction: bool,

    /// Log output format (logs go to stderr)
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,
}

impl GlobalArgs {
    pub fn adapter_config(&self) -> AdapterConfig {
        let mode = if self.no_transaction {
            TransactionMode::TwoStep
        } else {
            TransactionMode::PerMigration
        };
        AdapterConfig::new()
            .with_table(self.table.clone())
            .with_transaction_mode(mode)
    }

    pub fn storage(&self) -> Result<FileStorage, Box<dyn std::error::Error>> {
        Ok(FileStorage::new(&self.dir)?)
    }

    /// Load the migration directory and connect to the database
    pub fn migrator(&self) -> Result<Migrator<Box<dyn VendorAdapter>>, Box<dyn std::error::Error>> {
        let url = self
            .database_url
            .clone()
            .map(Sensitive::new)
            .ok_or("no database URL: pass --database-url or set DATABASE_URL")?;
        let storage = self.storage()?;
        let adapter = connect(&url, self.adapter_config())?;
        Ok(Migrator::new(adapter, &storage)?)
    }
}
