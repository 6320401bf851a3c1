//! Rollback command
//!
//! Usage: dbmigrate rollback

use clap::Args;

use super::{CliResult, GlobalArgs};

#[derive(Debug, Args)]
pub struct RollbackArgs {}

/// Execute rollback command
pub fn execute(_args: RollbackArgs, global: &GlobalArgs) -> CliResult {
    let mut migrator = global.migrator()?;

    match migrator.rollback_latest()? {
        Some(version) => {
            let name = migrator.migration(&version).map(|p| p.name()).unwrap_or("");
            println!("Rolled back {} {}", version, name);
        }
        None => println!("Nothing to roll back"),
    }

    Ok(())
}
