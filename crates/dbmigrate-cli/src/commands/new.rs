//! New migration command
//!
//! Usage: dbmigrate new <NAME> [--version <VERSION>]

use clap::Args;
use dbmigrate_store::FileStorage;

use super::{CliResult, GlobalArgs};

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Migration name (letters, digits, `_` and `-`)
    pub name: String,

    /// Version to use instead of the current UTC timestamp
    #[arg(long)]
    pub version: Option<String>,
}

/// Execute new command
pub fn execute(args: NewArgs, global: &GlobalArgs) -> CliResult {
    let version = args.version.unwrap_or_else(FileStorage::next_version);
    let (apply, rollback) = global.storage()?.create_pair(&version, &args.name)?;

    println!("Created {}", apply.display());
    println!("Created {}", rollback.display());

    Ok(())
}
