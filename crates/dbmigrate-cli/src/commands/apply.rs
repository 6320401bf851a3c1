//! Apply command
//!
//! Usage: dbmigrate apply [--one]

use clap::Args;

use super::{CliResult, GlobalArgs};

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Apply only the lowest pending version
    #[arg(long)]
    pub one: bool,
}

/// Execute apply command
pub fn execute(args: ApplyArgs, global: &GlobalArgs) -> CliResult {
    let mut migrator = global.migrator()?;

    let applied: Vec<String> = if args.one {
        migrator.apply_one()?.into_iter().collect()
    } else {
        migrator.apply_all()?
    };

    if applied.is_empty() {
        println!("Nothing to apply");
    }
    for version in &applied {
        let name = migrator.migration(version).map(|p| p.name()).unwrap_or("");
        println!("Applied {} {}", version, name);
    }

    Ok(())
}
