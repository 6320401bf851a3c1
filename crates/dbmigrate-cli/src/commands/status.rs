//! Status command
//!
//! Usage: dbmigrate status [--json]

use clap::Args;

use super::{CliResult, GlobalArgs};

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Print the report as a JSON array
    #[arg(long)]
    pub json: bool,
}

/// Execute status command
pub fn execute(args: StatusArgs, global: &GlobalArgs) -> CliResult {
    let mut migrator = global.migrator()?;
    let rows = migrator.status()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let width = rows
        .iter()
        .map(|row| row.version.len())
        .max()
        .unwrap_or(0)
        .max("VERSION".len());
    println!("{:<width$}  {:<8}  NAME", "VERSION", "STATE", width = width);
    for row in &rows {
        println!(
            "{:<width$}  {:<8}  {}",
            row.version,
            row.state.as_str(),
            row.name.as_deref().unwrap_or("-"),
            width = width
        );
    }

    Ok(())
}
