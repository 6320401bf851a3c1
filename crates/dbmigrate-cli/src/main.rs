//! dbmigrate CLI
//!
//! Applies and rolls back versioned SQL migrations

use clap::{Parser, Subcommand};
use dbmigrate_core::logging_facility::{init, Profile};

mod commands;

use commands::{GlobalArgs, LogFormat};

#[derive(Debug, Parser)]
#[command(name = "dbmigrate")]
#[command(about = "dbmigrate - Versioned SQL migrations", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending migrations in version order
    Apply(commands::apply::ApplyArgs),
    /// Roll back the most recently applied migration
    Rollback(commands::rollback::RollbackArgs),
    /// Show applied and pending migrations
    Status(commands::status::StatusArgs),
    /// Create a new apply/rollback file pair
    New(commands::new::NewArgs),
}

fn main() {
    let cli = Cli::parse();

    init(match cli.global.log_format {
        LogFormat::Pretty => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let result = match cli.command {
        Commands::Apply(args) => commands::apply::execute(args, &cli.global),
        Commands::Rollback(args) => commands::rollback::execute(args, &cli.global),
        Commands::Status(args) => commands::status::execute(args, &cli.global),
        Commands::New(args) => commands::new::execute(args, &cli.global),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
