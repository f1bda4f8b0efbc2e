//! FinTrack CLI
//!
//! Backup, restore and scheduled backups for the FinTrack store

use anyhow::Context;
use clap::{Parser, Subcommand};
use fintrack_core::logging_facility::{init, Profile};
use fintrack_core::AppConfig;
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "fintrack")]
#[command(about = "FinTrack - Backup and restore for the personal finance store", long_about = None)]
struct Cli {
    /// Configuration file; a missing file means defaults
    #[arg(long, global = true, default_value = "fintrack.toml")]
    config: PathBuf,

    /// Emit JSON logs instead of human-readable ones
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db(commands::db::DbArgs),
    /// Produce, list and prune backups
    Backup(commands::backup::BackupArgs),
    /// Replace the store's contents with a backup
    Restore(commands::restore::RestoreArgs),
    /// Run automatic backups until interrupted
    Schedule(commands::schedule::ScheduleArgs),
}

fn main() {
    let cli = Cli::parse();

    init(if cli.json_logs {
        Profile::Production
    } else {
        Profile::Development
    });

    let result = AppConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))
        .and_then(|config| match cli.command {
            Commands::Db(args) => commands::db::execute(args, &config),
            Commands::Backup(args) => commands::backup::execute(args, &config),
            Commands::Restore(args) => commands::restore::execute(args, &config),
            Commands::Schedule(args) => commands::schedule::execute(args, config),
        });

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
