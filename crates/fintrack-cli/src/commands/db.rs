//! Database maintenance
//!
//! Usage: fintrack db migrate

use clap::{Args, Subcommand};
use fintrack_core::AppConfig;
use fintrack_store::migrations::applied_migrations;

#[derive(Debug, Args)]
pub struct DbArgs {
    #[command(subcommand)]
    pub command: DbCommand,
}

#[derive(Debug, Subcommand)]
pub enum DbCommand {
    /// Apply pending schema migrations
    Migrate,
}

pub fn execute(args: DbArgs, config: &AppConfig) -> anyhow::Result<()> {
    match args.command {
        DbCommand::Migrate => {
            let conn = super::open_store(config)?;
            let applied = applied_migrations(&conn)?;
            println!("Database: {}", config.database_path.display());
            for id in applied {
                println!("  applied: {}", id);
            }
            Ok(())
        }
    }
}
