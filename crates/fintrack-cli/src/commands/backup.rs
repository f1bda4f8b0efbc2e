//! Backup commands
//!
//! Usage:
//!   fintrack backup create [--no-persist] [--out FILE]
//!   fintrack backup list
//!   fintrack backup prune

use anyhow::Context;
use clap::{Args, Subcommand};
use fintrack_core::core_types::RequestContext;
use fintrack_core::AppConfig;
use fintrack_engine::{produce_backup, prune_backups};
use fintrack_store::artifacts::list_artifacts;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct BackupArgs {
    #[command(subcommand)]
    pub command: BackupCommand,
}

#[derive(Debug, Subcommand)]
pub enum BackupCommand {
    /// Produce a backup now
    Create(CreateArgs),
    /// List stored backups, newest first
    List,
    /// Delete stored backups older than the retention period
    Prune,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Do not store the artifact under the backup root
    #[arg(long)]
    pub no_persist: bool,

    /// Write the artifact to this file instead of the backup root
    /// (`-` for stdout)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn execute(args: BackupArgs, config: &AppConfig) -> anyhow::Result<()> {
    match args.command {
        BackupCommand::Create(create_args) => execute_create(create_args, config),
        BackupCommand::List => execute_list(config),
        BackupCommand::Prune => execute_prune(config),
    }
}

fn execute_create(args: CreateArgs, config: &AppConfig) -> anyhow::Result<()> {
    let persist = !args.no_persist && args.out.is_none();
    let out = match (&args.out, args.no_persist) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => Some(PathBuf::from("-")),
        (None, false) => None,
    };

    let mut conn = super::open_store(config)?;
    let result = produce_backup(&mut conn, &config.backup, persist, &RequestContext::new())?;

    match out {
        Some(path) if path.as_os_str() == "-" => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&result.content)?;
            stdout.flush()?;
            return Ok(());
        }
        Some(path) => {
            std::fs::write(&path, &result.content)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Backup written: {}", path.display());
        }
        None => {
            if let Some(path) = &result.stored_path {
                println!("Backup stored: {}", path.display());
            }
        }
    }

    println!("  file_name: {}", result.file_name);
    println!("  kind: {}", result.kind);
    println!("  size_bytes: {}", result.content.len());
    println!("  rows: {}", result.counts);
    Ok(())
}

fn execute_list(config: &AppConfig) -> anyhow::Result<()> {
    let artifacts = list_artifacts(&config.backup.root_path, &config.backup.file_prefix)?;
    if artifacts.is_empty() {
        println!("No backups under {}", config.backup.root_path.display());
        return Ok(());
    }

    for artifact in artifacts {
        println!(
            "{}  {:>10}  {}",
            artifact.file_name,
            artifact.size_bytes,
            artifact.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    Ok(())
}

fn execute_prune(config: &AppConfig) -> anyhow::Result<()> {
    let report = prune_backups(&config.backup, &RequestContext::new())?;

    println!("Pruned {} backup(s)", report.deleted.len());
    for name in &report.deleted {
        println!("  deleted: {}", name);
    }
    for (name, reason) in &report.failed {
        println!("  failed: {} ({})", name, reason);
    }
    Ok(())
}
