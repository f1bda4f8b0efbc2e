//! Restore command
//!
//! Usage: fintrack restore (--file PATH | --name ARTIFACT)

use anyhow::Context;
use clap::Args;
use fintrack_core::core_types::RequestContext;
use fintrack_core::{AppConfig, SnapshotKind};
use fintrack_engine::restore_backup;
use fintrack_store::artifacts::resolve_artifact;
use std::fs::File;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RestoreArgs {
    /// Artifact file to restore from (`-` for stdin)
    #[arg(long, conflicts_with = "name", required_unless_present = "name")]
    pub file: Option<PathBuf>,

    /// Name of a stored artifact under the backup root
    #[arg(long, conflicts_with = "file")]
    pub name: Option<String>,
}

pub fn execute(args: RestoreArgs, config: &AppConfig) -> anyhow::Result<()> {
    let mut conn = super::open_store(config)?;
    let ctx = RequestContext::new();

    let report = match (args.file, args.name) {
        (Some(path), _) if path.as_os_str() == "-" => {
            restore_backup(&mut conn, std::io::stdin().lock(), &ctx)?
        }
        (Some(path), _) => {
            let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
            restore_backup(&mut conn, file, &ctx)?
        }
        (None, Some(name)) => {
            let path = resolve_artifact(
                &config.backup.root_path,
                &config.backup.file_prefix,
                &name,
            )?;
            let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
            restore_backup(&mut conn, file, &ctx)?
        }
        (None, None) => anyhow::bail!("Must specify either --file or --name"),
    };

    println!("Restore completed:");
    println!("  kind: {}", report.kind);
    println!("  artifact_version: {}", report.artifact_version);
    if report.version_mismatch {
        println!("  (written by a different format version)");
    }
    println!("  rows: {}", report.restored);
    println!("  sequences_repaired: {}", report.sequences_repaired.len());
    if report.kind == SnapshotKind::DataOnly {
        println!("  accounts were kept; only financial data was replaced");
    }
    Ok(())
}
