//! Scheduler command
//!
//! Usage: fintrack schedule [--force-enable]
//!
//! Runs until Ctrl-C.

use clap::Args;
use fintrack_core::AppConfig;
use fintrack_engine::{BackupScheduler, SqliteBackupJob};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Args)]
pub struct ScheduleArgs {
    /// Enable automatic backups even if the configuration disables them
    #[arg(long)]
    pub force_enable: bool,
}

pub fn execute(args: ScheduleArgs, mut config: AppConfig) -> anyhow::Result<()> {
    if args.force_enable {
        config.backup.enable_automatic_backups = true;
    }

    // Fail fast on an unusable database before entering the loop
    drop(super::open_store(&config)?);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let (_options_tx, options_rx) = watch::channel(config.backup.clone());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let job = Arc::new(SqliteBackupJob::new(config.database_path.clone()));
        let mut scheduler = BackupScheduler::new(job, options_rx);
        let handle = tokio::spawn(async move { scheduler.run(shutdown_rx).await });

        tokio::signal::ctrl_c().await?;
        tracing::info!("Interrupt received, stopping scheduler");
        let _ = shutdown_tx.send(true);
        handle.await?;
        Ok::<(), anyhow::Error>(())
    })
}
