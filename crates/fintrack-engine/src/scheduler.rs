//! Automatic backup scheduler
//!
//! A long-lived loop owned by one task. Options arrive through a `watch`
//! channel so a config reload takes effect at the next wake-up; shutdown is
//! a second `watch` channel. A failed cycle is logged and the loop carries
//! on; nothing here ever returns an error.

#![allow(clippy::result_large_err)]

use crate::commands::backup::{produce_backup, BackupResult};
use async_trait::async_trait;
use fintrack_core::config::DISABLED_POLL_INTERVAL;
use fintrack_core::core_types::schema::EVENT_CYCLE_FAILED;
use fintrack_core::core_types::{RequestContext, Trigger};
use fintrack_core::errors::{ExError, ExErrorKind};
use fintrack_core::BackupOptions;
use fintrack_store::errors::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// One backup run, as seen by the scheduler
#[async_trait]
pub trait BackupJob: Send + Sync {
    async fn run(&self, options: &BackupOptions, ctx: &RequestContext) -> Result<BackupResult>;
}

/// Opens the database on a blocking thread and persists a backup
#[derive(Debug, Clone)]
pub struct SqliteBackupJob {
    db_path: PathBuf,
}

impl SqliteBackupJob {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

#[async_trait]
impl BackupJob for SqliteBackupJob {
    async fn run(&self, options: &BackupOptions, ctx: &RequestContext) -> Result<BackupResult> {
        let db_path = self.db_path.clone();
        let options = options.clone();
        let ctx = ctx.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = fintrack_store::db::open(&db_path)?;
            produce_backup(&mut conn, &options, true, &ctx)
        })
        .await
        .map_err(|e| {
            ExError::new(ExErrorKind::Internal)
                .with_op("backup_cycle")
                .with_message(format!("backup task join: {}", e))
        })?
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Waiting for the next interval or poll
    Idle,
    /// A backup is in progress
    Running,
    /// Shutdown was requested
    Stopped,
}

pub struct BackupScheduler {
    job: Arc<dyn BackupJob>,
    options: watch::Receiver<BackupOptions>,
    startup_backup_done: bool,
    state: SchedulerState,
}

impl BackupScheduler {
    pub fn new(job: Arc<dyn BackupJob>, options: watch::Receiver<BackupOptions>) -> Self {
        Self {
            job,
            options,
            startup_backup_done: false,
            state: SchedulerState::Idle,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Run until `shutdown` turns true or its sender is dropped.
    ///
    /// While disabled the loop only polls. Once enabled, the one-shot startup
    /// backup runs first (if configured), then one backup per interval.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!("Backup scheduler started");

        loop {
            let options = self.current_options();

            if !options.enable_automatic_backups {
                if !self.idle(DISABLED_POLL_INTERVAL, &mut shutdown).await {
                    break;
                }
                continue;
            }

            if options.run_on_startup && !self.startup_backup_done {
                self.startup_backup_done = true;
                if !self.run_cycle(&options, Trigger::Startup, &mut shutdown).await {
                    break;
                }
            }

            if !self.idle(options.effective_interval(), &mut shutdown).await {
                break;
            }

            let options = self.current_options();
            if !options.enable_automatic_backups {
                continue;
            }
            if !self.run_cycle(&options, Trigger::Scheduled, &mut shutdown).await {
                break;
            }
        }

        self.state = SchedulerState::Stopped;
        tracing::info!("Backup scheduler stopped");
    }

    fn current_options(&self) -> BackupOptions {
        self.options.borrow().clone()
    }

    /// Sleep for `period`; false when shutdown interrupted the wait
    async fn idle(&mut self, period: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
        self.state = SchedulerState::Idle;
        tokio::select! {
            _ = tokio::time::sleep(period) => true,
            _ = shutdown_requested(shutdown) => false,
        }
    }

    /// Run one backup; false when shutdown interrupted it
    async fn run_cycle(
        &mut self,
        options: &BackupOptions,
        trigger: Trigger,
        shutdown: &mut watch::Receiver<bool>,
    ) -> bool {
        self.state = SchedulerState::Running;
        let ctx = RequestContext::with_trigger(trigger);

        let outcome = tokio::select! {
            result = self.job.run(options, &ctx) => Some(result),
            _ = shutdown_requested(shutdown) => None,
        };

        match outcome {
            None => {
                tracing::info!(
                    request_id = %ctx.request_id,
                    "Shutdown requested during backup; run abandoned"
                );
                false
            }
            Some(Ok(result)) => {
                tracing::info!(
                    request_id = %ctx.request_id,
                    trigger = trigger.as_str(),
                    file_name = %result.file_name,
                    "Scheduled backup completed"
                );
                self.state = SchedulerState::Idle;
                true
            }
            Some(Err(e)) => {
                tracing::error!(
                    op = "backup_cycle",
                    event = EVENT_CYCLE_FAILED,
                    request_id = %ctx.request_id,
                    trigger = trigger.as_str(),
                    err.code = e.code(),
                    error = %e,
                    "Scheduled backup failed; will retry next interval"
                );
                self.state = SchedulerState::Idle;
                true
            }
        }
    }
}

async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow() {
            return;
        }
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
