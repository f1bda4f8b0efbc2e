// Integration tests for the automatic backup scheduler
//
// Timing tests run on a paused clock, which tokio advances whenever every
// task is idle, so intervals of minutes finish instantly.

mod common;

use async_trait::async_trait;
use common::*;
use fintrack_core::core_types::{RequestContext, Trigger};
use fintrack_core::errors::{ExError, ExErrorKind};
use fintrack_core::{BackupOptions, EntityCounts, SnapshotKind};
use fintrack_engine::{BackupJob, BackupResult, BackupScheduler, SchedulerState, SqliteBackupJob};
use fintrack_store::artifacts::list_artifacts;
use fintrack_store::Result;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Default)]
struct StubJob {
    triggers: Mutex<Vec<Trigger>>,
    fail_first: usize,
    hang: bool,
}

impl StubJob {
    fn failing_first(n: usize) -> Self {
        Self {
            fail_first: n,
            ..Self::default()
        }
    }

    fn triggers(&self) -> Vec<Trigger> {
        self.triggers.lock().unwrap().clone()
    }
}

#[async_trait]
impl BackupJob for StubJob {
    async fn run(&self, _options: &BackupOptions, ctx: &RequestContext) -> Result<BackupResult> {
        let call = {
            let mut triggers = self.triggers.lock().unwrap();
            triggers.push(ctx.trigger);
            triggers.len()
        };
        if self.hang {
            std::future::pending::<()>().await;
        }
        if call <= self.fail_first {
            return Err(ExError::new(ExErrorKind::Io)
                .with_op("stub_backup")
                .with_message("disk full"));
        }
        Ok(BackupResult {
            file_name: format!("stub-{}.json.gz", call),
            content: Vec::new(),
            stored_path: None,
            kind: SnapshotKind::Full,
            counts: EntityCounts::new(),
        })
    }
}

fn enabled(interval_minutes: i64, run_on_startup: bool) -> BackupOptions {
    BackupOptions {
        enable_automatic_backups: true,
        interval_minutes,
        run_on_startup,
        ..BackupOptions::default()
    }
}

fn spawn_scheduler(
    job: Arc<dyn BackupJob>,
    options: watch::Receiver<BackupOptions>,
) -> (watch::Sender<bool>, JoinHandle<BackupScheduler>) {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut scheduler = BackupScheduler::new(job, options);
    let handle = tokio::spawn(async move {
        scheduler.run(shutdown_rx).await;
        scheduler
    });
    (shutdown_tx, handle)
}

async fn stop(shutdown_tx: watch::Sender<bool>, handle: JoinHandle<BackupScheduler>) {
    shutdown_tx.send(true).unwrap();
    let scheduler = handle.await.unwrap();
    assert_eq!(scheduler.state(), SchedulerState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn test_failed_cycle_does_not_stop_the_loop() {
    let job = Arc::new(StubJob::failing_first(1));
    let (_options_tx, options_rx) = watch::channel(enabled(1, false));
    let (shutdown_tx, handle) = spawn_scheduler(job.clone(), options_rx);

    tokio::time::sleep(Duration::from_secs(150)).await;

    assert_eq!(job.triggers(), vec![Trigger::Scheduled, Trigger::Scheduled]);
    stop(shutdown_tx, handle).await;
}

#[tokio::test(start_paused = true)]
async fn test_first_run_waits_a_full_interval() {
    let job = Arc::new(StubJob::default());
    let (_options_tx, options_rx) = watch::channel(enabled(10, false));
    let (shutdown_tx, handle) = spawn_scheduler(job.clone(), options_rx);

    tokio::time::sleep(Duration::from_secs(9 * 60)).await;
    assert!(job.triggers().is_empty());

    tokio::time::sleep(Duration::from_secs(2 * 60)).await;
    assert_eq!(job.triggers().len(), 1);
    stop(shutdown_tx, handle).await;
}

#[tokio::test(start_paused = true)]
async fn test_startup_backup_runs_once_before_the_interval() {
    let job = Arc::new(StubJob::failing_first(1));
    let (_options_tx, options_rx) = watch::channel(enabled(60, true));
    let (shutdown_tx, handle) = spawn_scheduler(job.clone(), options_rx);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(job.triggers(), vec![Trigger::Startup]);

    tokio::time::sleep(Duration::from_secs(61 * 60)).await;
    assert_eq!(job.triggers(), vec![Trigger::Startup, Trigger::Scheduled]);
    stop(shutdown_tx, handle).await;
}

#[tokio::test(start_paused = true)]
async fn test_disabled_scheduler_only_polls() {
    let job = Arc::new(StubJob::default());
    let (options_tx, options_rx) = watch::channel(BackupOptions {
        run_on_startup: true,
        ..BackupOptions::default()
    });
    let (shutdown_tx, handle) = spawn_scheduler(job.clone(), options_rx);

    tokio::time::sleep(Duration::from_secs(630)).await;
    assert!(job.triggers().is_empty());

    // Picked up at the next poll
    options_tx.send(enabled(5, true)).unwrap();
    tokio::time::sleep(Duration::from_secs(70)).await;
    assert_eq!(job.triggers(), vec![Trigger::Startup]);

    tokio::time::sleep(Duration::from_secs(5 * 60)).await;
    assert_eq!(job.triggers(), vec![Trigger::Startup, Trigger::Scheduled]);
    stop(shutdown_tx, handle).await;
}

#[tokio::test(start_paused = true)]
async fn test_disabling_skips_the_pending_run() {
    let job = Arc::new(StubJob::default());
    let (options_tx, options_rx) = watch::channel(enabled(10, false));
    let (shutdown_tx, handle) = spawn_scheduler(job.clone(), options_rx);

    tokio::time::sleep(Duration::from_secs(5 * 60)).await;
    options_tx.send(BackupOptions::default()).unwrap();

    tokio::time::sleep(Duration::from_secs(30 * 60)).await;
    assert!(job.triggers().is_empty());
    stop(shutdown_tx, handle).await;
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_interrupts_the_wait() {
    let job = Arc::new(StubJob::default());
    let (_options_tx, options_rx) = watch::channel(enabled(24 * 60, false));
    let (shutdown_tx, handle) = spawn_scheduler(job.clone(), options_rx);

    tokio::time::sleep(Duration::from_secs(60)).await;
    stop(shutdown_tx, handle).await;

    assert!(job.triggers().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_huge_interval_waits_instead_of_panicking() {
    let job = Arc::new(StubJob::default());
    let (_options_tx, options_rx) = watch::channel(enabled(i64::MAX, false));
    let (shutdown_tx, handle) = spawn_scheduler(job.clone(), options_rx);

    tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
    assert!(job.triggers().is_empty());
    stop(shutdown_tx, handle).await;
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_abandons_a_run_in_flight() {
    let job = Arc::new(StubJob {
        hang: true,
        ..StubJob::default()
    });
    let (_options_tx, options_rx) = watch::channel(enabled(60, true));
    let (shutdown_tx, handle) = spawn_scheduler(job.clone(), options_rx);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(job.triggers(), vec![Trigger::Startup]);

    stop(shutdown_tx, handle).await;
}

#[tokio::test(start_paused = true)]
async fn test_dropped_shutdown_sender_stops_the_loop() {
    let job = Arc::new(StubJob::default());
    let (_options_tx, options_rx) = watch::channel(enabled(60, false));
    let (shutdown_tx, handle) = spawn_scheduler(job, options_rx);

    drop(shutdown_tx);
    let scheduler = handle.await.unwrap();
    assert_eq!(scheduler.state(), SchedulerState::Stopped);
}

#[tokio::test]
async fn test_sqlite_job_persists_an_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let (db_path, conn) = setup_file_db(dir.path());
    seed(&conn, &household_snapshot());
    drop(conn);

    let root = dir.path().join("backups");
    let job = SqliteBackupJob::new(&db_path);
    let result = job
        .run(
            &backup_options(&root),
            &RequestContext::with_trigger(Trigger::Scheduled),
        )
        .await
        .unwrap();

    assert_eq!(result.counts.total(), household_snapshot().counts().total());
    let listed = list_artifacts(&root, "fintrack-backup").unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].file_name, result.file_name);
}

#[tokio::test]
async fn test_startup_run_against_a_real_store() {
    let dir = tempfile::tempdir().unwrap();
    let (db_path, _conn) = setup_file_db(dir.path());
    let root = dir.path().join("backups");

    let options = BackupOptions {
        root_path: root.clone(),
        ..enabled(24 * 60, true)
    };
    let (_options_tx, options_rx) = watch::channel(options);
    let (shutdown_tx, handle) =
        spawn_scheduler(Arc::new(SqliteBackupJob::new(&db_path)), options_rx);

    let mut artifacts = Vec::new();
    for _ in 0..250 {
        artifacts = list_artifacts(&root, "fintrack-backup").unwrap();
        if !artifacts.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(artifacts.len(), 1);

    stop(shutdown_tx, handle).await;
}
