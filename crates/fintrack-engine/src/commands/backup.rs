//! Backup Producer with boundary logging.
//!
//! ## Pipeline (in order):
//! 1. Read every collection inside one read transaction
//! 2. Encode (JSON inside gzip)
//! 3. Persist (optional): atomic write under the backup root
//! 4. Prune (persist only): retention failures are logged, never returned
//!
//! ## Logging Ownership
//!
//! This layer owns `log_op_start!`/`log_op_end!`/`log_op_error!` for
//! `backup_produce` and `backup_prune`; the store below logs at debug only.

#![allow(clippy::result_large_err)]

use chrono::{DateTime, Utc};
use fintrack_core::core_types::schema::EVENT_PRUNE_FAILED;
use fintrack_core::core_types::RequestContext;
use fintrack_core::errors::{ExError, ExErrorKind};
use fintrack_core::model::EntityCounts;
use fintrack_core::snapshot::{artifact_file_name, encode_snapshot};
use fintrack_core::{log_op_end, log_op_error, log_op_start, log_op_warn};
use fintrack_core::{BackupOptions, SnapshotKind};
use fintrack_store::artifacts::{prune_artifacts, store_artifact, PruneReport};
use fintrack_store::errors::Result;
use fintrack_store::repo::read_snapshot;
use rusqlite::Connection;
use std::path::PathBuf;

/// Output of one backup
#[derive(Debug, Clone)]
pub struct BackupResult {
    /// `<prefix>-<YYYYMMDD-HHmmss>.json.gz`
    pub file_name: String,
    /// Compressed artifact bytes
    pub content: Vec<u8>,
    /// Where the artifact was written; `None` when not persisted
    pub stored_path: Option<PathBuf>,
    pub kind: SnapshotKind,
    pub counts: EntityCounts,
}

/// Produce a backup of the live store.
///
/// With `persist = false` nothing touches the disk and the bytes are only
/// returned, so the caller can stream them elsewhere.
///
/// ## Errors
///
/// - `Persistence`/`Concurrency`: the store could not be read
/// - `Serialization`: the snapshot could not be encoded
/// - `Io`: the artifact could not be written
pub fn produce_backup(
    conn: &mut Connection,
    options: &BackupOptions,
    persist: bool,
    ctx: &RequestContext,
) -> Result<BackupResult> {
    log_op_start!(
        "backup_produce",
        request_id = %ctx.request_id,
        trigger = ctx.trigger.as_str(),
        persist = persist
    );
    let start = std::time::Instant::now();

    let result = produce_backup_impl(conn, options, persist, Utc::now()).map_err(|e| {
        let e = e.with_request_id(ctx.request_id.clone());
        log_op_error!(
            "backup_produce",
            &e,
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %ctx.request_id
        );
        e
    })?;

    log_op_end!(
        "backup_produce",
        duration_ms = start.elapsed().as_millis() as u64,
        request_id = %ctx.request_id,
        file_name = %result.file_name,
        snapshot_kind = result.kind.as_str(),
        size_bytes = result.content.len() as u64,
        rows = result.counts.total() as u64
    );

    Ok(result)
}

fn produce_backup_impl(
    conn: &mut Connection,
    options: &BackupOptions,
    persist: bool,
    now: DateTime<Utc>,
) -> Result<BackupResult> {
    let kind = if options.include_identity {
        SnapshotKind::Full
    } else {
        SnapshotKind::DataOnly
    };

    let snapshot = read_snapshot(conn, kind, now)?;
    let counts = snapshot.counts();
    tracing::debug!(counts = %counts, "Read snapshot");

    let content = encode_snapshot(&snapshot).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("encode_snapshot")
            .with_message(e.to_string())
    })?;
    drop(snapshot);

    let file_name = artifact_file_name(&options.file_prefix, now);

    let stored_path = if persist {
        let path = store_artifact(&options.root_path, &file_name, &content)?;
        prune_after_write(options, now);
        Some(path)
    } else {
        None
    };

    Ok(BackupResult {
        file_name,
        content,
        stored_path,
        kind,
        counts,
    })
}

fn prune_after_write(options: &BackupOptions, now: DateTime<Utc>) {
    match prune_artifacts(options, now) {
        Ok(report) => {
            if !report.deleted.is_empty() || !report.failed.is_empty() {
                tracing::info!(
                    deleted = report.deleted.len(),
                    failed = report.failed.len(),
                    "Pruned backup artifacts"
                );
            }
        }
        Err(e) => {
            log_op_warn!("backup_produce", EVENT_PRUNE_FAILED, error = %e);
        }
    }
}

/// Run retention pruning on its own
pub fn prune_backups(options: &BackupOptions, ctx: &RequestContext) -> Result<PruneReport> {
    log_op_start!(
        "backup_prune",
        request_id = %ctx.request_id,
        retention_days = options.retention_days
    );
    let start = std::time::Instant::now();

    let report = prune_artifacts(options, Utc::now()).map_err(|e| {
        log_op_error!(
            "backup_prune",
            &e,
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "backup_prune",
        duration_ms = start.elapsed().as_millis() as u64,
        deleted = report.deleted.len() as u64,
        failed = report.failed.len() as u64
    );

    Ok(report)
}
