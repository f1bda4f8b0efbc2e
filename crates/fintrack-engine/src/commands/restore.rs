//! Restore Engine with boundary logging.
//!
//! ## Pipeline (in order, no step is revisited):
//! 1. Validate input: an empty stream is rejected before anything else
//! 2. Decode the artifact
//! 3. Classify (`Full` / `DataOnly`); malformed identity data is rejected
//! 4. Begin one `IMMEDIATE` transaction
//! 5. Guard: a data-only snapshot may only reference existing accounts
//! 6. Run the restore phases: wipe children-first, insert parents-first,
//!    repair sequences
//! 7. Commit; any failure in 5-6 drops the transaction, which rolls back
//!
//! Steps 1-3 and the guard never mutate the store.

#![allow(clippy::result_large_err)]

use fintrack_core::core_types::schema::{EVENT_DATA_ONLY_RESTORE, EVENT_VERSION_SKEW};
use fintrack_core::core_types::RequestContext;
use fintrack_core::errors::{ExError, ExErrorKind};
use fintrack_core::model::{EntityCounts, EntityKind};
use fintrack_core::snapshot::read_snapshot;
use fintrack_core::{log_op_end, log_op_error, log_op_start, log_op_warn};
use fintrack_core::{Snapshot, SnapshotKind, SNAPSHOT_FORMAT_VERSION};
use fintrack_store::errors::{from_rusqlite, Result};
use fintrack_store::repo::{delete_collection, find_missing_users, insert_collection};
use fintrack_store::sequences::{repair_sequences, SequenceRepair};
use rusqlite::{Connection, TransactionBehavior};
use std::io::{BufRead, BufReader, Read};

/// What a successful restore did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreReport {
    pub kind: SnapshotKind,
    pub artifact_version: u32,
    /// The artifact was written by a different format version
    pub version_mismatch: bool,
    /// Rows inserted per collection
    pub restored: EntityCounts,
    pub sequences_repaired: Vec<SequenceRepair>,
}

/// One step of the restore transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestorePhase {
    Wipe(EntityKind),
    Insert(EntityKind),
    RepairSequences,
}

impl std::fmt::Display for RestorePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RestorePhase::Wipe(kind) => write!(f, "wipe {}", kind),
            RestorePhase::Insert(kind) => write!(f, "insert {}", kind),
            RestorePhase::RepairSequences => f.write_str("repair sequences"),
        }
    }
}

/// Phases for a snapshot of `kind`, in execution order.
///
/// Identity collections are wiped and reinserted only for a full restore,
/// so a data-only restore keeps the existing accounts.
pub fn restore_plan(kind: SnapshotKind) -> Vec<RestorePhase> {
    let include_identity = kind.includes_identity();
    let mut plan: Vec<RestorePhase> = EntityKind::wipe_order(include_identity)
        .into_iter()
        .map(RestorePhase::Wipe)
        .collect();
    plan.extend(
        EntityKind::insert_order(include_identity)
            .into_iter()
            .map(RestorePhase::Insert),
    );
    plan.push(RestorePhase::RepairSequences);
    plan
}

/// Restore the live store from a compressed artifact stream
///
/// ## Errors
///
/// - `InvalidInput`: the stream is empty or unreadable
/// - `InvalidBackup`: the artifact is corrupt or its identity data is inconsistent
/// - `IncompatibleBackup`: a data-only artifact references unknown accounts
/// - `Concurrency`: another writer holds the database lock
/// - `Persistence`: a phase failed; the store was rolled back
pub fn restore_backup<R: Read>(
    conn: &mut Connection,
    reader: R,
    ctx: &RequestContext,
) -> Result<RestoreReport> {
    log_op_start!("restore", request_id = %ctx.request_id, trigger = ctx.trigger.as_str());
    let start = std::time::Instant::now();

    let result = decode_input(reader)
        .and_then(|snapshot| restore_snapshot_impl(conn, &snapshot))
        .map_err(|e| fail("restore", e, ctx, start))?;

    finish("restore", &result, ctx, start);
    Ok(result)
}

/// Restore the live store from an already decoded snapshot
///
/// ## Errors
///
/// As [`restore_backup`], minus the stream errors.
pub fn restore_snapshot(
    conn: &mut Connection,
    snapshot: &Snapshot,
    ctx: &RequestContext,
) -> Result<RestoreReport> {
    log_op_start!("restore", request_id = %ctx.request_id, trigger = ctx.trigger.as_str());
    let start = std::time::Instant::now();

    let result =
        restore_snapshot_impl(conn, snapshot).map_err(|e| fail("restore", e, ctx, start))?;

    finish("restore", &result, ctx, start);
    Ok(result)
}

fn fail(op: &str, e: ExError, ctx: &RequestContext, start: std::time::Instant) -> ExError {
    let e = e.with_request_id(ctx.request_id.clone());
    log_op_error!(
        op,
        &e,
        duration_ms = start.elapsed().as_millis() as u64,
        request_id = %ctx.request_id
    );
    e
}

fn finish(op: &str, report: &RestoreReport, ctx: &RequestContext, start: std::time::Instant) {
    if report.kind == SnapshotKind::DataOnly {
        log_op_warn!(
            op,
            EVENT_DATA_ONLY_RESTORE,
            request_id = %ctx.request_id,
            rows = report.restored.total() as u64,
            "Data-only restore: existing accounts were kept, not replaced"
        );
    }
    log_op_end!(
        op,
        duration_ms = start.elapsed().as_millis() as u64,
        request_id = %ctx.request_id,
        snapshot_kind = report.kind.as_str(),
        rows = report.restored.total() as u64,
        sequences = report.sequences_repaired.len() as u64
    );
}

fn decode_input<R: Read>(reader: R) -> Result<Snapshot> {
    let mut reader = BufReader::new(reader);
    let available = reader.fill_buf().map_err(|e| {
        ExError::new(ExErrorKind::InvalidInput)
            .with_op("restore")
            .with_message(format!("Backup stream is not readable: {}", e))
    })?;
    if available.is_empty() {
        return Err(ExError::new(ExErrorKind::InvalidInput)
            .with_op("restore")
            .with_message("Backup stream is empty"));
    }

    Ok(read_snapshot(reader)?)
}

fn restore_snapshot_impl(conn: &mut Connection, snapshot: &Snapshot) -> Result<RestoreReport> {
    let kind = snapshot.classify()?;

    let version_mismatch = !snapshot.version_matches();
    if version_mismatch {
        log_op_warn!(
            "restore",
            EVENT_VERSION_SKEW,
            artifact_version = snapshot.version,
            expected_version = SNAPSHOT_FORMAT_VERSION,
            "Backup was written by a different format version; restoring anyway"
        );
    }

    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(from_rusqlite)?;

    if kind == SnapshotKind::DataOnly {
        guard_referenced_users(&tx, snapshot)?;
    }

    let mut restored = EntityCounts::new();
    let mut sequences_repaired = Vec::new();
    let inserted_kinds = EntityKind::insert_order(kind.includes_identity());

    for phase in restore_plan(kind) {
        match phase {
            RestorePhase::Wipe(entity) => {
                let rows = delete_collection(&tx, entity)?;
                tracing::debug!(phase = %phase, entity = %entity, rows, "Restore phase");
            }
            RestorePhase::Insert(entity) => {
                let rows = insert_collection(&tx, snapshot, entity)?;
                restored.set(entity, rows);
                tracing::debug!(phase = %phase, entity = %entity, rows, "Restore phase");
            }
            RestorePhase::RepairSequences => {
                sequences_repaired = repair_sequences(&tx, &inserted_kinds)?;
                tracing::debug!(
                    phase = %phase,
                    rows = sequences_repaired.len(),
                    "Restore phase"
                );
            }
        }
    }

    tx.commit().map_err(from_rusqlite)?;

    Ok(RestoreReport {
        kind,
        artifact_version: snapshot.version,
        version_mismatch,
        restored,
        sequences_repaired,
    })
}

/// A data-only snapshot must not reference accounts this store lacks
fn guard_referenced_users(conn: &Connection, snapshot: &Snapshot) -> Result<()> {
    let referenced = snapshot.referenced_user_ids();
    let missing = find_missing_users(conn, referenced.iter().copied())?;
    if missing.is_empty() {
        return Ok(());
    }

    Err(ExError::new(ExErrorKind::IncompatibleBackup)
        .with_op("restore_guard")
        .with_entity_id(missing[0].clone())
        .with_message(format!(
            "Data-only backup references {} account(s) missing from this store: {}",
            missing.len(),
            missing.join(", ")
        )))
}
