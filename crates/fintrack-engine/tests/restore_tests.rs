// Integration tests for the Restore Engine

mod common;

use common::*;
use fintrack_core::core_types::schema::{EVENT_DATA_ONLY_RESTORE, EVENT_VERSION_SKEW};
use fintrack_core::core_types::RequestContext;
use fintrack_core::logging_facility::init_test_capture;
use fintrack_core::snapshot::{decode_snapshot, encode_snapshot};
use fintrack_core::{EntityKind, ExErrorKind, Snapshot, SnapshotKind};
use fintrack_engine::{produce_backup, restore_backup, restore_snapshot};
use std::time::Duration;
use tempfile::TempDir;

fn data_only(snapshot: &Snapshot) -> Snapshot {
    let mut data = snapshot.clone();
    data.kind = Some(SnapshotKind::DataOnly);
    data.users.clear();
    data.roles.clear();
    data.user_roles.clear();
    data.user_claims.clear();
    data.user_logins.clear();
    data.user_tokens.clear();
    data.role_claims.clear();
    data
}

fn category_name(conn: &rusqlite::Connection, id: i64) -> String {
    conn.query_row("SELECT name FROM categories WHERE id = ?1", [id], |r| {
        r.get(0)
    })
    .unwrap()
}

#[test]
fn test_backup_then_restore_reproduces_the_store() {
    let dir = TempDir::new().unwrap();
    let mut source = setup_test_db();
    seed(&source, &household_snapshot());

    let backup = produce_backup(
        &mut source,
        &backup_options(dir.path()),
        false,
        &RequestContext::new(),
    )
    .unwrap();

    let mut target = setup_test_db();
    let report = restore_backup(&mut target, &backup.content[..], &RequestContext::new()).unwrap();

    assert_eq!(report.kind, SnapshotKind::Full);
    assert!(!report.version_mismatch);
    assert_eq!(report.restored, backup.counts);

    let again = produce_backup(
        &mut target,
        &backup_options(dir.path()),
        false,
        &RequestContext::new(),
    )
    .unwrap();
    let before = decode_snapshot(&backup.content).unwrap();
    let after = decode_snapshot(&again.content).unwrap();
    assert_eq!(after.users, before.users);
    assert_eq!(after.user_roles, before.user_roles);
    assert_eq!(after.categories, before.categories);
    assert_eq!(after.budgets, before.budgets);
    assert_eq!(after.recurring_transactions, before.recurring_transactions);
    assert_eq!(after.transactions, before.transactions);
}

#[test]
fn test_restore_replaces_existing_rows() {
    let mut conn = setup_test_db();
    let mut stale = household_snapshot();
    stale.categories[0].name = "Stale".to_string();
    stale.transactions[0].id = 7;
    seed(&conn, &stale);

    restore_snapshot(&mut conn, &household_snapshot(), &RequestContext::new()).unwrap();

    assert_eq!(category_name(&conn, 1), "Groceries");
    assert_eq!(row_count(&conn, "transactions"), 1);
    let id: i64 = conn
        .query_row("SELECT id FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(id, 1);
}

#[test]
fn test_restore_is_idempotent() {
    let mut conn = setup_test_db();
    let snapshot = household_snapshot();

    let first = restore_snapshot(&mut conn, &snapshot, &RequestContext::new()).unwrap();
    let second = restore_snapshot(&mut conn, &snapshot, &RequestContext::new()).unwrap();

    assert_eq!(first.restored, second.restored);
    for kind in EntityKind::ALL {
        assert_eq!(
            row_count(&conn, kind.table_name()) as usize,
            snapshot.count(kind),
            "{}",
            kind
        );
    }
}

#[test]
fn test_next_generated_id_follows_restored_ids() {
    let mut conn = setup_test_db();
    let mut snapshot = household_snapshot();
    snapshot.transactions[0].id = 40;

    let report = restore_snapshot(&mut conn, &snapshot, &RequestContext::new()).unwrap();
    assert!(report
        .sequences_repaired
        .iter()
        .any(|r| r.kind == EntityKind::Transactions && r.high_water_mark == 40));

    conn.execute(
        "INSERT INTO transactions (user_id, category_id, amount_cents, transaction_type, date, created_at)
         VALUES (?1, 1, 250, 'expense', '2024-06-02', 0)",
        [USER_ID],
    )
    .unwrap();
    assert!(conn.last_insert_rowid() > 40);
}

#[test]
fn test_sequences_are_reset_to_restored_ids() {
    let mut conn = setup_test_db();
    let mut busy = household_snapshot();
    busy.transactions[0].id = 500;
    seed(&conn, &busy);

    restore_snapshot(&mut conn, &household_snapshot(), &RequestContext::new()).unwrap();

    conn.execute(
        "INSERT INTO transactions (user_id, category_id, amount_cents, transaction_type, date, created_at)
         VALUES (?1, 1, 250, 'expense', '2024-06-02', 0)",
        [USER_ID],
    )
    .unwrap();
    assert_eq!(conn.last_insert_rowid(), 2);
}

#[test]
fn test_failed_insert_rolls_back_everything() {
    let mut conn = setup_test_db();
    seed(&conn, &household_snapshot());

    let mut broken = household_snapshot();
    broken.categories[0].name = "Replaced".to_string();
    broken.transactions[0].category_id = 99;

    let err = restore_snapshot(&mut conn, &broken, &RequestContext::new()).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Persistence);

    assert_eq!(category_name(&conn, 1), "Groceries");
    assert_eq!(row_count(&conn, "users"), 1);
    assert_eq!(row_count(&conn, "transactions"), 1);
    assert_eq!(row_count(&conn, "budgets"), 1);
}

#[test]
fn test_empty_stream_is_rejected_without_changes() {
    let mut conn = setup_test_db();
    seed(&conn, &household_snapshot());

    let err = restore_backup(&mut conn, std::io::empty(), &RequestContext::new()).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(row_count(&conn, "transactions"), 1);
}

#[test]
fn test_corrupt_stream_is_rejected_without_changes() {
    let mut conn = setup_test_db();
    seed(&conn, &household_snapshot());

    let mut bytes = encode_snapshot(&household_snapshot()).unwrap();
    bytes.truncate(bytes.len() - 12);
    let err = restore_backup(&mut conn, &bytes[..], &RequestContext::new()).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidBackup);
    assert_eq!(row_count(&conn, "transactions"), 1);
}

#[test]
fn test_untagged_identity_without_users_is_rejected() {
    let mut conn = setup_test_db();
    seed(&conn, &household_snapshot());

    let mut malformed = data_only(&household_snapshot());
    malformed.kind = None;
    malformed.roles = household_snapshot().roles;

    let err = restore_snapshot(&mut conn, &malformed, &RequestContext::new()).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidBackup);
    assert_eq!(row_count(&conn, "roles"), 1);
    assert_eq!(row_count(&conn, "categories"), 1);
}

#[test]
fn test_untagged_snapshot_with_users_restores_as_full() {
    let mut conn = setup_test_db();
    let mut legacy = household_snapshot();
    legacy.kind = None;

    let report = restore_snapshot(&mut conn, &legacy, &RequestContext::new()).unwrap();

    assert_eq!(report.kind, SnapshotKind::Full);
    assert_eq!(row_count(&conn, "users"), 1);
}

#[test]
fn test_data_only_restore_keeps_existing_accounts() {
    let capture = init_test_capture();
    let mut conn = setup_test_db();
    let household = household_snapshot();
    let mut stale = household.clone();
    stale.users[0].email = Some("kept@example.com".to_string());
    stale.categories[0].name = "Stale".to_string();
    stale.transactions[0].id = 9;
    stale.transactions[0].amount_cents = 1;
    seed(&conn, &stale);

    let ctx = RequestContext::new();
    let report = restore_snapshot(&mut conn, &data_only(&household), &ctx).unwrap();

    assert_eq!(report.kind, SnapshotKind::DataOnly);
    assert_eq!(report.restored.get(EntityKind::Users), 0);
    assert_eq!(report.restored.get(EntityKind::Transactions), 1);

    // Domain rows come from the snapshot
    assert_eq!(category_name(&conn, 1), "Groceries");
    let (id, amount): (i64, i64) = conn
        .query_row("SELECT id, amount_cents FROM transactions", [], |r| {
            Ok((r.get(0)?, r.get(1)?))
        })
        .unwrap();
    assert_eq!((id, amount), (1, 10_000));
    assert_eq!(row_count(&conn, "transactions"), 1);

    // Accounts are left as they were
    let email: String = conn
        .query_row("SELECT email FROM users WHERE id = ?1", [USER_ID], |r| r.get(0))
        .unwrap();
    assert_eq!(email, "kept@example.com");
    assert_eq!(row_count(&conn, "users"), 1);
    assert_eq!(row_count(&conn, "user_roles"), 1);

    let warnings: Vec<_> = capture
        .find("restore", EVENT_DATA_ONLY_RESTORE)
        .into_iter()
        .filter(|e| e.field("request_id") == Some(ctx.request_id.as_str()))
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].level, tracing::Level::WARN);
}

#[test]
fn test_full_restore_emits_no_data_only_warning() {
    let capture = init_test_capture();
    let mut conn = setup_test_db();

    let ctx = RequestContext::new();
    restore_snapshot(&mut conn, &household_snapshot(), &ctx).unwrap();

    let warnings = capture.count_events(|e| {
        e.event.as_deref() == Some(EVENT_DATA_ONLY_RESTORE)
            && e.field("request_id") == Some(ctx.request_id.as_str())
    });
    assert_eq!(warnings, 0);
}

#[test]
fn test_data_only_restore_rejects_unknown_accounts() {
    let mut conn = setup_test_db();
    let mut shared = Snapshot::new(SnapshotKind::DataOnly, generated_at());
    let mut category = household_snapshot().categories[0].clone();
    category.user_id = None;
    category.name = "Shared".to_string();
    shared.categories.push(category);
    seed(&conn, &shared);

    let err = restore_snapshot(
        &mut conn,
        &data_only(&household_snapshot()),
        &RequestContext::new(),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::IncompatibleBackup);
    assert_eq!(err.entity_id(), Some(USER_ID));
    assert_eq!(category_name(&conn, 1), "Shared");
    assert_eq!(row_count(&conn, "transactions"), 0);
}

#[test]
fn test_version_skew_is_warned_not_rejected() {
    let capture = init_test_capture();
    let mut conn = setup_test_db();
    let mut future = household_snapshot();
    future.version = 99;

    let report = restore_snapshot(&mut conn, &future, &RequestContext::new()).unwrap();

    assert!(report.version_mismatch);
    assert_eq!(report.artifact_version, 99);
    let skew = capture.count_events(|e| {
        e.event.as_deref() == Some(EVENT_VERSION_SKEW) && e.field("artifact_version") == Some("99")
    });
    assert!(skew >= 1);
}

#[test]
fn test_restore_while_store_is_locked_is_concurrency_error() {
    let dir = TempDir::new().unwrap();
    let (path, mut holder) = setup_file_db(dir.path());
    seed(&holder, &household_snapshot());

    let mut contender = fintrack_store::db::open(&path).unwrap();
    contender.busy_timeout(Duration::from_millis(50)).unwrap();

    let lock = holder
        .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)
        .unwrap();
    let err = restore_snapshot(&mut contender, &household_snapshot(), &RequestContext::new())
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Concurrency);
    drop(lock);

    restore_snapshot(&mut contender, &household_snapshot(), &RequestContext::new()).unwrap();
}
