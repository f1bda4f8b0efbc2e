#![allow(dead_code)]

use chrono::{NaiveDate, TimeZone, Utc};
use fintrack_core::model::{
    BudgetPeriod, BudgetRecord, CategoryRecord, Frequency, RecurringTransactionRecord,
    RoleRecord, TransactionRecord, TransactionType, UserRecord, UserRoleRecord,
};
use fintrack_core::{BackupOptions, Snapshot, SnapshotKind};
use std::path::{Path, PathBuf};

pub const USER_ID: &str = "6f1c2a9e-0000-4000-8000-000000000001";

pub fn generated_at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 3, 0, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One account with a grocery category, a monthly budget, a recurring
/// template and one expense
pub fn household_snapshot() -> Snapshot {
    let created = generated_at();
    let mut snapshot = Snapshot::new(SnapshotKind::Full, created);

    snapshot.roles.push(RoleRecord {
        id: "role-user".to_string(),
        name: Some("User".to_string()),
        normalized_name: Some("USER".to_string()),
        concurrency_stamp: None,
    });
    snapshot
        .users
        .push(UserRecord::new(USER_ID, "ana@example.com", created));
    snapshot.user_roles.push(UserRoleRecord {
        user_id: USER_ID.to_string(),
        role_id: "role-user".to_string(),
    });
    snapshot.categories.push(CategoryRecord {
        id: 1,
        name: "Groceries".to_string(),
        category_type: TransactionType::Expense,
        icon: Some("cart".to_string()),
        color: Some("#4caf50".to_string()),
        is_default: false,
        user_id: Some(USER_ID.to_string()),
        created_at: created,
    });
    snapshot.budgets.push(BudgetRecord {
        id: 1,
        user_id: USER_ID.to_string(),
        category_id: 1,
        amount_cents: 50_000,
        period: BudgetPeriod::Monthly,
        start_date: date(2024, 6, 1),
        end_date: None,
        created_at: created,
    });
    snapshot.recurring_transactions.push(RecurringTransactionRecord {
        id: 1,
        user_id: USER_ID.to_string(),
        category_id: 1,
        amount_cents: 10_000,
        transaction_type: TransactionType::Expense,
        description: Some("Weekly shop".to_string()),
        frequency: Frequency::Monthly,
        day_of_month: Some(1),
        start_date: date(2024, 6, 1),
        end_date: None,
        next_occurrence: date(2024, 7, 1),
        is_active: true,
        created_at: created,
    });
    snapshot.transactions.push(TransactionRecord {
        id: 1,
        user_id: USER_ID.to_string(),
        category_id: 1,
        amount_cents: 10_000,
        transaction_type: TransactionType::Expense,
        description: Some("Weekly shop".to_string()),
        date: date(2024, 6, 1),
        notes: None,
        recurring_transaction_id: Some(1),
        created_at: created,
        updated_at: None,
    });
    snapshot
}

pub fn setup_test_db() -> rusqlite::Connection {
    let mut conn = fintrack_store::db::open_in_memory().unwrap();
    fintrack_store::migrations::apply_migrations(&mut conn).unwrap();
    conn
}

/// Migrated database file inside `dir`
pub fn setup_file_db(dir: &Path) -> (PathBuf, rusqlite::Connection) {
    let path = dir.join("fintrack.db");
    let conn = fintrack_store::db::open_and_migrate(&path).unwrap();
    (path, conn)
}

/// Insert every collection of `snapshot` in dependency order
pub fn seed(conn: &rusqlite::Connection, snapshot: &Snapshot) {
    for kind in fintrack_core::EntityKind::insert_order(true) {
        fintrack_store::repo::insert_collection(conn, snapshot, kind).unwrap();
    }
}

pub fn row_count(conn: &rusqlite::Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
        .unwrap()
}

pub fn backup_options(root: &Path) -> BackupOptions {
    BackupOptions {
        root_path: root.to_path_buf(),
        ..BackupOptions::default()
    }
}
