//! Snapshot-level reads and per-collection restore steps

#![allow(clippy::result_large_err)]

use super::columns::quote_ident;
use super::{delete_all, insert_all, load_all};
use crate::errors::{from_rusqlite, Result};
use chrono::{DateTime, Utc};
use fintrack_core::model::EntityKind;
use fintrack_core::{Snapshot, SnapshotKind};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior};

/// Read every backed-up collection into a new snapshot.
///
/// All collections are read inside one deferred transaction, so the
/// snapshot is a consistent view even while other connections write.
/// Identity collections are read only for a `Full` snapshot.
pub fn read_snapshot(
    conn: &mut Connection,
    kind: SnapshotKind,
    generated_at: DateTime<Utc>,
) -> Result<Snapshot> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Deferred)
        .map_err(from_rusqlite)?;

    let mut snapshot = Snapshot::new(kind, generated_at);
    for entity in EntityKind::insert_order(kind.includes_identity()) {
        load_collection(&tx, &mut snapshot, entity)?;
    }

    tx.commit().map_err(from_rusqlite)?;
    Ok(snapshot)
}

fn load_collection(conn: &Connection, snapshot: &mut Snapshot, kind: EntityKind) -> Result<()> {
    match kind {
        EntityKind::Roles => snapshot.roles = load_all(conn)?,
        EntityKind::Users => snapshot.users = load_all(conn)?,
        EntityKind::UserRoles => snapshot.user_roles = load_all(conn)?,
        EntityKind::UserClaims => snapshot.user_claims = load_all(conn)?,
        EntityKind::UserLogins => snapshot.user_logins = load_all(conn)?,
        EntityKind::UserTokens => snapshot.user_tokens = load_all(conn)?,
        EntityKind::RoleClaims => snapshot.role_claims = load_all(conn)?,
        EntityKind::Categories => snapshot.categories = load_all(conn)?,
        EntityKind::Budgets => snapshot.budgets = load_all(conn)?,
        EntityKind::Goals => snapshot.goals = load_all(conn)?,
        EntityKind::RecurringTransactions => snapshot.recurring_transactions = load_all(conn)?,
        EntityKind::Transactions => snapshot.transactions = load_all(conn)?,
    }
    Ok(())
}

/// Insert one collection of `snapshot` with identifiers preserved
pub fn insert_collection(conn: &Connection, snapshot: &Snapshot, kind: EntityKind) -> Result<usize> {
    match kind {
        EntityKind::Roles => insert_all(conn, &snapshot.roles),
        EntityKind::Users => insert_all(conn, &snapshot.users),
        EntityKind::UserRoles => insert_all(conn, &snapshot.user_roles),
        EntityKind::UserClaims => insert_all(conn, &snapshot.user_claims),
        EntityKind::UserLogins => insert_all(conn, &snapshot.user_logins),
        EntityKind::UserTokens => insert_all(conn, &snapshot.user_tokens),
        EntityKind::RoleClaims => insert_all(conn, &snapshot.role_claims),
        EntityKind::Categories => insert_all(conn, &snapshot.categories),
        EntityKind::Budgets => insert_all(conn, &snapshot.budgets),
        EntityKind::Goals => insert_all(conn, &snapshot.goals),
        EntityKind::RecurringTransactions => insert_all(conn, &snapshot.recurring_transactions),
        EntityKind::Transactions => insert_all(conn, &snapshot.transactions),
    }
}

/// Remove every row of one collection
pub fn delete_collection(conn: &Connection, kind: EntityKind) -> Result<usize> {
    delete_all(conn, kind)
}

pub fn count_rows(conn: &Connection, kind: EntityKind) -> Result<usize> {
    let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(kind.table_name()));
    let count: i64 = conn
        .query_row(&sql, [], |row| row.get(0))
        .map_err(from_rusqlite)?;
    Ok(count as usize)
}

/// Ids from `user_ids` that have no row in `users`, in input order
pub fn find_missing_users<'a, I>(conn: &Connection, user_ids: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut stmt = conn
        .prepare("SELECT 1 FROM users WHERE id = ?1")
        .map_err(from_rusqlite)?;

    let mut missing = Vec::new();
    for id in user_ids {
        let found: Option<i64> = stmt
            .query_row([id], |row| row.get(0))
            .optional()
            .map_err(from_rusqlite)?;
        if found.is_none() {
            missing.push(id.to_string());
        }
    }
    Ok(missing)
}
