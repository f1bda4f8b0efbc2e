//! Repository layer mapping entity records to SQLite tables
//!
//! Each record type implements [`TableRecord`]; the generic functions here
//! build their SQL from that mapping. [`snapshot`] composes them into
//! whole-snapshot reads and per-collection restore steps.

#![allow(clippy::result_large_err)]

pub mod columns;
mod finance;
mod identity;
pub mod snapshot;

use crate::errors::{from_rusqlite, Result};
use columns::quote_ident;
use fintrack_core::model::EntityKind;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};

pub use snapshot::{
    count_rows, delete_collection, find_missing_users, insert_collection, read_snapshot,
};

/// Mapping between a record type and its table
pub trait TableRecord: Sized {
    const KIND: EntityKind;

    /// Column list; `from_row` and `to_params` use this order
    const COLUMNS: &'static [&'static str];

    /// Primary key columns, used to order reads
    const KEY: &'static [&'static str];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    fn to_params(&self) -> Vec<Value>;
}

fn column_list(columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn select_sql<T: TableRecord>() -> String {
    format!(
        "SELECT {} FROM {} ORDER BY {}",
        column_list(T::COLUMNS),
        quote_ident(T::KIND.table_name()),
        column_list(T::KEY)
    )
}

fn insert_sql<T: TableRecord>() -> String {
    let placeholders = (1..=T::COLUMNS.len())
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(T::KIND.table_name()),
        column_list(T::COLUMNS),
        placeholders
    )
}

/// Load every row of `T`'s table in key order
pub fn load_all<T: TableRecord>(conn: &Connection) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(&select_sql::<T>()).map_err(from_rusqlite)?;
    let rows = stmt
        .query_map([], |row| T::from_row(row))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| from_rusqlite(e).with_entity_id(T::KIND.table_name()))?;
    Ok(rows)
}

/// Insert rows with their identifiers preserved
pub fn insert_all<T: TableRecord>(conn: &Connection, rows: &[T]) -> Result<usize> {
    if rows.is_empty() {
        return Ok(0);
    }
    let mut stmt = conn.prepare_cached(&insert_sql::<T>()).map_err(from_rusqlite)?;
    for row in rows {
        stmt.execute(params_from_iter(row.to_params()))
            .map_err(|e| from_rusqlite(e).with_entity_id(T::KIND.table_name()))?;
    }
    Ok(rows.len())
}

/// Delete every row of one collection's table
pub fn delete_all(conn: &Connection, kind: EntityKind) -> Result<usize> {
    conn.execute(&format!("DELETE FROM {}", quote_ident(kind.table_name())), [])
        .map_err(|e| from_rusqlite(e).with_entity_id(kind.table_name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintrack_core::model::{TransactionRecord, UserRoleRecord};

    #[test]
    fn test_select_sql_orders_by_key() {
        assert_eq!(
            select_sql::<UserRoleRecord>(),
            "SELECT \"user_id\", \"role_id\" FROM \"user_roles\" ORDER BY \"user_id\", \"role_id\""
        );
    }

    #[test]
    fn test_insert_sql_numbers_placeholders() {
        let sql = insert_sql::<TransactionRecord>();
        assert!(sql.starts_with("INSERT INTO \"transactions\" (\"id\", "));
        assert!(sql.ends_with("?11)"));
    }
}
