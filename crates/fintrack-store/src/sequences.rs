//! Primary-key sequence repair
//!
//! Restored rows keep their original identifiers, so after a restore every
//! auto-increment sequence must be moved past the largest restored id.
//! SQLite keeps the high-water mark of `AUTOINCREMENT` tables in
//! `sqlite_sequence`; tables without it need no repair.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use crate::repo::columns::quote_ident;
use fintrack_core::model::EntityKind;
use rusqlite::{Connection, OptionalExtension};

/// Identifier column backed by a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencedColumn {
    pub kind: EntityKind,
    pub column: &'static str,
}

pub const SEQUENCED_COLUMNS: &[SequencedColumn] = &[
    SequencedColumn { kind: EntityKind::UserClaims, column: "id" },
    SequencedColumn { kind: EntityKind::RoleClaims, column: "id" },
    SequencedColumn { kind: EntityKind::Categories, column: "id" },
    SequencedColumn { kind: EntityKind::Budgets, column: "id" },
    SequencedColumn { kind: EntityKind::Goals, column: "id" },
    SequencedColumn { kind: EntityKind::RecurringTransactions, column: "id" },
    SequencedColumn { kind: EntityKind::Transactions, column: "id" },
];

/// Outcome for one repaired sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRepair {
    pub kind: EntityKind,
    /// Value recorded in `sqlite_sequence`; the next insert gets a larger id
    pub high_water_mark: i64,
}

/// Whether this database keeps a repairable sequence for `kind`'s table
pub fn supports_sequence_repair(conn: &Connection, kind: EntityKind) -> Result<bool> {
    let has_sequence_table: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'sqlite_sequence'",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)?;
    if has_sequence_table.is_none() {
        return Ok(false);
    }

    let table_sql: Option<String> = conn
        .query_row(
            "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [kind.table_name()],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)?;

    Ok(table_sql
        .map(|sql| sql.to_uppercase().contains("AUTOINCREMENT"))
        .unwrap_or(false))
}

/// Set each sequence among `kinds` to `max(largest id, 1)`.
///
/// Kinds without a sequenced column, or whose table the capability check
/// rejects, are skipped.
pub fn repair_sequences(conn: &Connection, kinds: &[EntityKind]) -> Result<Vec<SequenceRepair>> {
    let mut repaired = Vec::new();

    for seq in SEQUENCED_COLUMNS.iter().filter(|s| kinds.contains(&s.kind)) {
        let table = seq.kind.table_name();
        if !supports_sequence_repair(conn, seq.kind)? {
            tracing::debug!(table, "Sequence repair not supported, skipping");
            continue;
        }

        let max_sql = format!(
            "SELECT MAX(COALESCE(MAX({}), 0), 1) FROM {}",
            quote_ident(seq.column),
            quote_ident(table)
        );
        let max_id: i64 = conn
            .query_row(&max_sql, [], |row| row.get(0))
            .map_err(|e| from_rusqlite(e).with_entity_id(table))?;

        let updated = conn
            .execute(
                "UPDATE sqlite_sequence SET seq = ?1 WHERE name = ?2",
                rusqlite::params![max_id, table],
            )
            .map_err(from_rusqlite)?;
        if updated == 0 {
            conn.execute(
                "INSERT INTO sqlite_sequence (name, seq) VALUES (?1, ?2)",
                rusqlite::params![table, max_id],
            )
            .map_err(from_rusqlite)?;
        }

        tracing::debug!(table, high_water_mark = max_id, "Repaired sequence");
        repaired.push(SequenceRepair {
            kind: seq.kind,
            high_water_mark: max_id,
        });
    }

    Ok(repaired)
}
