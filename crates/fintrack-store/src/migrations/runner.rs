//! Migration runner
//!
//! Recorded migrations are verified before anything is applied: every
//! recorded id must be known to this build and carry the same checksum.
//! Pending migrations then run one transaction each.

#![allow(clippy::result_large_err)]

use super::{Migration, MIGRATIONS};
use crate::errors::{checksum_mismatch, from_rusqlite, migration_error, Result};
use rusqlite::{params, Connection};

const CREATE_SCHEMA_VERSION: &str = "CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY,
    migration_id TEXT NOT NULL UNIQUE,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL
)";

/// Bring the schema up to date
pub fn apply_migrations(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(CREATE_SCHEMA_VERSION)
        .map_err(from_rusqlite)?;

    let recorded = recorded_checksums(conn)?;
    for (id, checksum) in &recorded {
        let Some(known) = MIGRATIONS.iter().find(|m| m.id == id) else {
            return Err(migration_error(
                id,
                "recorded in the database but unknown to this build",
            ));
        };
        let expected = known.checksum();
        if *checksum != expected {
            return Err(checksum_mismatch(id, checksum, &expected));
        }
    }

    for migration in MIGRATIONS {
        if recorded.iter().any(|(id, _)| id == migration.id) {
            continue;
        }
        apply_one(conn, migration)?;
    }
    Ok(())
}

/// Migration ids recorded in `schema_version`, in application order
pub fn applied_migrations(conn: &Connection) -> Result<Vec<String>> {
    Ok(recorded_checksums(conn)?
        .into_iter()
        .map(|(id, _)| id)
        .collect())
}

fn recorded_checksums(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut stmt = conn
        .prepare("SELECT migration_id, checksum FROM schema_version ORDER BY id")
        .map_err(from_rusqlite)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .map_err(from_rusqlite)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(from_rusqlite)
}

fn apply_one(conn: &mut Connection, migration: &Migration) -> Result<()> {
    let tx = conn.transaction().map_err(from_rusqlite)?;

    tx.execute_batch(migration.sql)
        .map_err(|e| migration_error(migration.id, &e.to_string()))?;
    tx.execute(
        "INSERT INTO schema_version (migration_id, applied_at, checksum) VALUES (?1, ?2, ?3)",
        params![
            migration.id,
            chrono::Utc::now().timestamp_millis(),
            migration.checksum()
        ],
    )
    .map_err(from_rusqlite)?;

    tx.commit().map_err(from_rusqlite)?;
    tracing::info!(migration_id = migration.id, "Applied migration");
    Ok(())
}
