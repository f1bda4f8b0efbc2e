//! Schema migrations
//!
//! SQL files are compiled into the binary and applied in order. Each applied
//! file is recorded in `schema_version` with the SHA-256 of its text, so an
//! edited migration or a database written by a newer build is refused
//! instead of silently diverging.

mod runner;

pub use runner::{applied_migrations, apply_migrations};

use sha2::{Digest, Sha256};

/// One embedded migration
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

impl Migration {
    pub fn checksum(&self) -> String {
        hex::encode(Sha256::digest(self.sql.as_bytes()))
    }
}

/// All migrations, oldest first
pub const MIGRATIONS: &[Migration] = &[Migration {
    id: "001_initial_schema",
    sql: include_str!("../../migrations/001_initial_schema.sql"),
}];
