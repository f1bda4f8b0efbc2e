//! Command orchestration layer.
//!
//! Coordinates the snapshot codec in fintrack-core with the SQLite store,
//! owning operation-boundary logging for backups and restores.

pub mod backup;
pub mod restore;
