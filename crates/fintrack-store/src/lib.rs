//! FinTrack Store - SQLite persistence gateway and artifact storage
//!
//! Provides:
//! - Connection management and embedded, checksummed migrations
//! - Per-entity table mapping (`TableRecord`) with snapshot reads and
//!   per-collection wipe/insert for restores
//! - Primary-key sequence repair
//! - On-disk artifact storage: atomic writes, listing, name resolution and
//!   retention pruning

pub mod artifacts;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod sequences;

// Re-export key types
pub use artifacts::{ArtifactInfo, PruneReport};
pub use errors::Result;
pub use repo::TableRecord;
pub use sequences::SequenceRepair;
