//! FinTrack Core - backup data model and codec
//!
//! This crate holds everything about a backup that does not touch the
//! database:
//! - Flat entity records and the dependency order between collections
//! - The versioned `Snapshot` document, its classification and its gzip/JSON codec
//! - Artifact file naming
//! - Configuration, the structured error type and the logging facility

pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod snapshot;

pub use fintrack_core_types as core_types;

// Re-export commonly used types
pub use config::{AppConfig, BackupOptions};
pub use errors::{ExError, ExErrorKind, Result, SnapshotError};
pub use model::{EntityCounts, EntityKind};
pub use snapshot::{Snapshot, SnapshotKind, SNAPSHOT_FORMAT_VERSION};
