//! FinTrack Engine - Orchestration layer
//!
//! Backup Producer, Restore Engine and the automatic backup scheduler,
//! coordinating the core snapshot model with the SQLite store.

pub mod commands;
pub mod scheduler;

pub use commands::backup::{produce_backup, prune_backups, BackupResult};
pub use commands::restore::{restore_backup, restore_snapshot, RestorePhase, RestoreReport};
pub use scheduler::{BackupJob, BackupScheduler, SchedulerState, SqliteBackupJob};
