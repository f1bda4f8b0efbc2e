//! Application configuration
//!
//! Loaded from a TOML file. Every key is optional; a missing file yields the
//! defaults so a fresh checkout runs without setup.
//!
//! ```toml
//! database_path = "fintrack.db"
//!
//! [backup]
//! enable_automatic_backups = true
//! root_path = "backups"
//! retention_days = 30
//! interval_minutes = 1440
//! run_on_startup = false
//! ```

use crate::errors::{ExError, ExErrorKind, Result};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Sleep between checks while automatic backups are disabled
pub const DISABLED_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Interval used when the configured one is not positive
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

pub const DEFAULT_FILE_PREFIX: &str = "fintrack-backup";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    #[serde(default)]
    pub backup: BackupOptions,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("fintrack.db")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            backup: BackupOptions::default(),
        }
    }
}

/// Backup producer and scheduler options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupOptions {
    #[serde(default)]
    pub enable_automatic_backups: bool,

    /// Artifact directory; relative paths resolve against the content root
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,

    /// Artifacts older than this many days are pruned; zero or less disables pruning
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,

    /// Minutes between scheduled backups; zero or less falls back to a day
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: i64,

    #[serde(default)]
    pub run_on_startup: bool,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Produce full backups (with accounts) rather than data-only ones
    #[serde(default = "default_true")]
    pub include_identity: bool,
}

fn default_root_path() -> PathBuf {
    PathBuf::from("backups")
}
fn default_retention_days() -> i64 {
    30
}
fn default_interval_minutes() -> i64 {
    24 * 60
}
fn default_file_prefix() -> String {
    DEFAULT_FILE_PREFIX.to_string()
}
fn default_true() -> bool {
    true
}

impl Default for BackupOptions {
    fn default() -> Self {
        Self {
            enable_automatic_backups: false,
            root_path: default_root_path(),
            retention_days: default_retention_days(),
            interval_minutes: default_interval_minutes(),
            run_on_startup: false,
            file_prefix: default_file_prefix(),
            include_identity: true,
        }
    }
}

impl BackupOptions {
    /// Interval between scheduled runs, with the non-positive fallback applied
    pub fn effective_interval(&self) -> Duration {
        if self.interval_minutes <= 0 {
            return DEFAULT_INTERVAL;
        }
        Duration::from_secs((self.interval_minutes as u64).saturating_mul(60))
    }

    /// Cutoff before which artifacts are pruned, or `None` when pruning is off
    pub fn retention_cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.retention_days <= 0 {
            return None;
        }
        ChronoDuration::try_days(self.retention_days).and_then(|d| now.checked_sub_signed(d))
    }

    /// Absolute artifact directory
    pub fn resolve_root(&self, content_root: &Path) -> PathBuf {
        if self.root_path.is_absolute() {
            self.root_path.clone()
        } else {
            content_root.join(&self.root_path)
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| {
            ExError::new(ExErrorKind::Config)
                .with_op("load_config")
                .with_message(format!("Invalid configuration: {}", e))
        })
    }

    /// Load from `path`; a missing file yields defaults.
    ///
    /// Relative paths inside the file are resolved against the file's
    /// directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cwd = std::env::current_dir().map_err(|e| config_io_error(path, e))?;
                return Ok(Self::default().resolved_against(&cwd));
            }
            Err(e) => return Err(config_io_error(path, e)),
        };

        let config = Self::from_toml_str(&text).map_err(|e| e.with_entity_id(path.display().to_string()))?;
        let content_root = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => std::env::current_dir().map_err(|e| config_io_error(path, e))?,
        };
        Ok(config.resolved_against(&content_root))
    }

    /// Make database and artifact paths absolute
    pub fn resolved_against(mut self, content_root: &Path) -> Self {
        if self.database_path.is_relative() {
            self.database_path = content_root.join(&self.database_path);
        }
        self.backup.root_path = self.backup.resolve_root(content_root);
        self
    }
}

fn config_io_error(path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Config)
        .with_op("load_config")
        .with_entity_id(path.display().to_string())
        .with_message(format!("Cannot read configuration: {}", err))
}
