//! Retention pruning
//!
//! Deletes artifacts strictly older than the retention cutoff. A file that
//! cannot be inspected or deleted is logged and skipped; the pass always
//! visits every artifact.

#![allow(clippy::result_large_err)]

use crate::errors::{io_error, Result};
use chrono::{DateTime, Utc};
use fintrack_core::core_types::schema::EVENT_PRUNE_FAILED;
use fintrack_core::snapshot::naming::is_artifact_name;
use fintrack_core::BackupOptions;
use std::fs::{self, DirEntry, Metadata};
use std::io;
use std::path::Path;

/// What a prune pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub deleted: Vec<String>,
    /// File name and reason for each artifact that could not be removed
    pub failed: Vec<(String, String)>,
}

/// Age of a file: its creation time, or its modification time where the
/// filesystem records no creation time
pub fn file_age(_path: &Path, metadata: &Metadata) -> io::Result<DateTime<Utc>> {
    let time = metadata.created().or_else(|_| metadata.modified())?;
    Ok(DateTime::<Utc>::from(time))
}

/// Prune artifacts under the configured root older than the retention
/// period before `now`.
///
/// A non-positive retention disables pruning.
pub fn prune_artifacts(options: &BackupOptions, now: DateTime<Utc>) -> Result<PruneReport> {
    match options.retention_cutoff(now) {
        Some(cutoff) => {
            prune_older_than(&options.root_path, &options.file_prefix, cutoff, file_age)
        }
        None => Ok(PruneReport::default()),
    }
}

/// Delete every artifact whose age, as reported by `age_of`, is before `cutoff`
pub fn prune_older_than<F>(
    root: &Path,
    prefix: &str,
    cutoff: DateTime<Utc>,
    age_of: F,
) -> Result<PruneReport>
where
    F: Fn(&Path, &Metadata) -> io::Result<DateTime<Utc>>,
{
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(PruneReport::default()),
        Err(e) => return Err(io_error("prune_artifacts", e)),
    };
    Ok(prune_entries(root, entries, prefix, cutoff, age_of))
}

/// One pass over directory entries; an unreadable entry is recorded under
/// the directory's path and skipped
fn prune_entries<I, F>(
    root: &Path,
    entries: I,
    prefix: &str,
    cutoff: DateTime<Utc>,
    age_of: F,
) -> PruneReport
where
    I: IntoIterator<Item = io::Result<DirEntry>>,
    F: Fn(&Path, &Metadata) -> io::Result<DateTime<Utc>>,
{
    let mut report = PruneReport::default();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(
                    op = "prune_artifacts",
                    event = EVENT_PRUNE_FAILED,
                    dir = %root.display(),
                    error = %e,
                    "Could not read backup directory entry"
                );
                report.failed.push((root.display().to_string(), e.to_string()));
                continue;
            }
        };
        let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if !is_artifact_name(prefix, &file_name) {
            continue;
        }

        let path = entry.path();
        let outcome = entry.metadata().and_then(|metadata| {
            if !metadata.is_file() || age_of(&path, &metadata)? >= cutoff {
                return Ok(false);
            }
            fs::remove_file(&path).map(|_| true)
        });

        match outcome {
            Ok(true) => {
                tracing::debug!(file_name = %file_name, "Pruned backup artifact");
                report.deleted.push(file_name);
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(
                    op = "prune_artifacts",
                    event = EVENT_PRUNE_FAILED,
                    file_name = %file_name,
                    error = %e,
                    "Could not prune backup artifact"
                );
                report.failed.push((file_name, e.to_string()));
            }
        }
    }

    report.deleted.sort();
    report
}
