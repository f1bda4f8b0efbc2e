//! On-disk backup artifacts
//!
//! Artifacts live flat under one root directory and are recognized purely by
//! name (`<prefix>-<YYYYMMDD-HHmmss>.json.gz`). Anything else in the root is
//! left alone by every operation here.

#![allow(clippy::result_large_err)]

mod atomic;
mod prune;

pub use atomic::atomic_write;
pub use prune::{file_age, prune_artifacts, prune_older_than, PruneReport};

use crate::errors::{artifact_not_found, invalid_artifact_name, io_error, Result};
use chrono::{DateTime, Utc};
use fintrack_core::snapshot::naming::parse_artifact_timestamp;
use std::fs;
use std::path::{Path, PathBuf};

/// One artifact found under the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactInfo {
    pub file_name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Generation time encoded in the name
    pub created_at: DateTime<Utc>,
}

/// Write artifact bytes under `root`, returning the stored path
pub fn store_artifact(root: &Path, file_name: &str, content: &[u8]) -> Result<PathBuf> {
    let path = root.join(file_name);
    atomic_write(&path, content)?;
    Ok(path)
}

/// Artifacts under `root`, newest first; a missing root has none
pub fn list_artifacts(root: &Path, prefix: &str) -> Result<Vec<ArtifactInfo>> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_error("list_artifacts", e)),
    };

    let mut artifacts = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_error("list_artifacts", e))?;
        let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        let Some(created_at) = parse_artifact_timestamp(prefix, &file_name) else {
            continue;
        };
        let metadata = entry.metadata().map_err(|e| io_error("list_artifacts", e))?;
        if !metadata.is_file() {
            continue;
        }
        artifacts.push(ArtifactInfo {
            file_name,
            path: entry.path(),
            size_bytes: metadata.len(),
            created_at,
        });
    }

    artifacts.sort_by(|a, b| b.file_name.cmp(&a.file_name));
    Ok(artifacts)
}

/// Map an artifact name to its path under `root`.
///
/// Only bare names matching the artifact pattern are accepted, so a caller
/// cannot reach outside the root.
pub fn resolve_artifact(root: &Path, prefix: &str, file_name: &str) -> Result<PathBuf> {
    if file_name.contains(['/', '\\']) || file_name.contains("..") {
        return Err(invalid_artifact_name(file_name, "path separators are not allowed"));
    }
    if parse_artifact_timestamp(prefix, file_name).is_none() {
        return Err(invalid_artifact_name(
            file_name,
            &format!("expected {}-YYYYMMDD-HHmmss.json.gz", prefix),
        ));
    }

    let path = root.join(file_name);
    if !path.is_file() {
        return Err(artifact_not_found(file_name));
    }
    Ok(path)
}
