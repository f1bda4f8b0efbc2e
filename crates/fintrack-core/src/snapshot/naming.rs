//! Artifact file names: `<prefix>-<YYYYMMDD-HHmmss>.json.gz` (UTC)
//!
//! The timestamp is fixed-width, so for one prefix lexicographic order is
//! chronological order.

use chrono::{DateTime, NaiveDateTime, Utc};

pub const ARTIFACT_EXTENSION: &str = ".json.gz";
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

pub fn artifact_file_name(prefix: &str, generated_at: DateTime<Utc>) -> String {
    format!(
        "{}-{}{}",
        prefix,
        generated_at.format(TIMESTAMP_FORMAT),
        ARTIFACT_EXTENSION
    )
}

/// Generation time encoded in an artifact name, if the name matches
pub fn parse_artifact_timestamp(prefix: &str, file_name: &str) -> Option<DateTime<Utc>> {
    let stamp = file_name
        .strip_prefix(prefix)?
        .strip_prefix('-')?
        .strip_suffix(ARTIFACT_EXTENSION)?;
    if stamp.len() != 15 {
        return None;
    }
    NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

pub fn is_artifact_name(prefix: &str, file_name: &str) -> bool {
    parse_artifact_timestamp(prefix, file_name).is_some()
}
