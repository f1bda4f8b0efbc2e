//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRIGGER: &str = "trigger";

// Backup artifacts
pub const FIELD_FILE_NAME: &str = "file_name";
pub const FIELD_SNAPSHOT_KIND: &str = "snapshot_kind";
pub const FIELD_ENTITY: &str = "entity";
pub const FIELD_ROWS: &str = "rows";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Operational signals (warnings, never surfaced to a caller)
pub const EVENT_VERSION_SKEW: &str = "version_skew";
pub const EVENT_DATA_ONLY_RESTORE: &str = "data_only_restore";
pub const EVENT_PRUNE_FAILED: &str = "prune_failed";
pub const EVENT_CYCLE_FAILED: &str = "cycle_failed";
