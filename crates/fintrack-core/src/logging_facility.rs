//! Structured logging facility for fintrack
//!
//! - Single initialization point via `init(profile)`
//! - Operation boundary macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Operational warnings via `log_op_warn!` (version skew, data-only restores,
//!   pruning failures)
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use fintrack_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
