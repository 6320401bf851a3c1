//! Logging for migration runs
//!
//! `init(profile)` installs the global `tracing` subscriber (stderr, pretty
//! or JSON). Orchestrator operations log through `log_op_start!`,
//! `log_op_end!` and `log_op_error!` so every run produces one `start` and
//! one `end` or `end_error` event, inside a `migrator` span carrying the
//! run id and vendor.
//!
//! ```rust
//! use dbmigrate_core::logging_facility::{init, Profile};
//!
//! init(Profile::Production);
//! ```
//!
//! Tests use `test_capture::init_test_capture()` instead of `init`.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
