//! Field keys and event names shared by the logging macros and the test
//! capture layer

/// Operation name (`apply_all`, `apply_one`, `rollback_latest`, ...)
pub const FIELD_OP: &str = "op";
/// One of the `EVENT_*` values
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
/// Migration version a record is about
pub const FIELD_VERSION: &str = "version";
pub const FIELD_ERR_CODE: &str = "err.code";
/// Human message attached by `tracing` to every event
pub const FIELD_MESSAGE: &str = "message";

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
