//! Canonical logging macros
//!
//! Every orchestrator and adapter operation logs one start event and exactly
//! one of end / end_error, using the field names in
//! `dbmigrate_core_types::schema`.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use dbmigrate_core::log_op_start;
/// log_op_start!("apply_all");
/// log_op_start!("apply_migration", version = "001");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = dbmigrate_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = dbmigrate_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use dbmigrate_core::log_op_end;
/// log_op_end!("apply_all", duration_ms = 42);
/// log_op_end!("apply_all", duration_ms = 42, applied_len = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = dbmigrate_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = dbmigrate_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// `$err` must be an `ExError` (taken by reference, not consumed).
///
/// # Example
///
/// ```
/// # use dbmigrate_core::{log_op_error, ExError, ExErrorKind};
/// let err = ExError::new(ExErrorKind::Persistence).with_version("003");
/// log_op_error!("apply_migration", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: &$crate::errors::ExError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = dbmigrate_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            err.message = ex_err.message(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: &$crate::errors::ExError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = dbmigrate_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            err.message = ex_err.message(),
            $($field)*
        );
    }};
}
