//! Logging infrastructure for filter evaluation.
//!
//! The crate uses `tracing` for structured logging. All events use target
//! `"vector_filter"` and include an `event` field for filtering.
//!
//! ## Library Integration
//!
//! The crate never initializes a global subscriber. Applications configure
//! tracing via `tracing_subscriber` or similar.
//!
//! ## Conventions
//!
//! - `event`: snake_case event name (required)
//! - `component`: subsystem (e.g., "context", "composite", "batch")
//! - Use `%` for Display, `?` for Debug formatting
//! - Per-row events are not allowed; batch-level events go to `debug`

/// Target for all filter log events.
pub(crate) const FILTER_TARGET: &str = "vector_filter";

/// Macro for debug-level log events.
///
/// # Example
/// ```ignore
/// log_debug!(
///     component = "batch",
///     event = "batch_filtered",
///     rows = row_count,
///     selected = out.len(),
/// );
/// ```
macro_rules! log_debug {
    ($($field:tt)*) => {
        ::tracing::debug!(target: $crate::observability::FILTER_TARGET, $($field)*)
    };
}

/// Macro for warn-level log events.
macro_rules! log_warn {
    ($($field:tt)*) => {
        ::tracing::warn!(target: $crate::observability::FILTER_TARGET, $($field)*)
    };
}

pub(crate) use log_debug;
pub(crate) use log_warn;
