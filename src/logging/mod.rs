//! Logging and observability
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary (or the embedding application) via [`init_logging`].
//!
//! Event levels used by the engine:
//! - `debug` when documents are loaded or skipped
//! - `info` when a store is reloaded
//! - `warn` for final-key override attempts, deprecated keys and bad patterns
//!
//! # Example
//!
//! ```no_run
//! use strata::logging::init_logging;
//! use strata::config::LoggingOptions;
//!
//! let options = LoggingOptions::default();
//! let _guard = init_logging("info", &options).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a resource merged into a store
///
/// # Example
///
/// ```no_run
/// use strata::log_resource_applied;
/// use strata::core::OverlaySummary;
///
/// let summary = OverlaySummary::default();
/// log_resource_applied!(&summary);
/// ```
#[macro_export]
macro_rules! log_resource_applied {
    ($summary:expr) => {
        tracing::info!(
            resource = %$summary.locator,
            applied = $summary.applied,
            ignored_final = $summary.ignored_final,
            duplicate = $summary.duplicate,
            "Resource applied"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use strata::log_error_with_context;
/// use strata::domain::StrataError;
///
/// let error = StrataError::Configuration("Invalid options".to_string());
/// log_error_with_context!(&error, "Failed to load options");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
