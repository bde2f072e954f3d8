//! Configuration of the engine itself.
//!
//! Property documents are the data Strata manages; this module covers the
//! knobs of the engine that manages them:
//!
//! - [`StoreOptions`] - search path, null handling, substitution depth, HTTP timeout
//! - [`LoggingOptions`] - logging for the command-line tool
//! - [`keys`] - well-known property keys read from the store (redaction, credentials)
//! - [`SecretString`] - zeroizing wrapper for passwords
//!
//! # Example Options File
//!
//! ```toml
//! load_defaults = true
//! search_path = ["/etc/strata", "${HOME}/.strata"]
//! allow_null_values = false
//! max_substitution_depth = 20
//!
//! [logging]
//! local_enabled = true
//! local_path = "/var/log/strata"
//! local_rotation = "daily"
//! ```
//!
//! # Environment Variables
//!
//! `STRATA_CONF_DIR`, `STRATA_LOAD_DEFAULTS`, `STRATA_ALLOW_NULL_VALUES`,
//! `STRATA_MAX_SUBSTITUTION_DEPTH`, `STRATA_LOGGING_LOCAL_ENABLED` and
//! `STRATA_LOGGING_LOCAL_PATH` override the file.

pub mod keys;
pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_options, options_from_env};
pub use schema::{LoggingOptions, StoreOptions, DEFAULT_MAX_SUBSTITUTION_DEPTH};
pub use secret::{secret_string, SecretString, SecretValue};
