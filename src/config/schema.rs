//! Engine options schema
//!
//! [`StoreOptions`] controls how a property store locates and loads its
//! documents. It is plain serde data, usually read from a TOML file by
//! [`load_options`](super::loader::load_options).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default bound on nested `${...}` expansion
pub const DEFAULT_MAX_SUBSTITUTION_DEPTH: usize = 20;

/// Options for a property store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreOptions {
    /// Load the registered default resources on construction
    #[serde(default = "default_true")]
    pub load_defaults: bool,

    /// Directories searched for named resources and relative includes
    #[serde(default)]
    pub search_path: Vec<PathBuf>,

    /// Keep properties whose value is empty or explicitly null
    #[serde(default)]
    pub allow_null_values: bool,

    /// Maximum nesting of `${...}` references
    #[serde(default = "default_max_substitution_depth")]
    pub max_substitution_depth: usize,

    /// Timeout for documents fetched over HTTP
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Logging configuration for the command-line tool
    #[serde(default)]
    pub logging: LoggingOptions,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            load_defaults: true,
            search_path: Vec::new(),
            allow_null_values: false,
            max_substitution_depth: DEFAULT_MAX_SUBSTITUTION_DEPTH,
            http_timeout_secs: default_http_timeout_secs(),
            logging: LoggingOptions::default(),
        }
    }
}

impl StoreOptions {
    /// Options for a store that starts empty
    pub fn without_defaults() -> Self {
        Self {
            load_defaults: false,
            ..Self::default()
        }
    }

    /// Validates the options
    ///
    /// # Errors
    ///
    /// Returns an error if any option is out of range
    pub fn validate(&self) -> Result<(), String> {
        if self.max_substitution_depth == 0 || self.max_substitution_depth > 1000 {
            return Err(format!(
                "max_substitution_depth must be between 1 and 1000, got {}",
                self.max_substitution_depth
            ));
        }
        if self.http_timeout_secs == 0 {
            return Err("http_timeout_secs must be greater than 0".to_string());
        }
        self.logging.validate()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingOptions {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingOptions {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_max_substitution_depth() -> usize {
    DEFAULT_MAX_SUBSTITUTION_DEPTH
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_valid() {
        let options = StoreOptions::default();
        assert!(options.validate().is_ok());
        assert!(options.load_defaults);
        assert_eq!(options.max_substitution_depth, 20);
    }

    #[test]
    fn test_without_defaults() {
        assert!(!StoreOptions::without_defaults().load_defaults);
    }

    #[test]
    fn test_zero_depth_rejected() {
        let options = StoreOptions {
            max_substitution_depth: 0,
            ..StoreOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_invalid_rotation_rejected() {
        let mut options = StoreOptions::default();
        options.logging.local_rotation = "weekly".to_string();
        let err = options.validate().unwrap_err();
        assert!(err.contains("weekly"));
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let options: StoreOptions = toml::from_str(
            r#"
allow_null_values = true
search_path = ["/etc/strata"]
"#,
        )
        .unwrap();
        assert!(options.allow_null_values);
        assert!(options.load_defaults);
        assert_eq!(options.search_path, vec![PathBuf::from("/etc/strata")]);
        assert_eq!(options.http_timeout_secs, 30);
    }
}
