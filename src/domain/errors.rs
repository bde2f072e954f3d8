//! Domain error types
//!
//! This module defines the error hierarchy for Strata. All errors are
//! domain-specific and don't expose third-party types: parser, I/O and
//! serialization failures are flattened into messages at the boundary.

use thiserror::Error;

/// Main Strata error type
///
/// This is the primary error type used throughout the library. Override
/// conflicts on final properties are deliberately absent: they are reported
/// as warnings, never as errors.
#[derive(Debug, Error)]
pub enum StrataError {
    /// A property exists but its text cannot be coerced to the requested type
    #[error("Invalid value for property '{key}': {value:?} is not a valid {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },

    /// A caller-supplied argument was rejected
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A requested property does not exist
    #[error("Property {0} not found")]
    NotFound(String),

    /// Variable expansion did not terminate within the configured depth
    #[error(
        "Variable substitution depth too large: {depth} while resolving property '{key}' ({expression})"
    )]
    Substitution {
        key: String,
        depth: usize,
        expression: String,
    },

    /// A document, include target or entity could not be opened
    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// A document was opened but is not a well-formed property document
    #[error("Failed to parse {resource}: {message}")]
    Parse { resource: String, message: String },

    /// A type reference could not be resolved
    #[error("Type not found: {0}")]
    TypeNotFound(String),

    /// A credential provider failed
    #[error("Credential provider error: {0}")]
    Credential(String),

    /// Engine options are invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl StrataError {
    /// Builds a parse error for the given resource
    pub fn parse(resource: impl Into<String>, message: impl Into<String>) -> Self {
        StrataError::Parse {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Builds a coercion error for a property value
    pub fn invalid_value(key: &str, value: &str, expected: &'static str) -> Self {
        StrataError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for StrataError {
    fn from(err: std::io::Error) -> Self {
        StrataError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for StrataError {
    fn from(err: serde_json::Error) -> Self {
        StrataError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for StrataError {
    fn from(err: toml::de::Error) -> Self {
        StrataError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Writer-side XML failures; reader-side failures carry the resource name
// and are built with `StrataError::parse`.
impl From<quick_xml::Error> for StrataError {
    fn from(err: quick_xml::Error) -> Self {
        StrataError::Serialization(format!("XML error: {err}"))
    }
}
