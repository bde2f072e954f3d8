//! Property records and property names
//!
//! A [`Property`] is the externally visible snapshot of one store entry:
//! its raw (unsubstituted) value, whether it is final, and where it came from.

use super::errors::StrataError;
use super::result::Result;
use serde::Serialize;
use std::fmt;

/// Provenance tag recorded for values written through `set`
pub const PROGRAMMATIC_SOURCE: &str = "programmatically";

/// Snapshot of a single property
///
/// # Examples
///
/// ```
/// use strata::domain::Property;
///
/// let prop = Property::new("fs.default.name", Some("file:///".to_string()));
/// assert_eq!(prop.value.as_deref(), Some("file:///"));
/// assert!(!prop.is_final);
/// assert!(prop.sources.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Trimmed property name
    pub name: String,

    /// Raw value; `None` is an explicit null (only in allow-null mode)
    pub value: Option<String>,

    /// Whether later documents and `set` calls are ignored for this key
    pub is_final: bool,

    /// Provenance, oldest first; the last entry is the most specific locator
    pub sources: Vec<String>,
}

impl Property {
    /// Creates a non-final property without provenance
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
            is_final: false,
            sources: Vec::new(),
        }
    }

    /// Sets the final flag
    pub fn with_final(mut self, is_final: bool) -> Self {
        self.is_final = is_final;
        self
    }

    /// Appends a provenance entry
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.sources.push(source.into());
        self
    }

    /// Most specific provenance entry, if any
    pub fn last_source(&self) -> Option<&str> {
        self.sources.last().map(String::as_str)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) => write!(f, "{}={}", self.name, v),
            None => write!(f, "{}=<null>", self.name),
        }
    }
}

/// Trims a property name and rejects blank names
///
/// # Errors
///
/// Returns [`StrataError::InvalidArgument`] if the name is empty after trimming
pub fn normalize_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StrataError::InvalidArgument(
            "Property name must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name_trims() {
        assert_eq!(normalize_name("  my.key \n").unwrap(), "my.key");
    }

    #[test]
    fn test_normalize_name_rejects_blank() {
        assert!(normalize_name("").is_err());
        assert!(normalize_name("   ").is_err());
    }

    #[test]
    fn test_property_builder() {
        let prop = Property::new("a", Some("b".to_string()))
            .with_final(true)
            .with_source("x.xml");
        assert!(prop.is_final);
        assert_eq!(prop.last_source(), Some("x.xml"));
        assert_eq!(prop.to_string(), "a=b");
    }

    #[test]
    fn test_property_display_null() {
        let prop = Property::new("a", None);
        assert_eq!(prop.to_string(), "a=<null>");
    }
}
