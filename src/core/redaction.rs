//! Masking of sensitive values in dumps
//!
//! Key names are matched against the comma-separated regular expressions
//! stored under `strata.security.sensitive-config-keys`. A pattern matches if
//! it is found anywhere in the name.

use crate::config::keys::{REDACTED_TEXT, SENSITIVE_CONFIG_KEYS, SENSITIVE_CONFIG_KEYS_DEFAULT};
use crate::core::store::PropertyStore;
use crate::domain::Result;
use regex::RegexSet;

/// Compiled sensitive-key patterns
#[derive(Debug, Clone)]
pub struct Redactor {
    patterns: RegexSet,
}

impl Redactor {
    /// Compiles `patterns`; invalid entries are logged and skipped
    pub fn new(patterns: &str) -> Self {
        let valid: Vec<&str> = patterns
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .filter(|p| match regex::Regex::new(p) {
                Ok(_) => true,
                Err(e) => {
                    tracing::warn!(pattern = %p, error = %e, "Ignoring invalid sensitive key pattern");
                    false
                }
            })
            .collect();
        Self {
            patterns: RegexSet::new(valid).unwrap_or_else(|_| RegexSet::empty()),
        }
    }

    /// Redactor configured by `store`
    ///
    /// # Errors
    ///
    /// Returns a substitution error from the pattern property
    pub fn from_store(store: &PropertyStore) -> Result<Self> {
        let patterns = store.get_or(SENSITIVE_CONFIG_KEYS, SENSITIVE_CONFIG_KEYS_DEFAULT)?;
        Ok(Self::new(&patterns))
    }

    pub fn is_sensitive(&self, key: &str) -> bool {
        self.patterns.is_match(key)
    }

    /// `value`, or the mask if `key` is sensitive
    pub fn redact(&self, key: &str, value: Option<String>) -> Option<String> {
        if self.is_sensitive(key) {
            Some(REDACTED_TEXT.to_string())
        } else {
            value
        }
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(SENSITIVE_CONFIG_KEYS_DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("db.password", true; "password suffix")]
    #[test_case("aws.secret", true; "secret suffix")]
    #[test_case("my.oauth.refresh.token", true; "oauth token")]
    #[test_case("strata.security.sensitive-config-keys", true; "the pattern key itself")]
    #[test_case("password.length", false; "not a suffix")]
    #[test_case("db.user", false; "plain key")]
    fn test_default_patterns(key: &str, sensitive: bool) {
        assert_eq!(Redactor::default().is_sensitive(key), sensitive);
    }

    #[test]
    fn test_invalid_pattern_skipped() {
        let redactor = Redactor::new("(, ^custom\\.");
        assert!(redactor.is_sensitive("custom.key"));
        assert!(!redactor.is_sensitive("other"));
    }

    #[test]
    fn test_store_override() {
        let store = PropertyStore::empty();
        store.set(SENSITIVE_CONFIG_KEYS, "^hide\\.").unwrap();
        let redactor = Redactor::from_store(&store).unwrap();
        assert_eq!(
            redactor.redact("hide.me", Some("v".to_string())).as_deref(),
            Some(REDACTED_TEXT)
        );
        assert_eq!(redactor.redact("db.password", Some("v".to_string())).as_deref(), Some("v"));
    }
}
