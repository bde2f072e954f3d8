//! Regular expression accessor

use crate::core::store::PropertyStore;
use crate::domain::Result;
use regex::Regex;

impl PropertyStore {
    /// Compiled pattern stored under `name`
    ///
    /// An absent or empty value yields `default`, and so does a value that
    /// fails to compile (a warning is logged).
    ///
    /// # Errors
    ///
    /// Only substitution errors are returned
    pub fn get_pattern(&self, name: &str, default: Option<Regex>) -> Result<Option<Regex>> {
        let text = match self.get(name)? {
            Some(t) if !t.is_empty() => t,
            _ => return Ok(default),
        };
        match Regex::new(&text) {
            Ok(re) => Ok(Some(re)),
            Err(e) => {
                tracing::warn!(key = name, pattern = %text, error = %e, "Regular expression is malformed");
                Ok(default)
            }
        }
    }

    /// Stores the source text of `pattern`
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidArgument`](crate::domain::StrataError::InvalidArgument)
    /// for a blank name
    pub fn set_pattern(&self, name: &str, pattern: &Regex) -> Result<()> {
        self.set(name, pattern.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_or_default() {
        let store = PropertyStore::empty();
        assert!(store.get_pattern("p", None).unwrap().is_none());

        store.set("p", "[").unwrap();
        let fallback = Regex::new("x").unwrap();
        assert_eq!(
            store.get_pattern("p", Some(fallback)).unwrap().unwrap().as_str(),
            "x"
        );

        store.set_pattern("p", &Regex::new(r"\d+").unwrap()).unwrap();
        assert!(store.get_pattern("p", None).unwrap().unwrap().is_match("42"));
    }
}
