//! Comma-separated string lists

use crate::core::store::PropertyStore;
use crate::domain::Result;

fn split_untrimmed(text: &str) -> Vec<String> {
    text.split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_trimmed(text: &str) -> Vec<String> {
    text.split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl PropertyStore {
    /// Comma-separated values of `name`, untrimmed; `None` if absent or empty
    ///
    /// # Errors
    ///
    /// Returns a substitution error
    pub fn get_strings(&self, name: &str) -> Result<Option<Vec<String>>> {
        Ok(self
            .get(name)?
            .map(|v| split_untrimmed(&v))
            .filter(|parts| !parts.is_empty()))
    }

    /// Like [`get_strings`](Self::get_strings), with `default` for absent keys
    ///
    /// # Errors
    ///
    /// Returns a substitution error
    pub fn get_strings_or(&self, name: &str, default: &[&str]) -> Result<Vec<String>> {
        Ok(self
            .get_strings(name)?
            .unwrap_or_else(|| default.iter().map(|s| s.to_string()).collect()))
    }

    /// Values split on commas and newlines, each trimmed, empties dropped
    ///
    /// # Errors
    ///
    /// Returns a substitution error
    pub fn get_trimmed_strings(&self, name: &str) -> Result<Vec<String>> {
        Ok(self
            .get(name)?
            .map(|v| split_trimmed(&v))
            .unwrap_or_default())
    }

    /// Untrimmed values as a collection; empty if absent
    ///
    /// # Errors
    ///
    /// Returns a substitution error
    pub fn get_string_collection(&self, name: &str) -> Result<Vec<String>> {
        Ok(self.get_strings(name)?.unwrap_or_default())
    }

    /// Trimmed values with duplicates removed, first occurrence kept
    ///
    /// # Errors
    ///
    /// Returns a substitution error
    pub fn get_trimmed_string_collection(&self, name: &str) -> Result<Vec<String>> {
        let mut seen = std::collections::HashSet::new();
        Ok(self
            .get_trimmed_strings(name)?
            .into_iter()
            .filter(|s| seen.insert(s.clone()))
            .collect())
    }

    /// Stores `values` joined with commas
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidArgument`](crate::domain::StrataError::InvalidArgument)
    /// for a blank name
    pub fn set_strings(&self, name: &str, values: &[&str]) -> Result<()> {
        self.set(name, values.join(","))
    }
}
