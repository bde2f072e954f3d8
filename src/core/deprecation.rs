//! Deprecated key registry
//!
//! A deprecated key is an alias for one or more replacement keys. Stores
//! redirect reads and writes of a deprecated key to its replacements and log a
//! warning the first time each deprecated key is used.
//!
//! Registries are ordinary values injected into stores. A process-wide
//! instance is created on first use by [`DeprecationRegistry::global`];
//! tests call [`DeprecationRegistry::reset`] or inject their own registry.
//!
//! # Example
//!
//! ```rust
//! use strata::core::deprecation::DeprecationRegistry;
//!
//! let registry = DeprecationRegistry::new();
//! registry.add_deprecation("old.key", &["new.key"], None);
//!
//! assert!(registry.is_deprecated("old.key"));
//! assert_eq!(registry.resolve_names("old.key"), vec!["new.key".to_string()]);
//! assert_eq!(registry.deprecated_aliases("new.key"), vec!["old.key".to_string()]);
//! ```

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

static GLOBAL: Lazy<Arc<DeprecationRegistry>> = Lazy::new(|| Arc::new(DeprecationRegistry::new()));

/// Replacement information for one deprecated key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecatedKey {
    /// Keys that replace the deprecated one
    pub new_keys: Vec<String>,
    /// Message logged instead of the generated one
    pub custom_message: Option<String>,
}

impl DeprecatedKey {
    /// Warning text for `key`
    pub fn warning_message(&self, key: &str) -> String {
        match &self.custom_message {
            Some(msg) => msg.clone(),
            None => format!(
                "{key} is deprecated. Instead, use {}",
                self.new_keys.join(", ")
            ),
        }
    }
}

#[derive(Debug, Default)]
struct Entries {
    deprecated: HashMap<String, DeprecatedKey>,
    reverse: HashMap<String, Vec<String>>,
    warned: HashSet<String>,
}

/// Registry of deprecated keys
#[derive(Debug, Default)]
pub struct DeprecationRegistry {
    entries: RwLock<Entries>,
}

impl DeprecationRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry, created on first use
    pub fn global() -> Arc<DeprecationRegistry> {
        Arc::clone(&GLOBAL)
    }

    /// Registers `key` as deprecated in favor of `new_keys`
    ///
    /// Re-registering a key replaces its entry.
    pub fn add_deprecation(&self, key: &str, new_keys: &[&str], custom_message: Option<&str>) {
        let key = key.trim().to_string();
        let new_keys: Vec<String> = new_keys.iter().map(|k| k.trim().to_string()).collect();

        let mut entries = self.entries.write();
        if let Some(previous) = entries.deprecated.get(&key).cloned() {
            for new_key in &previous.new_keys {
                if let Some(olds) = entries.reverse.get_mut(new_key) {
                    olds.retain(|old| old != &key);
                }
            }
        }
        for new_key in &new_keys {
            let olds = entries.reverse.entry(new_key.clone()).or_default();
            if !olds.contains(&key) {
                olds.push(key.clone());
            }
        }
        entries.deprecated.insert(
            key,
            DeprecatedKey {
                new_keys,
                custom_message: custom_message.map(str::to_string),
            },
        );
    }

    /// Whether `key` is registered as deprecated
    pub fn is_deprecated(&self, key: &str) -> bool {
        self.entries.read().deprecated.contains_key(key)
    }

    /// Replacement keys for a deprecated key
    pub fn replacements(&self, key: &str) -> Option<Vec<String>> {
        self.entries
            .read()
            .deprecated
            .get(key)
            .map(|d| d.new_keys.clone())
    }

    /// Deprecated keys that map onto `new_key`
    pub fn deprecated_aliases(&self, new_key: &str) -> Vec<String> {
        self.entries
            .read()
            .reverse
            .get(new_key)
            .cloned()
            .unwrap_or_default()
    }

    /// Keys that a read or write of `key` actually touches
    ///
    /// A deprecated key resolves to its replacements (warning once); any
    /// other key resolves to itself.
    pub fn resolve_names(&self, key: &str) -> Vec<String> {
        let entry = self.entries.read().deprecated.get(key).cloned();
        match entry {
            Some(deprecated) if !deprecated.new_keys.is_empty() => {
                self.warn_once(key, &deprecated);
                deprecated.new_keys
            }
            _ => vec![key.to_string()],
        }
    }

    fn warn_once(&self, key: &str, deprecated: &DeprecatedKey) {
        let first = self.entries.write().warned.insert(key.to_string());
        if first {
            tracing::warn!(
                target: "strata::deprecation",
                key,
                "{}",
                deprecated.warning_message(key)
            );
        }
    }

    /// Number of deprecated keys
    pub fn len(&self) -> usize {
        self.entries.read().deprecated.len()
    }

    /// Whether no keys are deprecated
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets every registration and warning
    pub fn reset(&self) {
        *self.entries.write() = Entries::default();
    }
}
