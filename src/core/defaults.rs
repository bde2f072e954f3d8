//! Default resource registry
//!
//! Names of the resources every store created with defaults loads first, in
//! order. The process-wide instance starts with `strata-default.xml` and
//! `strata-site.xml`; missing defaults are skipped silently.

use crate::config::keys::{DEFAULT_RESOURCE, SITE_RESOURCE};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;

static GLOBAL: Lazy<Arc<DefaultResources>> = Lazy::new(|| Arc::new(DefaultResources::default()));

/// Ordered list of default resource names
#[derive(Debug)]
pub struct DefaultResources {
    names: RwLock<Vec<String>>,
}

impl Default for DefaultResources {
    fn default() -> Self {
        Self {
            names: RwLock::new(Self::builtin()),
        }
    }
}

impl DefaultResources {
    fn builtin() -> Vec<String> {
        vec![DEFAULT_RESOURCE.to_string(), SITE_RESOURCE.to_string()]
    }

    /// A registry with no default resources
    pub fn empty() -> Self {
        Self {
            names: RwLock::new(Vec::new()),
        }
    }

    /// The process-wide registry, created on first use
    pub fn global() -> Arc<DefaultResources> {
        Arc::clone(&GLOBAL)
    }

    /// Appends a default resource; duplicates are ignored
    pub fn add(&self, name: &str) {
        let mut names = self.names.write();
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }

    /// Snapshot of the registered names
    pub fn names(&self) -> Vec<String> {
        self.names.read().clone()
    }

    /// Restores the built-in defaults
    pub fn reset(&self) {
        *self.names.write() = Self::builtin();
    }
}
