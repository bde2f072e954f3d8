//! Dumping the resolved store
//!
//! Both formats emit substituted values with sensitive keys masked. A key
//! argument narrows the dump to one property; `None` or an empty key dumps
//! everything in insertion order.

pub mod json;
pub mod xml;

use crate::core::redaction::Redactor;
use crate::core::store::PropertyStore;
use crate::domain::{Property, Result, StrataError};

/// One property as it appears in a dump
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DumpEntry {
    pub name: String,
    pub value: Option<String>,
    pub is_final: bool,
    pub sources: Vec<String>,
}

/// Resolved, redacted entries for `key` (or all keys)
pub(crate) fn collect_entries(store: &PropertyStore, key: Option<&str>) -> Result<Vec<DumpEntry>> {
    let redactor = Redactor::from_store(store)?;
    let properties: Vec<Property> = match key.map(str::trim).filter(|k| !k.is_empty()) {
        Some(k) => {
            let property = store
                .get_property(k)
                .ok_or_else(|| StrataError::NotFound(k.to_string()))?;
            vec![property]
        }
        None => store.properties(),
    };

    properties
        .into_iter()
        .map(|p| {
            let value = match &p.value {
                Some(raw) => Some(store.substitute(&p.name, raw)?),
                None => None,
            };
            Ok(DumpEntry {
                value: redactor.redact(&p.name, value),
                name: p.name,
                is_final: p.is_final,
                sources: p.sources,
            })
        })
        .collect()
}
