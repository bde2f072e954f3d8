//! Merging parsed documents into a slot map
//!
//! Each incoming property is checked against finality under its map entry
//! lock, so concurrent loads and `set` calls never interleave a check with a
//! write for the same key.

use super::slot::{Slot, SlotValue};
use super::PropertyStore;
use crate::core::loader::{LoadedDocument, ParsedProperty};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Outcome of applying one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlaySummary {
    /// Provenance string of the document
    pub locator: String,
    /// Properties written
    pub applied: usize,
    /// Properties skipped because their key was already final
    pub ignored_final: usize,
    /// Keys whose skipped value differed from the final value (each warned once)
    pub final_conflicts: Vec<String>,
    /// The locator had already been applied; nothing was read
    pub duplicate: bool,
}

impl OverlaySummary {
    pub(crate) fn duplicate(locator: String) -> Self {
        Self {
            locator,
            duplicate: true,
            ..Self::default()
        }
    }
}

impl PropertyStore {
    /// Applies `doc` to `slots` in document order
    pub(crate) fn apply_document(
        &self,
        slots: &DashMap<String, Slot>,
        doc: &LoadedDocument,
    ) -> OverlaySummary {
        let mut summary = OverlaySummary {
            locator: doc.locator.clone(),
            ..OverlaySummary::default()
        };

        for prop in &doc.properties {
            for name in self.deprecations.resolve_names(&prop.name) {
                self.apply_property(slots, &name, prop, &doc.locator, &mut summary);
            }
        }

        summary
    }

    fn apply_property(
        &self,
        slots: &DashMap<String, Slot>,
        name: &str,
        prop: &ParsedProperty,
        locator: &str,
        summary: &mut OverlaySummary,
    ) {
        let incoming = match &prop.value {
            Some(v) => SlotValue::Text(v.clone()),
            None if self.allow_null_values() => SlotValue::Null,
            None => {
                // Dropped value; a declared final flag still sticks.
                if prop.is_final {
                    slots
                        .entry(name.to_string())
                        .or_insert_with(|| Slot::new(SlotValue::Absent, self.tick()))
                        .is_final = true;
                }
                return;
            }
        };

        match slots.entry(name.to_string()) {
            Entry::Occupied(mut entry) => {
                let slot = entry.get_mut();
                if slot.is_final {
                    summary.ignored_final += 1;
                    if slot.value != incoming {
                        tracing::warn!(
                            resource = %locator,
                            key = %name,
                            "{}:an attempt to override final parameter: {};  Ignoring.",
                            locator,
                            name
                        );
                        summary.final_conflicts.push(name.to_string());
                    }
                    return;
                }
                if slot.programmatic.is_some() {
                    // A standing `set` shadows document values.
                    slot.is_final = prop.is_final;
                    return;
                }
                slot.value = incoming;
                slot.sources = prop.sources.clone();
                slot.is_final = prop.is_final;
            }
            Entry::Vacant(entry) => {
                let mut slot = Slot::new(incoming, self.tick());
                slot.sources = prop.sources.clone();
                slot.is_final = prop.is_final;
                entry.insert(slot);
            }
        }
        summary.applied += 1;
    }
}
