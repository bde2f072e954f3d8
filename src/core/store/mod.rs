//! The property store
//!
//! [`PropertyStore`] holds the merged view of every document and `set` call.
//! It is `Send + Sync`: all methods take `&self`, per-key state lives in a
//! sharded [`DashMap`], and no lock is held while documents are read.
//!
//! # Example
//!
//! ```rust,no_run
//! use strata::core::store::PropertyStore;
//! use strata::domain::Resource;
//!
//! # fn example() -> strata::domain::Result<()> {
//! let store = PropertyStore::empty();
//! store.add_resource(Resource::path("conf/core.xml"))?;
//! store.add_resource(Resource::path("conf/site.xml"))?;
//! store.set("app.name", "demo")?;
//!
//! let port = store.get_int("app.port", 8080)?;
//! let url = store.get("app.url")?; // ${...} references resolved on read
//! println!("{store} -> {url:?} on {port}");
//! # Ok(())
//! # }
//! ```

pub mod overlay;
pub(crate) mod slot;

pub use overlay::OverlaySummary;

use crate::config::keys::ENV_LOOKUP_PREFIX;
use crate::config::StoreOptions;
use crate::core::accessors::types::{TypeRegistry, TypeResolver};
use crate::core::defaults::DefaultResources;
use crate::core::deprecation::DeprecationRegistry;
use crate::core::loader::DocumentLoader;
use crate::core::substitution;
use crate::domain::{normalize_name, Property, Resource, ResourceRef, Result, StrataError, PROGRAMMATIC_SOURCE};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use regex::Regex;
use slot::{Slot, SlotValue};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Thread-safe layered property store
pub struct PropertyStore {
    pub(crate) slots: DashMap<String, Slot>,
    resources: RwLock<Vec<ResourceRef>>,
    applied: RwLock<HashSet<String>>,
    // Shared by programmatic writes; `reload` holds it exclusively while it
    // snapshots those writes and swaps the rebuilt view in.
    write_gate: RwLock<()>,
    next_order: AtomicU64,
    allow_null: AtomicBool,
    options: StoreOptions,
    loader: Arc<DocumentLoader>,
    type_resolver: RwLock<Arc<dyn TypeResolver>>,
    pub(crate) deprecations: Arc<DeprecationRegistry>,
    defaults: Arc<DefaultResources>,
}

impl PropertyStore {
    /// A store with no resources, using the global registries
    pub fn empty() -> Self {
        Self::build(
            StoreOptions::without_defaults(),
            DeprecationRegistry::global(),
            DefaultResources::global(),
        )
    }

    /// A store pre-loaded with the global default resources
    ///
    /// # Errors
    ///
    /// Returns an error if a default resource exists but cannot be parsed
    pub fn new() -> Result<Self> {
        Self::with_options(StoreOptions::default())
    }

    /// A store configured by `options`, using the global registries
    ///
    /// # Errors
    ///
    /// Returns an error if the options are invalid or a default resource
    /// cannot be parsed
    pub fn with_options(options: StoreOptions) -> Result<Self> {
        Self::with_registries(
            options,
            DeprecationRegistry::global(),
            DefaultResources::global(),
        )
    }

    /// A store using `deprecations` instead of the global registry
    ///
    /// # Errors
    ///
    /// Returns an error if the options are invalid or a default resource
    /// cannot be parsed
    pub fn with_deprecations(
        options: StoreOptions,
        deprecations: Arc<DeprecationRegistry>,
    ) -> Result<Self> {
        Self::with_registries(options, deprecations, DefaultResources::global())
    }

    /// A store with injected registries
    ///
    /// # Errors
    ///
    /// Returns an error if the options are invalid or a default resource
    /// cannot be parsed
    pub fn with_registries(
        options: StoreOptions,
        deprecations: Arc<DeprecationRegistry>,
        defaults: Arc<DefaultResources>,
    ) -> Result<Self> {
        options
            .validate()
            .map_err(|e| StrataError::Configuration(format!("invalid store options: {e}")))?;

        let load_defaults = options.load_defaults;
        let store = Self::build(options, deprecations, defaults);
        if load_defaults {
            for name in store.defaults.names() {
                store.load_default(&name)?;
            }
        }
        Ok(store)
    }

    fn build(
        options: StoreOptions,
        deprecations: Arc<DeprecationRegistry>,
        defaults: Arc<DefaultResources>,
    ) -> Self {
        Self {
            slots: DashMap::new(),
            resources: RwLock::new(Vec::new()),
            applied: RwLock::new(HashSet::new()),
            write_gate: RwLock::new(()),
            next_order: AtomicU64::new(0),
            allow_null: AtomicBool::new(options.allow_null_values),
            loader: Arc::new(DocumentLoader::from_options(&options)),
            type_resolver: RwLock::new(Arc::new(TypeRegistry::with_builtins())),
            options,
            deprecations,
            defaults,
        }
    }

    pub(crate) fn tick(&self) -> u64 {
        self.next_order.fetch_add(1, Ordering::Relaxed)
    }

    // Resources ----------------------------------------------------------

    /// Loads a document and merges it on top of the current state
    ///
    /// A locator that was already applied to this store (or the store it was
    /// cloned from) is skipped; streams are always read.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be opened or parsed. Nothing
    /// from a failing document is merged.
    pub fn add_resource(&self, resource: impl Into<Resource>) -> Result<OverlaySummary> {
        let resource = resource.into();
        let reference = resource.reference();
        let locator = reference.locator();

        if let Some(loc) = &locator {
            if self.applied.read().contains(loc) {
                tracing::debug!(resource = %loc, "Resource already applied, skipping");
                return Ok(OverlaySummary::duplicate(loc.clone()));
            }
        }

        let doc = self.loader.load(resource)?.ok_or_else(|| {
            StrataError::ResourceUnavailable(format!("{reference} not found on search path"))
        })?;

        if let Some(loc) = locator {
            if !self.applied.write().insert(loc.clone()) {
                return Ok(OverlaySummary::duplicate(loc));
            }
        }
        self.resources.write().push(reference);

        let summary = self.apply_document(&self.slots, &doc);
        tracing::debug!(
            resource = %summary.locator,
            applied = summary.applied,
            ignored_final = summary.ignored_final,
            "Applied property document"
        );
        Ok(summary)
    }

    fn load_default(&self, name: &str) -> Result<()> {
        let reference = ResourceRef::Named(name.to_string());
        self.resources.write().push(reference.clone());
        self.applied.write().insert(name.to_string());

        match self.loader.load(Resource::Named(name.to_string()))? {
            Some(doc) => {
                self.apply_document(&self.slots, &doc);
            }
            None => tracing::debug!(resource = name, "Default resource not found, skipping"),
        }
        Ok(())
    }

    /// Registered resources in load order
    pub fn resources(&self) -> Vec<ResourceRef> {
        self.resources.read().clone()
    }

    /// Re-reads every registered resource and replays `set` values
    ///
    /// Streams cannot be re-read and are dropped from the rebuilt view.
    /// Programmatic values are replayed in their original order on top of
    /// the documents, regardless of finality.
    ///
    /// # Errors
    ///
    /// Returns an error if a resource fails to load; the store is unchanged
    pub fn reload(&self) -> Result<()> {
        let references = self.resources();
        let fresh: DashMap<String, Slot> = DashMap::new();

        for reference in &references {
            let Some(resource) = reference.reopen() else {
                tracing::debug!(resource = %reference, "Stream resources are not reloaded");
                continue;
            };
            match self.loader.load(resource)? {
                Some(doc) => {
                    self.apply_document(&fresh, &doc);
                }
                None => tracing::debug!(resource = %reference, "Resource vanished, skipping"),
            }
        }

        let _gate = self.write_gate.write();
        let mut overlay: Vec<(String, Slot)> = self
            .slots
            .iter()
            .filter(|e| e.value().programmatic.is_some())
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        overlay.sort_by_key(|(_, slot)| slot.programmatic);

        for (name, set_slot) in overlay {
            match fresh.entry(name) {
                Entry::Occupied(mut entry) => {
                    let slot = entry.get_mut();
                    slot.value = set_slot.value;
                    slot.sources = set_slot.sources;
                    slot.programmatic = set_slot.programmatic;
                }
                Entry::Vacant(entry) => {
                    let mut slot = Slot::new(set_slot.value, self.tick());
                    slot.sources = set_slot.sources;
                    slot.programmatic = set_slot.programmatic;
                    entry.insert(slot);
                }
            }
        }

        self.slots.retain(|k, _| fresh.contains_key(k));
        for (name, mut slot) in fresh {
            // Surviving keys keep their original position.
            if let Some(order) = self.slots.get(&name).map(|s| s.order) {
                slot.order = order;
            }
            self.slots.insert(name, slot);
        }

        tracing::info!(resources = references.len(), "Reloaded property store");
        Ok(())
    }

    /// Removes every property and final marker
    ///
    /// Locator history is kept: previously applied resources stay registered
    /// and are not re-applied by `add_resource`.
    pub fn clear(&self) {
        self.slots.clear();
    }

    // Writes -------------------------------------------------------------

    /// Sets a property programmatically
    ///
    /// A final key is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidArgument`] for a blank name
    pub fn set(&self, name: &str, value: impl AsRef<str>) -> Result<()> {
        self.set_nullable(name, Some(value.as_ref()))
    }

    /// Sets a property to a value or to an explicit null
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidArgument`] for a blank name, or for a
    /// null value while allow-null mode is off
    pub fn set_nullable(&self, name: &str, value: Option<&str>) -> Result<()> {
        let name = normalize_name(name)?;
        if value.is_none() && !self.allow_null_values() {
            return Err(StrataError::InvalidArgument(format!(
                "The value of property {name} must not be null"
            )));
        }

        let _gate = self.write_gate.read();
        for target in self.deprecations.resolve_names(name) {
            let mut sources = vec![PROGRAMMATIC_SOURCE.to_string()];
            if target != name {
                sources.push(format!("because {name} is deprecated"));
            }
            self.write_programmatic(&target, SlotValue::from_option(value), sources);
        }
        Ok(())
    }

    fn write_programmatic(&self, name: &str, value: SlotValue, sources: Vec<String>) {
        let seq = self.tick();
        match self.slots.entry(name.to_string()) {
            Entry::Occupied(mut entry) => {
                let slot = entry.get_mut();
                if slot.is_final {
                    tracing::debug!(key = name, "Ignoring set of final parameter");
                    return;
                }
                slot.value = value;
                slot.sources = sources;
                slot.programmatic = Some(seq);
            }
            Entry::Vacant(entry) => {
                let mut slot = Slot::new(value, seq);
                slot.sources = sources;
                slot.programmatic = Some(seq);
                entry.insert(slot);
            }
        }
    }

    /// Sets a property only if it has no value yet
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidArgument`] for a blank name
    pub fn set_if_unset(&self, name: &str, value: impl AsRef<str>) -> Result<()> {
        if self.get_raw(name).is_none() {
            self.set(name, value)?;
        }
        Ok(())
    }

    /// Removes a property; final properties are kept
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidArgument`] for a blank name
    pub fn unset(&self, name: &str) -> Result<()> {
        let name = normalize_name(name)?;
        let mut targets = self.deprecations.resolve_names(name);
        targets.extend(self.deprecations.deprecated_aliases(name));
        let _gate = self.write_gate.read();
        for target in targets {
            self.slots.remove_if(&target, |_, slot| !slot.is_final);
        }
        Ok(())
    }

    /// Whether empty and null values are kept
    pub fn allow_null_values(&self) -> bool {
        self.allow_null.load(Ordering::Relaxed)
    }

    /// Toggles allow-null mode for subsequent loads and writes
    pub fn set_allow_null_values(&self, allow: bool) {
        self.allow_null.store(allow, Ordering::Relaxed);
    }

    // Reads --------------------------------------------------------------

    /// Raw text of `name` without substitution
    pub fn get_raw(&self, name: &str) -> Option<String> {
        let name = name.trim();
        self.deprecations
            .resolve_names(name)
            .iter()
            .filter_map(|n| self.raw_text(n))
            .last()
    }

    fn raw_text(&self, name: &str) -> Option<String> {
        self.slots
            .get(name)
            .and_then(|slot| slot.value.as_text().map(str::to_string))
    }

    /// Value of `name` with `${...}` references resolved
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Substitution`] if references nest too deeply
    pub fn get(&self, name: &str) -> Result<Option<String>> {
        let name = name.trim();
        let mut result = None;
        for target in self.deprecations.resolve_names(name) {
            if let Some(raw) = self.raw_text(&target) {
                result = Some(self.substitute(&target, &raw)?);
            }
        }
        Ok(result)
    }

    /// Resolved value of `name`, or `default` when absent
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Substitution`] if references nest too deeply
    pub fn get_or(&self, name: &str, default: &str) -> Result<String> {
        Ok(self.get(name)?.unwrap_or_else(|| default.to_string()))
    }

    /// Resolved value with surrounding whitespace removed
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Substitution`] if references nest too deeply
    pub fn get_trimmed(&self, name: &str) -> Result<Option<String>> {
        Ok(self.get(name)?.map(|v| v.trim().to_string()))
    }

    /// Trimmed value of `name`, or `default` when absent
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Substitution`] if references nest too deeply
    pub fn get_trimmed_or(&self, name: &str, default: &str) -> Result<String> {
        Ok(self
            .get_trimmed(name)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Expands `raw` as if it were the value of `key`
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Substitution`] if references nest too deeply
    pub fn substitute(&self, key: &str, raw: &str) -> Result<String> {
        let lookup = |ident: &str| self.lookup_variable(ident);
        substitution::resolve(raw, &lookup, self.options.max_substitution_depth).map_err(|e| {
            StrataError::Substitution {
                key: key.to_string(),
                depth: e.depth,
                expression: e.expression,
            }
        })
    }

    fn lookup_variable(&self, ident: &str) -> Option<String> {
        if let Some(var) = ident.strip_prefix(ENV_LOOKUP_PREFIX) {
            return std::env::var(var).ok();
        }
        self.get_raw(ident).or_else(|| std::env::var(ident).ok())
    }

    /// Snapshot of one property
    pub fn get_property(&self, name: &str) -> Option<Property> {
        let name = name.trim();
        self.slots
            .get(name)
            .filter(|slot| slot.value.is_present())
            .map(|slot| slot.to_property(name))
    }

    /// Provenance of `name`, oldest first; `None` when the key has no value
    pub fn get_property_sources(&self, name: &str) -> Option<Vec<String>> {
        self.get_property(name).map(|p| p.sources)
    }

    /// All properties in insertion order
    pub fn properties(&self) -> Vec<Property> {
        let mut entries: Vec<(u64, Property)> = self
            .slots
            .iter()
            .filter(|e| e.value().value.is_present())
            .map(|e| (e.value().order, e.value().to_property(e.key())))
            .collect();
        entries.sort_by_key(|(order, _)| *order);
        entries.into_iter().map(|(_, p)| p).collect()
    }

    /// Raw `(name, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (String, String)> {
        self.properties()
            .into_iter()
            .filter_map(|p| p.value.map(|v| (p.name, v)))
    }

    /// Number of keys holding a value
    pub fn size(&self) -> usize {
        self.slots
            .iter()
            .filter(|e| e.value().value.is_present())
            .count()
    }

    /// Whether no key holds a value
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Snapshot of the final key names
    pub fn final_parameters(&self) -> HashSet<String> {
        self.slots
            .iter()
            .filter(|e| e.value().is_final)
            .map(|e| e.key().clone())
            .collect()
    }

    /// Whether `name` is final
    pub fn is_final(&self, name: &str) -> bool {
        self.slots
            .get(name.trim())
            .is_some_and(|slot| slot.is_final)
    }

    /// Resolved values of all keys matching `pattern` (regex search)
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidArgument`] for an invalid pattern, or a
    /// substitution error
    pub fn get_val_by_regex(&self, pattern: &str) -> Result<HashMap<String, String>> {
        let re = Regex::new(pattern).map_err(|e| {
            StrataError::InvalidArgument(format!("invalid key pattern {pattern}: {e}"))
        })?;
        let mut out = HashMap::new();
        for (name, raw) in self.iter().filter(|(name, _)| re.is_match(name)) {
            let value = self.substitute(&name, &raw)?;
            out.insert(name, value);
        }
        Ok(out)
    }

    /// Resolved values of all keys starting with `prefix`, keyed by the remainder
    ///
    /// # Errors
    ///
    /// Returns a substitution error
    pub fn get_props_with_prefix(&self, prefix: &str) -> Result<HashMap<String, String>> {
        let mut out = HashMap::new();
        for (name, raw) in self.iter() {
            if let Some(rest) = name.strip_prefix(prefix) {
                let value = self.substitute(&name, &raw)?;
                out.insert(rest.to_string(), value);
            }
        }
        Ok(out)
    }

    // Capabilities -------------------------------------------------------

    /// The resolver used for type references
    pub fn type_resolver(&self) -> Arc<dyn TypeResolver> {
        Arc::clone(&self.type_resolver.read())
    }

    /// Replaces the resolver used for type references
    pub fn set_type_resolver(&self, resolver: Arc<dyn TypeResolver>) {
        *self.type_resolver.write() = resolver;
    }

    /// The deprecation registry this store consults
    pub fn deprecations(&self) -> Arc<DeprecationRegistry> {
        Arc::clone(&self.deprecations)
    }

    /// Options the store was created with
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }
}

impl Clone for PropertyStore {
    /// Snapshot copy: later changes to either store are not visible in the other
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            resources: RwLock::new(self.resources.read().clone()),
            applied: RwLock::new(self.applied.read().clone()),
            write_gate: RwLock::new(()),
            next_order: AtomicU64::new(self.next_order.load(Ordering::Relaxed)),
            allow_null: AtomicBool::new(self.allow_null_values()),
            options: self.options.clone(),
            loader: Arc::clone(&self.loader),
            type_resolver: RwLock::new(self.type_resolver()),
            deprecations: Arc::clone(&self.deprecations),
            defaults: Arc::clone(&self.defaults),
        }
    }
}

impl fmt::Display for PropertyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let resources: Vec<String> = self.resources.read().iter().map(|r| r.to_string()).collect();
        write!(f, "Configuration: {}", resources.join(", "))
    }
}

impl fmt::Debug for PropertyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyStore")
            .field("resources", &*self.resources.read())
            .field("size", &self.size())
            .field("allow_null", &self.allow_null_values())
            .finish()
    }
}
