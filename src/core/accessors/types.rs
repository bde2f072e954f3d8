//! Type references resolved through a swappable capability
//!
//! A property may name a type, e.g. `app.codec = strata.codec.Gzip`. The store
//! does not know what those names mean; it asks its [`TypeResolver`]. The
//! default resolver is a [`TypeRegistry`] that applications fill with the
//! names they support.

use crate::core::store::PropertyStore;
use crate::domain::{Result, StrataError};
use parking_lot::RwLock;
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;

/// A resolved type reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    name: String,
    type_id: Option<TypeId>,
}

impl TypeRef {
    /// Reference to a type known only by name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_id: None,
        }
    }

    /// Reference to the Rust type `T`, registered under its type name
    pub fn of<T: 'static>() -> Self {
        Self {
            name: type_name::<T>().to_string(),
            type_id: Some(TypeId::of::<T>()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this reference denotes the Rust type `T`
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == Some(TypeId::of::<T>())
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Capability that turns type names into references
pub trait TypeResolver: Send + Sync + fmt::Debug {
    /// Resolves `name`, or `None` if it is unknown
    fn resolve(&self, name: &str) -> Option<TypeRef>;
}

/// Name-to-type table used as the default resolver
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: RwLock<HashMap<String, TypeRef>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-filled with the primitive and string types
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register_type::<bool>();
        registry.register_type::<i32>();
        registry.register_type::<i64>();
        registry.register_type::<u32>();
        registry.register_type::<u64>();
        registry.register_type::<f32>();
        registry.register_type::<f64>();
        let string = registry.register_type::<String>();
        registry.register("String", string);
        registry
    }

    /// Registers `T` under its full Rust type name
    pub fn register_type<T: 'static>(&self) -> TypeRef {
        let type_ref = TypeRef::of::<T>();
        self.register(type_ref.name().to_string(), type_ref.clone());
        type_ref
    }

    /// Registers `type_ref` under `name`
    pub fn register(&self, name: impl Into<String>, type_ref: TypeRef) {
        self.types.write().insert(name.into(), type_ref);
    }
}

impl TypeResolver for TypeRegistry {
    fn resolve(&self, name: &str) -> Option<TypeRef> {
        self.types.read().get(name).cloned()
    }
}

impl PropertyStore {
    /// Resolves `name` through the store's resolver
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::TypeNotFound`] for unknown names
    pub fn get_class_by_name(&self, name: &str) -> Result<TypeRef> {
        self.get_class_by_name_or_null(name)
            .ok_or_else(|| StrataError::TypeNotFound(format!("Class {name} not found")))
    }

    /// Resolves `name`, or `None` if unknown
    pub fn get_class_by_name_or_null(&self, name: &str) -> Option<TypeRef> {
        self.type_resolver().resolve(name.trim())
    }

    /// Type named by property `key`, or `default` when absent
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::TypeNotFound`] if the stored name is unknown
    pub fn get_class(&self, key: &str, default: Option<TypeRef>) -> Result<Option<TypeRef>> {
        match self.get_trimmed(key)? {
            Some(name) => self.get_class_by_name(&name).map(Some),
            None => Ok(default),
        }
    }

    /// Types named by the comma-separated property `key`
    ///
    /// Only an absent key yields `default`; an empty value yields no types.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::TypeNotFound`] if any name is unknown
    pub fn get_classes(&self, key: &str, default: &[TypeRef]) -> Result<Vec<TypeRef>> {
        if self.get_raw(key).is_none() {
            return Ok(default.to_vec());
        }
        self.get_trimmed_strings(key)?
            .iter()
            .map(|n| self.get_class_by_name(n))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Debug)]
    struct Fixed;

    impl TypeResolver for Fixed {
        fn resolve(&self, name: &str) -> Option<TypeRef> {
            (name == "only.this").then(|| TypeRef::named("only.this"))
        }
    }

    #[test]
    fn test_builtin_resolution() {
        let store = PropertyStore::empty();
        store.set("t", " i64 ").unwrap();
        let resolved = store.get_class("t", None).unwrap().unwrap();
        assert!(resolved.is::<i64>());
        assert!(store.get_class("missing", None).unwrap().is_none());
    }

    #[test]
    fn test_unknown_names() {
        let store = PropertyStore::empty();
        assert!(matches!(
            store.get_class_by_name("no.such.Type"),
            Err(StrataError::TypeNotFound(_))
        ));
        assert!(store.get_class_by_name_or_null("no.such.Type").is_none());
    }

    #[test]
    fn test_custom_resolver_is_copied_to_clones() {
        let store = PropertyStore::empty();
        store.set_type_resolver(Arc::new(Fixed));
        let copy = store.clone();
        assert!(copy.get_class_by_name("only.this").is_ok());
        assert!(copy.get_class_by_name("i32").is_err());
    }

    #[test]
    fn test_get_classes() {
        let store = PropertyStore::empty();
        store.set("list", "i32, String").unwrap();
        let types = store.get_classes("list", &[]).unwrap();
        assert_eq!(types.len(), 2);
        assert!(types[1].is::<String>());

        let defaults = store.get_classes("none", &[TypeRef::of::<bool>()]).unwrap();
        assert!(defaults[0].is::<bool>());
    }

    #[test]
    fn test_get_classes_empty_value() {
        let store = PropertyStore::empty();
        store.set("empty", "").unwrap();
        let types = store.get_classes("empty", &[TypeRef::of::<bool>()]).unwrap();
        assert!(types.is_empty());

        store.set("blank.items", " , ").unwrap();
        assert!(store.get_classes("blank.items", &[TypeRef::of::<bool>()]).unwrap().is_empty());
    }
}
