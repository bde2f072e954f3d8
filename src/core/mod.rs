//! Core engine for Strata.
//!
//! # Modules
//!
//! - [`loader`] - Reads XML property documents, including `xi:include` and entities
//! - [`substitution`] - `${name}` expansion with a depth bound
//! - [`store`] - The thread-safe layered [`PropertyStore`]
//! - [`accessors`] - Typed getters and setters on the store
//! - [`redaction`] - Masking of sensitive keys in dumps
//! - [`serialize`] - XML and JSON dumps of the resolved store
//! - [`deprecation`] - Deprecated key registry
//! - [`defaults`] - Default resource registry
//!
//! # Resolution Workflow
//!
//! 1. **Defaults**: Stores created with defaults load the registered default resources
//! 2. **Overlay**: Each `add_resource` merges a document, honoring final keys
//! 3. **Set**: Programmatic values shadow document values
//! 4. **Read**: Accessors resolve `${...}` references on every read
//! 5. **Dump** (optional): Serialize resolved values with secrets masked

pub mod accessors;
pub mod defaults;
pub mod deprecation;
pub mod loader;
pub mod redaction;
pub mod serialize;
pub mod store;
pub mod substitution;

pub use store::{OverlaySummary, PropertyStore};
