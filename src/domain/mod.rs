//! Domain models and types for Strata.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Property snapshots** ([`Property`])
//! - **Resource references** ([`Resource`], [`ResourceRef`])
//! - **Error types** ([`StrataError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, StrataError>`]:
//!
//! ```rust
//! use strata::domain::{StrataError, Result};
//!
//! fn require(value: Option<&str>) -> Result<&str> {
//!     value.ok_or_else(|| StrataError::NotFound("my.key".to_string()))
//! }
//! ```

pub mod errors;
pub mod property;
pub mod resource;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::StrataError;
pub use property::{normalize_name, Property, PROGRAMMATIC_SOURCE};
pub use resource::{Resource, ResourceRef, StreamResource};
pub use result::Result;
