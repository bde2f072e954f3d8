//! External integrations
//!
//! - [`resource`] - search path, file and URL access for property documents
//! - [`http`] - blocking HTTP client for remote documents
//! - [`credentials`] - credential providers consulted for passwords

pub mod credentials;
pub mod http;
pub mod resource;
