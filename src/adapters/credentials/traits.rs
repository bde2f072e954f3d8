//! Credential provider abstraction
//!
//! Providers are consulted in order by `PropertyStore::get_password`. A real
//! keystore is plugged in by implementing [`CredentialProvider`]; the crate
//! ships environment and file providers.

use crate::config::SecretString;
use crate::domain::Result;
use std::fmt;

/// Source of secret values keyed by property name
pub trait CredentialProvider: Send + Sync + fmt::Debug {
    /// Short description used in logs
    fn describe(&self) -> String;

    /// Looks up the secret stored under `alias`
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read
    fn get_credential(&self, alias: &str) -> Result<Option<SecretString>>;
}
