//! Environment-variable credential provider
//!
//! `db.password` is looked up as `<PREFIX>DB_PASSWORD`.

use super::traits::CredentialProvider;
use crate::config::{secret_string, SecretString};
use crate::domain::Result;

#[derive(Debug, Clone, Default)]
pub struct EnvCredentialProvider {
    prefix: String,
}

impl EnvCredentialProvider {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Environment variable consulted for `alias`
    pub fn variable_for(&self, alias: &str) -> String {
        let mangled: String = alias
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}{}", self.prefix, mangled)
    }
}

impl CredentialProvider for EnvCredentialProvider {
    fn describe(&self) -> String {
        format!("env://{}", self.prefix)
    }

    fn get_credential(&self, alias: &str) -> Result<Option<SecretString>> {
        Ok(std::env::var(self.variable_for(alias))
            .ok()
            .map(secret_string))
    }
}
