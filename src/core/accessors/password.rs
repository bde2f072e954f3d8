//! Password lookup through credential providers

use crate::adapters::credentials::create_credential_providers;
use crate::config::keys::{CREDENTIAL_CLEAR_TEXT_FALLBACK, CREDENTIAL_PROVIDER_PATH};
use crate::config::{secret_string, SecretString};
use crate::core::store::PropertyStore;
use crate::domain::Result;

impl PropertyStore {
    /// Secret stored for `name`
    ///
    /// Each provider listed under the credential provider path is asked for
    /// `name`, then its replacements, then its deprecated aliases. When no
    /// provider has it the resolved property value is returned, unless
    /// clear-text fallback is switched off.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Credential`](crate::domain::StrataError::Credential)
    /// if a provider cannot be created or read
    pub fn get_password(&self, name: &str) -> Result<Option<SecretString>> {
        let name = name.trim();
        let mut aliases = vec![name.to_string()];
        aliases.extend(self.deprecations.replacements(name).unwrap_or_default());
        aliases.extend(self.deprecations.deprecated_aliases(name));

        if let Some(path) = self.get_trimmed(CREDENTIAL_PROVIDER_PATH)? {
            for provider in create_credential_providers(&path)? {
                for alias in &aliases {
                    if let Some(secret) = provider.get_credential(alias)? {
                        tracing::debug!(
                            key = name,
                            provider = %provider.describe(),
                            "Password found in credential provider"
                        );
                        return Ok(Some(secret));
                    }
                }
            }
        }

        if !self.get_boolean(CREDENTIAL_CLEAR_TEXT_FALLBACK, true)? {
            return Ok(None);
        }
        Ok(self.get(name)?.map(secret_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_clear_text_fallback() {
        let store = PropertyStore::empty();
        store.set("db.password", "plain").unwrap();
        let secret = store.get_password("db.password").unwrap().unwrap();
        assert_eq!(secret.expose_secret(), "plain");

        store.set(CREDENTIAL_CLEAR_TEXT_FALLBACK, "false").unwrap();
        assert!(store.get_password("db.password").unwrap().is_none());
    }

    #[test]
    fn test_env_provider_wins() {
        std::env::set_var("PWTEST_DB_PASSWORD", "from-env");
        let store = PropertyStore::empty();
        store.set("db.password", "plain").unwrap();
        store.set(CREDENTIAL_PROVIDER_PATH, "env://PWTEST_").unwrap();
        let secret = store.get_password("db.password").unwrap().unwrap();
        assert_eq!(secret.expose_secret(), "from-env");
        std::env::remove_var("PWTEST_DB_PASSWORD");
    }

    #[test]
    fn test_bad_provider_path() {
        let store = PropertyStore::empty();
        store.set(CREDENTIAL_PROVIDER_PATH, "ldap://x").unwrap();
        assert!(store.get_password("p").is_err());
    }
}
