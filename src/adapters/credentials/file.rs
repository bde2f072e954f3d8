//! File-backed credential provider
//!
//! The file is a flat JSON object or, with a `.toml` extension, a flat TOML
//! table mapping aliases to secrets.

use super::traits::CredentialProvider;
use crate::config::{SecretString, SecretValue};
use crate::domain::{Result, StrataError};
use secrecy::Secret;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct FileCredentialProvider {
    path: PathBuf,
    entries: HashMap<String, SecretValue>,
}

impl FileCredentialProvider {
    /// Reads the credential file
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Credential`] if the file is missing or malformed
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            StrataError::Credential(format!(
                "failed to read credential file {}: {}",
                path.display(),
                e
            ))
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let entries: HashMap<String, SecretValue> = if is_toml {
            toml::from_str(&contents).map_err(|e| {
                StrataError::Credential(format!("invalid credential file {}: {e}", path.display()))
            })?
        } else {
            serde_json::from_str(&contents).map_err(|e| {
                StrataError::Credential(format!("invalid credential file {}: {e}", path.display()))
            })?
        };

        tracing::debug!(path = %path.display(), count = entries.len(), "Loaded credential file");

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }
}

impl CredentialProvider for FileCredentialProvider {
    fn describe(&self) -> String {
        format!("file://{}", self.path.display())
    }

    fn get_credential(&self, alias: &str) -> Result<Option<SecretString>> {
        Ok(self.entries.get(alias).cloned().map(Secret::new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_json_file() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{"db.password": "from-json"}"#).unwrap();

        let provider = FileCredentialProvider::open(file.path()).unwrap();
        let secret = provider.get_credential("db.password").unwrap().unwrap();
        assert_eq!(secret.expose_secret(), "from-json");
        assert!(provider.get_credential("missing").unwrap().is_none());
    }

    #[test]
    fn test_toml_file() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(b"\"db.password\" = \"from-toml\"\n").unwrap();

        let provider = FileCredentialProvider::open(file.path()).unwrap();
        let secret = provider.get_credential("db.password").unwrap().unwrap();
        assert_eq!(secret.expose_secret(), "from-toml");
    }

    #[test]
    fn test_missing_file() {
        let err = FileCredentialProvider::open("/nonexistent/creds.json").unwrap_err();
        assert!(matches!(err, StrataError::Credential(_)));
    }
}
