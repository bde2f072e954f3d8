//! Credential provider factory
//!
//! Builds the provider chain from the comma-separated provider path
//! (`env://`, `env://PREFIX_`, `file:///etc/creds.json`).

use super::env::EnvCredentialProvider;
use super::file::FileCredentialProvider;
use super::traits::CredentialProvider;
use crate::domain::{Result, StrataError};
use std::sync::Arc;
use url::Url;

/// Create the credential providers named in `provider_path`
///
/// # Errors
///
/// Returns [`StrataError::Credential`] for unknown schemes or unreadable files
pub fn create_credential_providers(
    provider_path: &str,
) -> Result<Vec<Arc<dyn CredentialProvider>>> {
    let mut providers: Vec<Arc<dyn CredentialProvider>> = Vec::new();

    for entry in provider_path
        .split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
    {
        if let Some(prefix) = entry.strip_prefix("env://") {
            providers.push(Arc::new(EnvCredentialProvider::new(prefix)));
            continue;
        }

        let url = Url::parse(entry).map_err(|e| {
            StrataError::Credential(format!("invalid credential provider URI {entry}: {e}"))
        })?;
        match url.scheme() {
            "file" => {
                let path = url.to_file_path().map_err(|_| {
                    StrataError::Credential(format!("not a local file URI: {entry}"))
                })?;
                providers.push(Arc::new(FileCredentialProvider::open(path)?));
            }
            other => {
                return Err(StrataError::Credential(format!(
                    "unsupported credential provider scheme '{other}' in {entry}"
                )));
            }
        }
    }

    Ok(providers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_path() {
        assert!(create_credential_providers(" , ").unwrap().is_empty());
    }

    #[test]
    fn test_env_provider() {
        let providers = create_credential_providers("env://APP_").unwrap();
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].describe(), "env://APP_");
    }

    #[test]
    fn test_unknown_scheme() {
        let err = create_credential_providers("jceks://file/tmp/x.jceks").unwrap_err();
        assert!(err.to_string().contains("jceks"));
    }
}
