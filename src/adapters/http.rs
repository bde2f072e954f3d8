//! Blocking HTTP client for remote property documents
//!
//! The underlying `reqwest` client is built lazily on first use, so stores
//! that only read local files never pay for TLS setup.

use crate::domain::{Result, StrataError};
use once_cell::sync::OnceCell;
use std::time::Duration;
use url::Url;

/// Fetches documents over HTTP(S)
#[derive(Debug)]
pub struct HttpFetcher {
    timeout: Duration,
    client: OnceCell<reqwest::blocking::Client>,
}

impl HttpFetcher {
    /// Creates a fetcher with the given request timeout
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            client: OnceCell::new(),
        }
    }

    fn client(&self) -> Result<&reqwest::blocking::Client> {
        self.client.get_or_try_init(|| {
            reqwest::blocking::Client::builder()
                .timeout(self.timeout)
                .user_agent(concat!("strata/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|e| {
                    StrataError::ResourceUnavailable(format!("failed to build HTTP client: {e}"))
                })
        })
    }

    /// Downloads the body at `url`
    ///
    /// Returns `Ok(None)` for a 404 so callers can treat it as "not found".
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::ResourceUnavailable`] on connection failures and
    /// non-success statuses other than 404
    pub fn fetch(&self, url: &Url) -> Result<Option<Vec<u8>>> {
        tracing::debug!(url = %url, "Fetching remote document");

        let response = self.client()?.get(url.clone()).send().map_err(|e| {
            StrataError::ResourceUnavailable(format!("failed to fetch {url}: {e}"))
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(StrataError::ResourceUnavailable(format!(
                "failed to fetch {url}: HTTP {status}"
            )));
        }

        let body = response.bytes().map_err(|e| {
            StrataError::ResourceUnavailable(format!("failed to read body of {url}: {e}"))
        })?;
        Ok(Some(body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_success_and_not_found() {
        let mut server = mockito::Server::new();
        let _ok = server
            .mock("GET", "/conf.xml")
            .with_status(200)
            .with_body("<configuration/>")
            .create();
        let _missing = server.mock("GET", "/missing.xml").with_status(404).create();

        let fetcher = HttpFetcher::new(Duration::from_secs(5));
        let base = Url::parse(&server.url()).unwrap();

        let body = fetcher.fetch(&base.join("/conf.xml").unwrap()).unwrap();
        assert_eq!(body.as_deref(), Some(&b"<configuration/>"[..]));

        let missing = fetcher.fetch(&base.join("/missing.xml").unwrap()).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_fetch_server_error() {
        let mut server = mockito::Server::new();
        let _err = server.mock("GET", "/broken.xml").with_status(500).create();

        let fetcher = HttpFetcher::new(Duration::from_secs(5));
        let url = Url::parse(&format!("{}/broken.xml", server.url())).unwrap();
        let err = fetcher.fetch(&url).unwrap_err();
        assert!(matches!(err, StrataError::ResourceUnavailable(_)));
    }
}
