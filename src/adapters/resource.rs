//! Resource fetching: search path, file system and HTTP
//!
//! The fetcher turns a [`Resource`] into raw bytes plus the base location
//! that relative includes and SYSTEM entities are resolved against.

use super::http::HttpFetcher;
use crate::domain::resource::{absolutize, file_url_path};
use crate::domain::{Resource, Result, StrataError};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Location used to resolve relative references inside a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Base {
    /// Directory containing the document
    Dir(PathBuf),
    /// URL of the document
    Url(Url),
}

/// Raw document bytes with their locator
#[derive(Debug, Clone)]
pub struct Fetched {
    /// Provenance string for the document
    pub locator: String,
    /// Undecoded document content
    pub bytes: Vec<u8>,
    /// Base for relative references; `None` for streams
    pub base: Option<Base>,
}

/// Opens resources for the document loader
#[derive(Debug)]
pub struct ResourceFetcher {
    search_path: Vec<PathBuf>,
    http: HttpFetcher,
}

impl ResourceFetcher {
    /// Creates a fetcher; an empty search path means the working directory
    pub fn new(search_path: Vec<PathBuf>, http_timeout: Duration) -> Self {
        Self {
            search_path,
            http: HttpFetcher::new(http_timeout),
        }
    }

    /// Directories searched for named resources
    pub fn search_path(&self) -> Vec<PathBuf> {
        if self.search_path.is_empty() {
            vec![std::env::current_dir().unwrap_or_default()]
        } else {
            self.search_path.clone()
        }
    }

    /// Opens a top-level resource
    ///
    /// Returns `Ok(None)` only for a named resource that is not on the search
    /// path; the caller decides whether that is an error.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::ResourceUnavailable`] if a path or URL cannot be read
    pub fn fetch(&self, resource: Resource) -> Result<Option<Fetched>> {
        match resource {
            Resource::Named(name) => Ok(self.find_on_search_path(&name)?.map(|(path, bytes)| {
                Fetched {
                    locator: name,
                    bytes,
                    base: parent_dir(&path),
                }
            })),
            Resource::Path(path) => {
                let path = absolutize(&path);
                let bytes = read_file(&path)?;
                Ok(Some(Fetched {
                    locator: path.display().to_string(),
                    base: parent_dir(&path),
                    bytes,
                }))
            }
            Resource::Url(url) => match file_url_path(&url) {
                Some(path) => self.fetch(Resource::Path(path)),
                None => match self.fetch_url(&url)? {
                    Some(fetched) => Ok(Some(fetched)),
                    None => Err(StrataError::ResourceUnavailable(format!("{url} not found"))),
                },
            },
            Resource::Stream(stream) => {
                let locator = stream.name().to_string();
                Ok(Some(Fetched {
                    locator,
                    bytes: stream.read_all()?,
                    base: None,
                }))
            }
        }
    }

    /// Opens a reference found inside a document (include `href`, entity URI)
    ///
    /// Resolution order: absolute URL, absolute path, relative to `base`,
    /// then each search-path directory. Returns `Ok(None)` if nothing matched.
    ///
    /// # Errors
    ///
    /// Returns an error only for failures other than "not found"
    pub fn fetch_reference(&self, href: &str, base: Option<&Base>) -> Result<Option<Fetched>> {
        let href = href.trim();
        if href.is_empty() {
            return Ok(None);
        }

        if let Some(url) = parse_absolute_url(href) {
            return self.fetch_url(&url);
        }

        let candidate = Path::new(href);
        if candidate.is_absolute() {
            return self.fetch_path_if_exists(candidate);
        }

        match base {
            Some(Base::Dir(dir)) => {
                if let Some(fetched) = self.fetch_path_if_exists(&dir.join(candidate))? {
                    return Ok(Some(fetched));
                }
            }
            Some(Base::Url(url)) => {
                if let Ok(joined) = url.join(href) {
                    match self.fetch_url(&joined) {
                        Ok(Some(fetched)) => return Ok(Some(fetched)),
                        Ok(None) => {}
                        Err(e) => tracing::debug!(href, error = %e, "Relative reference failed"),
                    }
                }
            }
            None => {}
        }

        Ok(self
            .find_on_search_path(href)?
            .map(|(path, bytes)| Fetched {
                locator: path.display().to_string(),
                base: parent_dir(&path),
                bytes,
            }))
    }

    fn fetch_url(&self, url: &Url) -> Result<Option<Fetched>> {
        match url.scheme() {
            "file" => {
                let path = url.to_file_path().map_err(|_| {
                    StrataError::InvalidArgument(format!("not a local file URL: {url}"))
                })?;
                if !path.is_file() {
                    return Ok(None);
                }
                Ok(Some(Fetched {
                    locator: url.to_string(),
                    bytes: read_file(&path)?,
                    base: parent_dir(&path),
                }))
            }
            "http" | "https" => Ok(self.http.fetch(url)?.map(|bytes| Fetched {
                locator: url.to_string(),
                bytes,
                base: Some(Base::Url(url.clone())),
            })),
            other => Err(StrataError::ResourceUnavailable(format!(
                "unsupported URL scheme '{other}' in {url}"
            ))),
        }
    }

    fn fetch_path_if_exists(&self, path: &Path) -> Result<Option<Fetched>> {
        let path = absolutize(path);
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(Fetched {
            locator: path.display().to_string(),
            bytes: read_file(&path)?,
            base: parent_dir(&path),
        }))
    }

    fn find_on_search_path(&self, name: &str) -> Result<Option<(PathBuf, Vec<u8>)>> {
        for dir in self.search_path() {
            let candidate = absolutize(&dir.join(name));
            if candidate.is_file() {
                tracing::debug!(name, path = %candidate.display(), "Found resource on search path");
                return Ok(Some((candidate.clone(), read_file(&candidate)?)));
            }
        }
        Ok(None)
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        StrataError::ResourceUnavailable(format!("failed to read {}: {}", path.display(), e))
    })
}

fn parent_dir(path: &Path) -> Option<Base> {
    path.parent().map(|p| Base::Dir(p.to_path_buf()))
}

/// Parses `href` as a URL only when it carries a real scheme, so Windows
/// drive letters and relative paths fall through to path handling.
fn parse_absolute_url(href: &str) -> Option<Url> {
    let url = Url::parse(href).ok()?;
    if url.scheme().len() > 1 {
        Some(url)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fetcher_for(dir: &Path) -> ResourceFetcher {
        ResourceFetcher::new(vec![dir.to_path_buf()], Duration::from_secs(5))
    }

    #[test]
    fn test_named_resource_on_search_path() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("site.xml"), "<configuration/>").unwrap();

        let fetched = fetcher_for(dir.path())
            .fetch(Resource::named("site.xml"))
            .unwrap()
            .unwrap();
        assert_eq!(fetched.locator, "site.xml");
        assert_eq!(fetched.bytes, b"<configuration/>");
        assert_eq!(fetched.base, Some(Base::Dir(absolutize(dir.path()))));
    }

    #[test]
    fn test_missing_named_resource_is_none() {
        let dir = TempDir::new().unwrap();
        let fetched = fetcher_for(dir.path())
            .fetch(Resource::named("absent.xml"))
            .unwrap();
        assert!(fetched.is_none());
    }

    #[test]
    fn test_missing_path_is_error() {
        let dir = TempDir::new().unwrap();
        let err = fetcher_for(dir.path())
            .fetch(Resource::path(dir.path().join("absent.xml")))
            .unwrap_err();
        assert!(matches!(err, StrataError::ResourceUnavailable(_)));
    }

    #[test]
    fn test_reference_relative_to_base_before_search_path() {
        let doc_dir = TempDir::new().unwrap();
        let search_dir = TempDir::new().unwrap();
        fs::write(doc_dir.path().join("inc.xml"), "local").unwrap();
        fs::write(search_dir.path().join("inc.xml"), "searched").unwrap();

        let fetcher = fetcher_for(search_dir.path());
        let base = Base::Dir(doc_dir.path().to_path_buf());

        let local = fetcher.fetch_reference("inc.xml", Some(&base)).unwrap().unwrap();
        assert_eq!(local.bytes, b"local");

        let searched = fetcher.fetch_reference("inc.xml", None).unwrap().unwrap();
        assert_eq!(searched.bytes, b"searched");
    }

    #[test]
    fn test_reference_file_url() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("entity.txt");
        fs::write(&path, "d").unwrap();
        let url = Url::from_file_path(&path).unwrap();

        let fetched = fetcher_for(dir.path())
            .fetch_reference(url.as_str(), None)
            .unwrap()
            .unwrap();
        assert_eq!(fetched.bytes, b"d");
    }

    #[test]
    fn test_reference_not_found() {
        let dir = TempDir::new().unwrap();
        let fetched = fetcher_for(dir.path())
            .fetch_reference("nope.xml", None)
            .unwrap();
        assert!(fetched.is_none());
    }
}
