//! Resource references
//!
//! A [`Resource`] names one property document: a name looked up on the search
//! path, a file path, a URL, or an in-memory stream. Locator-based resources
//! normalize to a stable string used for de-duplication and provenance;
//! streams never do.

use super::errors::StrataError;
use super::result::Result;
use std::fmt;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use url::Url;

/// A property document to be loaded
pub enum Resource {
    /// Looked up on the store's search path (e.g. `strata-site.xml`)
    Named(String),

    /// A file system path
    Path(PathBuf),

    /// A `file://` or `http(s)://` URL
    Url(Url),

    /// An already-open byte stream; consumed on load and never re-read
    Stream(StreamResource),
}

/// Byte stream with a display name used as its provenance tag
pub struct StreamResource {
    name: String,
    reader: Box<dyn Read + Send>,
}

impl StreamResource {
    /// Provenance name of the stream
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Drains the stream
    pub fn read_all(mut self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.reader.read_to_end(&mut buf).map_err(|e| {
            StrataError::ResourceUnavailable(format!("failed to read stream {}: {e}", self.name))
        })?;
        Ok(buf)
    }
}

impl Resource {
    /// A resource resolved on the search path
    pub fn named(name: impl Into<String>) -> Self {
        Resource::Named(name.into())
    }

    /// A file system resource
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Resource::Path(path.into())
    }

    /// Parses a URL resource
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidArgument`] if the text is not a URL
    pub fn url(url: &str) -> Result<Self> {
        Url::parse(url)
            .map(Resource::Url)
            .map_err(|e| StrataError::InvalidArgument(format!("invalid resource URL {url}: {e}")))
    }

    /// A stream resource with the given provenance name
    pub fn stream(name: impl Into<String>, reader: impl Read + Send + 'static) -> Self {
        Resource::Stream(StreamResource {
            name: name.into(),
            reader: Box::new(reader),
        })
    }

    /// A stream resource over an in-memory buffer
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::stream(name, std::io::Cursor::new(bytes.into()))
    }

    /// Normalized locator, `None` for streams
    pub fn locator(&self) -> Option<String> {
        self.reference().locator()
    }

    /// Re-openable description of this resource
    pub fn reference(&self) -> ResourceRef {
        match self {
            Resource::Named(name) => ResourceRef::Named(name.clone()),
            Resource::Path(path) => ResourceRef::Path(absolutize(path)),
            Resource::Url(url) => match file_url_path(url) {
                Some(path) => ResourceRef::Path(absolutize(&path)),
                None => ResourceRef::Url(url.clone()),
            },
            Resource::Stream(s) => ResourceRef::Stream(s.name.clone()),
        }
    }
}

// `file://` URLs share a locator with the path they name.
pub(crate) fn file_url_path(url: &Url) -> Option<PathBuf> {
    if url.scheme() == "file" {
        url.to_file_path().ok()
    } else {
        None
    }
}

impl From<PathBuf> for Resource {
    fn from(path: PathBuf) -> Self {
        Resource::Path(path)
    }
}

impl From<&Path> for Resource {
    fn from(path: &Path) -> Self {
        Resource::Path(path.to_path_buf())
    }
}

impl From<Url> for Resource {
    fn from(url: Url) -> Self {
        Resource::Url(url)
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Resource({})", self.reference())
    }
}

/// Registered resource, as remembered by a store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceRef {
    Named(String),
    Path(PathBuf),
    Url(Url),
    Stream(String),
}

impl ResourceRef {
    /// Normalized locator, `None` for streams
    pub fn locator(&self) -> Option<String> {
        match self {
            ResourceRef::Stream(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Reopens the resource for a reload; streams cannot be reopened
    pub fn reopen(&self) -> Option<Resource> {
        match self {
            ResourceRef::Named(name) => Some(Resource::Named(name.clone())),
            ResourceRef::Path(path) => Some(Resource::Path(path.clone())),
            ResourceRef::Url(url) => Some(Resource::Url(url.clone())),
            ResourceRef::Stream(_) => None,
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceRef::Named(name) => write!(f, "{name}"),
            ResourceRef::Path(path) => write!(f, "{}", path.display()),
            ResourceRef::Url(url) => write!(f, "{url}"),
            ResourceRef::Stream(name) => write!(f, "{name}"),
        }
    }
}

/// Makes a path absolute against the working directory and folds `.`/`..`
/// lexically, without touching the file system.
pub fn absolutize(path: &Path) -> PathBuf {
    let mut out = if path.is_absolute() {
        PathBuf::new()
    } else {
        std::env::current_dir().unwrap_or_default()
    };
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
