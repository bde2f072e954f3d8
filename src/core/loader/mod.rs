//! Document loading
//!
//! Turns a [`Resource`] into an ordered list of [`ParsedProperty`] records.
//! Loading never touches a store: the caller merges the finished document,
//! so a document that fails to parse contributes nothing.
//!
//! # Example
//!
//! ```rust,no_run
//! use strata::config::StoreOptions;
//! use strata::core::loader::DocumentLoader;
//! use strata::domain::Resource;
//!
//! # fn example() -> strata::domain::Result<()> {
//! let loader = DocumentLoader::from_options(&StoreOptions::default());
//! if let Some(doc) = loader.load(Resource::path("conf/site.xml"))? {
//!     for prop in &doc.properties {
//!         println!("{} = {:?}", prop.name, prop.value);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod encoding;
pub mod entities;

use crate::adapters::resource::ResourceFetcher;
use crate::config::StoreOptions;
use crate::domain::{Resource, Result};
use document::DocumentParser;
use std::path::PathBuf;
use std::time::Duration;

/// One property as declared in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedProperty {
    /// Trimmed name
    pub name: String,
    /// Trimmed value; `None` when missing or empty
    pub value: Option<String>,
    /// Declared final
    pub is_final: bool,
    /// Explicit `<source>` tags followed by the document locator
    pub sources: Vec<String>,
}

/// A fully parsed document
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// Provenance string of the top-level document
    pub locator: String,
    /// Properties in document order, includes spliced in place
    pub properties: Vec<ParsedProperty>,
}

/// Loads property documents
#[derive(Debug)]
pub struct DocumentLoader {
    fetcher: ResourceFetcher,
}

impl DocumentLoader {
    /// Creates a loader with an explicit search path
    pub fn new(search_path: Vec<PathBuf>, http_timeout: Duration) -> Self {
        Self {
            fetcher: ResourceFetcher::new(search_path, http_timeout),
        }
    }

    /// Creates a loader from store options
    pub fn from_options(options: &StoreOptions) -> Self {
        Self::new(
            options.search_path.clone(),
            Duration::from_secs(options.http_timeout_secs),
        )
    }

    /// Directories searched for named resources
    pub fn search_path(&self) -> Vec<PathBuf> {
        self.fetcher.search_path()
    }

    /// Loads and parses a resource
    ///
    /// Returns `Ok(None)` when a named resource is not on the search path.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be opened, decoded or parsed,
    /// or if an include without fallback cannot be resolved
    pub fn load(&self, resource: Resource) -> Result<Option<LoadedDocument>> {
        let Some(fetched) = self.fetcher.fetch(resource)? else {
            return Ok(None);
        };

        let mut properties = Vec::new();
        DocumentParser::new(&self.fetcher, &fetched.locator).parse(&fetched, 0, &mut properties)?;

        tracing::debug!(
            resource = %fetched.locator,
            count = properties.len(),
            "Parsed property document"
        );

        Ok(Some(LoadedDocument {
            locator: fetched.locator,
            properties,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn loader_for(dir: &std::path::Path) -> DocumentLoader {
        DocumentLoader::new(vec![dir.to_path_buf()], Duration::from_secs(5))
    }

    #[test]
    fn test_load_named_missing() {
        let dir = TempDir::new().unwrap();
        assert!(loader_for(dir.path())
            .load(Resource::named("nothing.xml"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_include_relative_to_document() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("conf");
        fs::create_dir(&sub).unwrap();
        fs::write(
            sub.join("inner.xml"),
            "<configuration><property><name>inner</name><value>1</value></property></configuration>",
        )
        .unwrap();
        fs::write(
            sub.join("outer.xml"),
            r#"<configuration xmlns:xi="http://www.w3.org/2001/XInclude">
  <property><name>before</name><value>0</value></property>
  <xi:include href="inner.xml">
    <xi:fallback><property><name>unused</name><value>x</value></property></xi:fallback>
  </xi:include>
  <property><name>after</name><value>2</value></property>
</configuration>"#,
        )
        .unwrap();

        let doc = loader_for(dir.path())
            .load(Resource::path(sub.join("outer.xml")))
            .unwrap()
            .unwrap();
        let names: Vec<_> = doc.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["before", "inner", "after"]);
        assert!(doc
            .properties
            .iter()
            .all(|p| p.sources.last() == Some(&doc.locator)));
    }

    #[test]
    fn test_nested_include_inside_fallback() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("second.xml"),
            "<configuration><property><name>second</name><value>s</value></property></configuration>",
        )
        .unwrap();
        let outer = dir.path().join("outer.xml");
        fs::write(
            &outer,
            r#"<configuration xmlns:xi="http://www.w3.org/2001/XInclude">
  <xi:include href="no-such-file.xml">
    <xi:fallback>
      <xi:include href="second.xml"/>
    </xi:fallback>
  </xi:include>
</configuration>"#,
        )
        .unwrap();

        let doc = loader_for(dir.path()).load(Resource::path(outer)).unwrap().unwrap();
        assert_eq!(doc.properties.len(), 1);
        assert_eq!(doc.properties[0].name, "second");
    }

    #[test]
    fn test_system_entity() {
        let dir = TempDir::new().unwrap();
        let entity = dir.path().join("value.txt");
        fs::write(&entity, "d").unwrap();
        let url = url::Url::from_file_path(&entity).unwrap();
        let doc_path = dir.path().join("doc.xml");
        fs::write(
            &doc_path,
            format!(
                r#"<?xml version="1.0"?>
<!DOCTYPE configuration [
<!ENTITY value SYSTEM "{url}">
]>
<configuration><property><name>a</name><value>&value;</value></property></configuration>"#
            ),
        )
        .unwrap();

        let doc = loader_for(dir.path()).load(Resource::path(doc_path)).unwrap().unwrap();
        assert_eq!(doc.properties[0].value.as_deref(), Some("d"));
    }
}
