//! DOCTYPE entity declarations
//!
//! Only general entities from the internal subset are honored: literal
//! `<!ENTITY name "text">` and external `<!ENTITY name SYSTEM "uri">`
//! (or `PUBLIC "id" "uri"`). Parameter entities are skipped.

use crate::domain::{Result, StrataError};
use regex::Regex;

/// One declared entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityDecl {
    /// Replacement text given inline
    Literal { name: String, text: String },
    /// Replacement text read from a URI or path
    External { name: String, uri: String },
}

impl EntityDecl {
    pub fn name(&self) -> &str {
        match self {
            EntityDecl::Literal { name, .. } | EntityDecl::External { name, .. } => name,
        }
    }
}

/// Extracts entity declarations from the text of a DOCTYPE declaration
///
/// # Errors
///
/// Returns an error only if the declaration pattern fails to compile
pub fn parse_doctype(doctype: &str, resource: &str) -> Result<Vec<EntityDecl>> {
    let re = Regex::new(
        r#"<!ENTITY\s+(%\s+)?([^\s%"']+)\s+(?:"([^"]*)"|'([^']*)'|(?:SYSTEM|PUBLIC\s+(?:"[^"]*"|'[^']*'))\s+(?:"([^"]*)"|'([^']*)'))[^>]*>"#,
    )
    .map_err(|e| StrataError::parse(resource, format!("invalid entity pattern: {e}")))?;

    let mut decls = Vec::new();
    for cap in re.captures_iter(doctype) {
        if cap.get(1).is_some() {
            continue;
        }
        let name = cap[2].to_string();
        if let Some(text) = cap.get(3).or_else(|| cap.get(4)) {
            decls.push(EntityDecl::Literal {
                name,
                text: text.as_str().to_string(),
            });
        } else if let Some(uri) = cap.get(5).or_else(|| cap.get(6)) {
            decls.push(EntityDecl::External {
                name,
                uri: uri.as_str().to_string(),
            });
        }
    }
    Ok(decls)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_and_system() {
        let doctype = r#"configuration [
  <!ENTITY d "dee">
  <!ENTITY e SYSTEM "file:///tmp/e.txt">
  <!ENTITY f PUBLIC "-//X//Y" 'f.txt'>
]"#;
        let decls = parse_doctype(doctype, "t").unwrap();
        assert_eq!(
            decls,
            vec![
                EntityDecl::Literal {
                    name: "d".to_string(),
                    text: "dee".to_string()
                },
                EntityDecl::External {
                    name: "e".to_string(),
                    uri: "file:///tmp/e.txt".to_string()
                },
                EntityDecl::External {
                    name: "f".to_string(),
                    uri: "f.txt".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_parameter_entities_skipped() {
        let decls = parse_doctype(r#"c [<!ENTITY % p "x"> <!ENTITY q 'y'>]"#, "t").unwrap();
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name(), "q");
    }

    #[test]
    fn test_no_subset() {
        assert!(parse_doctype("configuration", "t").unwrap().is_empty());
    }
}
