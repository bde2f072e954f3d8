//! Flat JSON dump

use super::{collect_entries, DumpEntry};
use crate::core::store::PropertyStore;
use crate::domain::Result;
use serde::Serialize;
use std::io::Write;

const UNKNOWN_RESOURCE: &str = "Unknown";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonProperty {
    key: String,
    value: Option<String>,
    is_final: bool,
    resource: String,
    sources: Vec<String>,
}

impl From<DumpEntry> for JsonProperty {
    fn from(entry: DumpEntry) -> Self {
        Self {
            resource: entry
                .sources
                .last()
                .cloned()
                .unwrap_or_else(|| UNKNOWN_RESOURCE.to_string()),
            key: entry.name,
            value: entry.value,
            is_final: entry.is_final,
            sources: entry.sources,
        }
    }
}

#[derive(Serialize)]
struct AllProperties {
    properties: Vec<JsonProperty>,
}

#[derive(Serialize)]
struct OneProperty {
    property: JsonProperty,
}

impl PropertyStore {
    /// Writes `{"properties":[...]}`, or `{"property":{...}}` for one key
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::NotFound`](crate::domain::StrataError::NotFound)
    /// for a missing key, or an I/O or substitution error
    pub fn dump_json<W: Write>(&self, key: Option<&str>, out: W) -> Result<()> {
        let single = key.is_some_and(|k| !k.trim().is_empty());
        let mut entries: Vec<JsonProperty> = collect_entries(self, key)?
            .into_iter()
            .map(JsonProperty::from)
            .collect();

        match entries.pop() {
            Some(property) if single => serde_json::to_writer(out, &OneProperty { property })?,
            last => {
                entries.extend(last);
                serde_json::to_writer(out, &AllProperties { properties: entries })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn dump(store: &PropertyStore, key: Option<&str>) -> Value {
        let mut buf = Vec::new();
        store.dump_json(key, &mut buf).unwrap();
        serde_json::from_slice(&buf).unwrap()
    }

    #[test]
    fn test_all_properties() {
        let store = PropertyStore::empty();
        store.set("a", "1").unwrap();
        store.set("b", "${a}2").unwrap();

        let json = dump(&store, None);
        let props = json["properties"].as_array().unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props[1]["key"], "b");
        assert_eq!(props[1]["value"], "12");
        assert_eq!(props[1]["isFinal"], false);
        assert_eq!(props[1]["resource"], "programmatically");
    }

    #[test]
    fn test_single_property() {
        let store = PropertyStore::empty();
        store.set("app.secret", "s3cr3t").unwrap();
        let json = dump(&store, Some("app.secret"));
        assert_eq!(json["property"]["key"], "app.secret");
        assert_eq!(json["property"]["value"], "<redacted>");
    }

    #[test]
    fn test_empty_store() {
        let store = PropertyStore::empty();
        assert_eq!(dump(&store, None), serde_json::json!({ "properties": [] }));
    }

    #[test]
    fn test_missing_key() {
        let store = PropertyStore::empty();
        assert!(store.dump_json(Some("nope"), Vec::new()).is_err());
    }
}
