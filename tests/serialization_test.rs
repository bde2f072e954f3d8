//! Integration tests for XML/JSON dumps, provenance and redaction

use serde_json::Value;
use strata::config::keys::SENSITIVE_CONFIG_KEYS;
use strata::core::PropertyStore;
use strata::domain::{Resource, StrataError};

const SITE: &str = r#"<configuration>
  <property><name>fs.default</name><value>hdfs://${nn.host}:8020</value><final>true</final></property>
  <property><name>nn.host</name><value>nn1</value></property>
  <property><name>store.password</name><value>hunter2</value></property>
  <property><name>tagged</name><value>t</value><source>generated</source></property>
</configuration>"#;

fn site_store() -> PropertyStore {
    let store = PropertyStore::empty();
    store.add_resource(Resource::from_bytes("site.xml", SITE)).unwrap();
    store
}

#[test]
fn test_xml_dump_round_trip() {
    let store = site_store();
    store.set("extra", "programmatic").unwrap();

    let xml = store.to_xml_string(None).unwrap();
    let copy = PropertyStore::empty();
    copy.add_resource(Resource::from_bytes("dump.xml", xml)).unwrap();

    assert_eq!(copy.get("fs.default").unwrap().as_deref(), Some("hdfs://nn1:8020"));
    assert!(copy.is_final("fs.default"));
    assert_eq!(copy.get("extra").unwrap().as_deref(), Some("programmatic"));
    assert_eq!(copy.get("store.password").unwrap().as_deref(), Some("<redacted>"));
    assert_eq!(
        copy.get_property_sources("tagged"),
        Some(vec![
            "generated".to_string(),
            "site.xml".to_string(),
            "dump.xml".to_string()
        ])
    );
}

#[test]
fn test_json_dump() {
    let store = site_store();
    let mut buf = Vec::new();
    store.dump_json(None, &mut buf).unwrap();
    let json: Value = serde_json::from_slice(&buf).unwrap();

    let props = json["properties"].as_array().unwrap();
    let keys: Vec<&str> = props.iter().map(|p| p["key"].as_str().unwrap()).collect();
    assert_eq!(keys, vec!["fs.default", "nn.host", "store.password", "tagged"]);
    assert_eq!(props[0]["value"], "hdfs://nn1:8020");
    assert_eq!(props[0]["isFinal"], true);
    assert_eq!(props[0]["resource"], "site.xml");
    assert_eq!(props[2]["value"], "<redacted>");
    assert_eq!(props[3]["sources"], serde_json::json!(["generated", "site.xml"]));
}

#[test]
fn test_single_key_dumps() {
    let store = site_store();

    let mut buf = Vec::new();
    store.dump_json(Some("nn.host"), &mut buf).unwrap();
    let json: Value = serde_json::from_slice(&buf).unwrap();
    assert_eq!(json["property"]["value"], "nn1");

    let xml = store.to_xml_string(Some("nn.host")).unwrap();
    assert_eq!(xml.matches("<property>").count(), 1);

    let err = store.dump_json(Some("absent.key"), Vec::new()).unwrap_err();
    assert!(matches!(err, StrataError::NotFound(_)));
}

#[test]
fn test_custom_sensitive_keys() {
    let store = site_store();
    store.set(SENSITIVE_CONFIG_KEYS, "^nn\\.").unwrap();
    let xml = store.to_xml_string(None).unwrap();

    assert!(xml.contains("hunter2"));
    assert!(!xml.contains("<value>nn1</value>"));
    assert!(xml.contains("<name>nn.host</name><value>&lt;redacted&gt;</value>"));
}

#[test]
fn test_provenance_of_programmatic_values() {
    let store = site_store();
    store.set("nn.host", "nn2").unwrap();
    assert_eq!(
        store.get_property_sources("nn.host"),
        Some(vec!["programmatically".to_string()])
    );
    assert!(store.get_property_sources("never.set").is_none());
}
