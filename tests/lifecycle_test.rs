//! Integration tests for store construction, cloning, clearing and reloading

use std::fs;
use std::sync::Arc;
use strata::config::StoreOptions;
use strata::core::defaults::DefaultResources;
use strata::core::deprecation::DeprecationRegistry;
use strata::core::PropertyStore;
use strata::domain::Resource;
use tempfile::TempDir;

fn doc(props: &[(&str, &str, bool)]) -> String {
    let body: String = props
        .iter()
        .map(|(k, v, f)| {
            format!("<property><name>{k}</name><value>{v}</value><final>{f}</final></property>")
        })
        .collect();
    format!("<configuration>{body}</configuration>")
}

#[test]
fn test_default_resources_loaded_in_order() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("strata-default.xml"), doc(&[("k", "default", false), ("d", "1", false)])).unwrap();
    fs::write(dir.path().join("strata-site.xml"), doc(&[("k", "site", false)])).unwrap();

    let options = StoreOptions {
        search_path: vec![dir.path().to_path_buf()],
        ..StoreOptions::default()
    };
    let store = PropertyStore::with_registries(
        options,
        Arc::new(DeprecationRegistry::new()),
        Arc::new(DefaultResources::default()),
    )
    .unwrap();

    assert_eq!(store.get("k").unwrap().as_deref(), Some("site"));
    assert_eq!(store.get("d").unwrap().as_deref(), Some("1"));
    assert_eq!(
        store.to_string(),
        "Configuration: strata-default.xml, strata-site.xml"
    );
}

#[test]
fn test_missing_defaults_are_skipped() {
    let dir = TempDir::new().unwrap();
    let defaults = Arc::new(DefaultResources::empty());
    defaults.add("app-default.xml");

    let options = StoreOptions {
        search_path: vec![dir.path().to_path_buf()],
        ..StoreOptions::default()
    };
    let store =
        PropertyStore::with_registries(options, Arc::new(DeprecationRegistry::new()), defaults)
            .unwrap();
    assert!(store.is_empty());
    assert_eq!(store.resources().len(), 1);
}

#[test]
fn test_clone_is_independent_snapshot() {
    let store = PropertyStore::empty();
    store
        .add_resource(Resource::from_bytes("a", doc(&[("fixed", "1", true), ("k", "1", false)])))
        .unwrap();

    let copy = store.clone();
    store
        .add_resource(Resource::from_bytes("b", doc(&[("late", "x", true)])))
        .unwrap();
    copy.set("k", "copy").unwrap();

    assert!(copy.is_final("fixed"));
    assert!(!copy.is_final("late"));
    assert_eq!(store.get("k").unwrap().as_deref(), Some("1"));
    assert_eq!(copy.get("k").unwrap().as_deref(), Some("copy"));

    let finals = store.final_parameters();
    store
        .add_resource(Resource::from_bytes("c", doc(&[("later", "y", true)])))
        .unwrap();
    assert!(!finals.contains("later"));
}

#[test]
fn test_clone_shares_dedup_history() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.xml");
    fs::write(&path, doc(&[("k", "1", false)])).unwrap();

    let store = PropertyStore::empty();
    store.add_resource(Resource::path(&path)).unwrap();
    let copy = store.clone();
    assert!(copy.add_resource(Resource::path(&path)).unwrap().duplicate);
}

#[test]
fn test_clear_keeps_locator_history() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.xml");
    fs::write(&path, doc(&[("k", "1", true)])).unwrap();

    let store = PropertyStore::empty();
    store.add_resource(Resource::path(&path)).unwrap();
    store.set("p", "v").unwrap();
    store.clear();

    assert_eq!(store.size(), 0);
    assert_eq!(store.iter().count(), 0);
    assert!(store.final_parameters().is_empty());
    assert!(store.add_resource(Resource::path(&path)).unwrap().duplicate);
    assert!(store.get("k").unwrap().is_none());
}

#[test]
fn test_reload_picks_up_changes_and_replays_sets() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("live.xml");
    fs::write(&path, doc(&[("a", "1", false), ("b", "1", false), ("gone", "x", false)])).unwrap();

    let store = PropertyStore::empty();
    store.add_resource(Resource::path(&path)).unwrap();
    store.set("b", "programmatic").unwrap();
    store.set("only.set", "s").unwrap();

    fs::write(&path, doc(&[("a", "2", false), ("b", "2", false)])).unwrap();
    store.reload().unwrap();

    assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
    assert_eq!(store.get("b").unwrap().as_deref(), Some("programmatic"));
    assert_eq!(store.get("only.set").unwrap().as_deref(), Some("s"));
    assert!(store.get("gone").unwrap().is_none());
}

#[test]
fn test_reload_keeps_order_of_programmatic_writes() {
    let store = PropertyStore::empty();
    store.set("x", "1").unwrap();
    store.set("y", "2").unwrap();
    store.set("x", "3").unwrap();
    store.reload().unwrap();

    assert_eq!(store.get("x").unwrap().as_deref(), Some("3"));
    let keys: Vec<String> = store.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["x", "y"]);
}

#[test]
fn test_reload_drops_stream_content() {
    let store = PropertyStore::empty();
    store
        .add_resource(Resource::from_bytes("stream", doc(&[("s", "1", false)])))
        .unwrap();
    store.reload().unwrap();
    assert!(store.get("s").unwrap().is_none());
}

#[test]
fn test_reload_failure_leaves_store_unchanged() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.xml");
    fs::write(&path, doc(&[("k", "1", false)])).unwrap();

    let store = PropertyStore::empty();
    store.add_resource(Resource::path(&path)).unwrap();
    fs::write(&path, "<configuration><broken></configuration>").unwrap();

    assert!(store.reload().is_err());
    assert_eq!(store.get("k").unwrap().as_deref(), Some("1"));
}
