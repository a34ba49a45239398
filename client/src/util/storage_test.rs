use super::*;

#[test]
fn memory_store_clones_share_entries() {
    let store = MemoryStore::new();
    let view = store.clone();
    assert!(store.is_empty());

    store.set("lps2Theme", "dark").unwrap();
    assert_eq!(view.get("lps2Theme").unwrap().as_deref(), Some("dark"));
    assert_eq!(view.get("missing").unwrap(), None);
    assert_eq!(view.len(), 1);
}

#[test]
fn json_helpers_round_trip_through_store() {
    let store = MemoryStore::new();
    save_json(&store, "drafts", &vec!["a".to_owned(), "b".to_owned()]).unwrap();
    assert_eq!(store.get("drafts").unwrap().as_deref(), Some(r#"["a","b"]"#));

    let loaded: Option<Vec<String>> = load_json(&store, "drafts").unwrap();
    assert_eq!(loaded, Some(vec!["a".to_owned(), "b".to_owned()]));
    let absent: Option<Vec<String>> = load_json(&store, "nothing").unwrap();
    assert_eq!(absent, None);
}

#[test]
fn load_json_reports_corrupt_values() {
    let store = MemoryStore::new();
    store.set("count", "not a number").unwrap();
    let err = load_json::<u32>(&store, "count").unwrap_err();
    assert!(matches!(err, StorageError::Corrupt { ref key, .. } if key == "count"));
}

#[cfg(not(feature = "csr"))]
#[test]
fn local_storage_is_unavailable_natively() {
    assert_eq!(LocalStorage.get("k"), Err(StorageError::Unavailable));
    assert_eq!(LocalStorage.set("k", "v"), Err(StorageError::Unavailable));
}
