use std::fs;

use campus_events::campus::models::Credential;
use campus_events::campus::token_store::{FileTokenStore, TokenStore, TOKEN_KEY};

#[test]
fn missing_file_means_no_token() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileTokenStore::new(dir.path().join("token.json"));

    assert_eq!(store.load().unwrap(), None);
    store.clear().unwrap();
}

#[test]
fn saved_token_survives_a_new_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("token.json");

    FileTokenStore::new(&path)
        .save(&Credential::new("abc.def"))
        .unwrap();

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw[TOKEN_KEY], "abc.def");
    assert_eq!(
        FileTokenStore::new(&path).load().unwrap(),
        Some(Credential::new("abc.def"))
    );
}

#[test]
fn clear_removes_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token.json");
    let store = FileTokenStore::new(&path);
    store.save(&Credential::new("abc")).unwrap();

    store.clear().unwrap();

    assert!(!path.exists());
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn clear_keeps_unrelated_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token.json");
    fs::write(&path, r#"{"authToken": "abc", "theme": "dark"}"#).unwrap();
    let store = FileTokenStore::new(&path);

    store.clear().unwrap();

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["theme"], "dark");
    assert!(raw.get(TOKEN_KEY).is_none());
}

#[test]
fn corrupt_file_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token.json");
    fs::write(&path, "not json").unwrap();

    let err = FileTokenStore::new(&path).load().unwrap_err();

    assert!(err.to_string().starts_with("Token storage failed"));
}
