//! Version store and key holder over the file-backed stores.

use std::sync::Arc;

use tempfile::TempDir;
use vaultnote_core::codec::{decrypt, encrypt};
use vaultnote_core::history::{RetentionPolicy, HISTORY_KEY};
use vaultnote_core::session::REMEMBER_MARKER_KEY;
use vaultnote_core::storage::{JsonFileStore, KeyValueStore, MemoryStore, SqliteStore};
use vaultnote_core::{KeyHolder, LockState, VersionStore};

fn backends(dir: &TempDir) -> Vec<(&'static str, Arc<dyn KeyValueStore>)> {
    let sqlite: Arc<dyn KeyValueStore> =
        Arc::new(SqliteStore::open(&dir.path().join("vaultnote.db")).unwrap());
    let json: Arc<dyn KeyValueStore> =
        Arc::new(JsonFileStore::open(dir.path().join("vaultnote.json")));
    vec![("sqlite", sqlite), ("json", json)]
}

#[test]
fn encrypted_commits_round_trip_through_each_backend() {
    let dir = TempDir::new().unwrap();
    for (name, backend) in backends(&dir) {
        let mut versions = VersionStore::open(backend.clone());

        let first = encrypt("Hello", "pass-phrase-1").unwrap();
        let h1 = versions.save_version("N1", &first, Some("init")).unwrap();
        let second = encrypt("Hello world", "pass-phrase-1").unwrap();
        let h2 = versions.save_version("N1", &second, None).unwrap();

        let mut reopened = VersionStore::open(backend);
        let log = reopened.get_versions("N1");
        assert_eq!(log.len(), 2, "{}", name);
        assert_eq!(log[0].hash, h2, "{}", name);
        assert!(log[0].is_current, "{}", name);
        assert_eq!(log[1].hash, h1, "{}", name);

        let body = decrypt(&log[1].content, "pass-phrase-1").unwrap();
        assert_eq!(body.plaintext(), "Hello", "{}", name);
    }
}

#[test]
fn retention_and_branches_persist() {
    let dir = TempDir::new().unwrap();
    for (name, backend) in backends(&dir) {
        let mut versions = VersionStore::open(backend.clone()).with_retention(RetentionPolicy {
            default_branch_limit: 5,
            branch_limit: 3,
        });
        for i in 0..8 {
            versions.save_version("N1", &format!("draft {}", i), None);
        }
        assert!(versions.create_branch("N1", "rewrite"), "{}", name);
        versions.save_version("N1", "rewrite 1", None);

        let mut reopened = VersionStore::open(backend);
        assert_eq!(
            reopened.current_branch("N1").as_deref(),
            Some("rewrite"),
            "{}",
            name
        );
        assert_eq!(reopened.get_versions("N1").len(), 2, "{}", name);

        let head = reopened.switch_branch("N1", "master").unwrap();
        assert_eq!(head.content, "draft 7", "{}", name);
        assert_eq!(reopened.get_versions("N1").len(), 5, "{}", name);
    }
}

#[test]
fn history_and_device_marker_share_one_store() {
    let dir = TempDir::new().unwrap();
    let durable: Arc<dyn KeyValueStore> =
        Arc::new(SqliteStore::open(&dir.path().join("shared.db")).unwrap());
    let session: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    let mut holder = KeyHolder::new(session.clone(), durable.clone());
    let mut versions = VersionStore::open(durable.clone());

    let key = holder.set_key("shared-store-pass", true).unwrap();
    let envelope = encrypt("Body", key.expose()).unwrap();
    versions.save_version("N1", &envelope, None).unwrap();

    assert!(durable.get(HISTORY_KEY).unwrap().is_some());
    assert!(durable.get(REMEMBER_MARKER_KEY).unwrap().is_some());

    holder.clear_key();
    assert_eq!(holder.state(), LockState::Locked);
    assert!(durable.get(REMEMBER_MARKER_KEY).unwrap().is_none());
    // locking leaves history alone
    assert_eq!(versions.get_versions("N1").len(), 1);
}

#[test]
fn clear_all_empties_the_file_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vaultnote.json");
    let backend: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::open(&path));

    let mut versions = VersionStore::open(backend.clone());
    versions.save_version("N1", "a", None).unwrap();
    versions.save_version("N2", "b", None).unwrap();
    versions.clear_all().unwrap();

    let mut reopened = VersionStore::open(backend);
    assert!(reopened.get_versions("N1").is_empty());
    assert!(reopened.get_versions("N2").is_empty());
}
