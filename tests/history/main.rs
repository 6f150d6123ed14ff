mod flaky_remote;

use flaky_remote::FlakyRemote;
use textflow::{
    FileStorage, HistoryConfig, HistoryMigrationService, HistorySession, InMemoryStorage,
    KeyValueStorage, LocalHistoryStore, MigrationError, MigrationOutcome, Saved,
};

#[test]
fn sixth_save_evicts_the_first() {
    let mut store = LocalHistoryStore::open(InMemoryStorage::new());
    let first = store.save("one", None).unwrap();
    for content in ["two", "three", "four", "five"] {
        store.save(content, None).unwrap();
    }
    assert_eq!(store.len(), 5);
    assert!(!store.has_capacity());

    let sixth = store.save("six", None).unwrap();
    assert_eq!(store.len(), 5);
    assert_eq!(store.list()[0].id, sixth.id);
    assert!(store.get(&first.id).is_none());

    let contents: Vec<&str> = store.list().iter().map(|s| s.content.as_str()).collect();
    assert_eq!(contents, vec!["six", "five", "four", "three", "two"]);
}

#[test]
fn ids_are_unique_and_increasing() {
    let mut store = LocalHistoryStore::open_with(
        InMemoryStorage::new(),
        HistoryConfig::default().with_capacity(50),
    );
    for n in 0..50 {
        store.save(&n.to_string(), None).unwrap();
    }
    let ids: Vec<u64> = store.list().iter().map(|s| s.id.parse().unwrap()).collect();
    // newest first, so strictly decreasing
    assert!(ids.windows(2).all(|w| w[0] > w[1]));
}

#[test]
fn clear_survives_rehydration() {
    let storage = InMemoryStorage::new();
    let mut store = LocalHistoryStore::open(storage.clone());
    store.save("a", None).unwrap();
    store.save("b", None).unwrap();

    store.clear().unwrap();
    assert!(store.list().is_empty());

    let reopened = LocalHistoryStore::open(storage.clone());
    assert!(reopened.list().is_empty());
    assert_eq!(storage.get("textflow_histories").unwrap(), None);
}

#[test]
fn file_storage_persists_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let config = HistoryConfig::default().with_storage_key("guest_history");

    {
        let mut store =
            LocalHistoryStore::open_with(FileStorage::open(dir.path()).unwrap(), config.clone());
        store.save("written before restart", Some("Before")).unwrap();
    }

    let store = LocalHistoryStore::open_with(FileStorage::open(dir.path()).unwrap(), config);
    assert_eq!(store.len(), 1);
    assert_eq!(store.list()[0].title, "Before");
    assert_eq!(store.list()[0].char_count, "written before restart".len());
}

#[test]
fn corrupt_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("textflow_histories.json"), "[{\"id\":").unwrap();

    let mut store = LocalHistoryStore::open(FileStorage::open(dir.path()).unwrap());
    assert!(store.is_empty());

    // the next save replaces the corrupt record
    store.save("fresh", None).unwrap();
    let reopened = LocalHistoryStore::open(FileStorage::open(dir.path()).unwrap());
    assert_eq!(reopened.list()[0].content, "fresh");
}

#[test]
fn persisted_record_matches_wire_format() {
    let storage = InMemoryStorage::new();
    let mut store = LocalHistoryStore::open(storage.clone());
    store.save_typed("hello", None, "counter").unwrap();

    let raw = storage.get("textflow_histories").unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entry = &json.as_array().unwrap()[0];
    let mut keys: Vec<&str> = entry.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec!["charCount", "content", "contentType", "createdAt", "id", "title"]
    );
    assert_eq!(entry["charCount"], 5);
}

#[test]
fn hydrates_records_written_by_other_clients() {
    let storage = InMemoryStorage::new();
    storage
        .set(
            "textflow_histories",
            r#"[{"id":"1700000000001","title":"From browser","content":"abc","contentType":"plain","charCount":3,"createdAt":"2023-11-14T22:13:20.001Z"}]"#,
        )
        .unwrap();

    let mut store = LocalHistoryStore::open(storage);
    assert_eq!(store.list()[0].title, "From browser");

    let next = store.save("newer", None).unwrap();
    assert!(next.id.parse::<u64>().unwrap() > 1_700_000_000_001);
}

#[test]
fn failed_migration_keeps_everything_then_retries() {
    let mut store = LocalHistoryStore::open(InMemoryStorage::new());
    store.save("first", None).unwrap();
    store.save("second", None).unwrap();
    let before = store.list().to_vec();

    let mut service = HistoryMigrationService::new(FlakyRemote::offline());
    let outcome = service.migrate(&mut store);
    assert_eq!(
        outcome,
        MigrationOutcome::Failed(MigrationError::Remote("network unreachable".into()))
    );
    assert_eq!(store.list(), before.as_slice());

    service.remote_mut().online = true;
    let outcome = service.migrate(&mut store);
    assert_eq!(
        outcome,
        MigrationOutcome::Migrated {
            submitted: 2,
            imported: 2
        }
    );
    assert!(store.is_empty());

    // one batch, newest first, local-only fields dropped
    let batches = &service.remote().batches;
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].histories[0].content, "second");
    assert_eq!(batches[0].histories[1].content, "first");

    assert_eq!(service.migrate(&mut store), MigrationOutcome::Skipped);
    assert_eq!(service.remote().batches.len(), 1);
}

#[test]
fn session_routes_saves_by_auth_state() {
    let store = LocalHistoryStore::open(InMemoryStorage::new());
    let mut session = HistorySession::new(store, FlakyRemote::offline());

    assert!(matches!(session.save("guest text", None).unwrap(), Saved::Local(_)));
    assert!(session.on_authenticated().is_failure());

    // signed in: saves go to the (offline) remote and never touch local history
    assert!(session.save("member text", None).is_err());
    assert_eq!(session.local_history().len(), 1);
    assert_eq!(session.remote().batches.len(), 0);
}
