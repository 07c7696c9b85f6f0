//! Snapshot persistence, reseeding and multi-session behaviour

use std::sync::Arc;

use dream_library::{
    config::{AppConfig, LibraryConfig, StorageBackend},
    models::{Catalog, EntryId},
    repository::{
        FileStorage, KeyValueStorage, MemoryStorage, Repository, CATALOG_KEY, USER_KEY, VERSION_KEY,
    },
    AppError, LibraryStore,
};

use crate::common::{draft, session, session_with, stored_snapshot, FailingKeyStorage};

#[test]
fn test_reload_round_trips_catalog() {
    let storage = MemoryStorage::new();
    let mut store = session(&storage);
    store.set_active_user("alice").unwrap();
    store.create_entry(draft("One").recurring(true)).unwrap();
    store.create_entry(draft("Two").theme("Lucid")).unwrap();
    store.set_active_user("bob").unwrap();
    let two = store.catalog().keys().next().copied().unwrap();
    store.check_out(two).unwrap();
    let expected: Catalog = store.catalog().clone();

    let reopened = session(&storage);
    assert_eq!(reopened.catalog(), &expected);
    assert_eq!(reopened.active_user(), Some("bob"));

    let order: Vec<EntryId> = reopened.catalog().keys().copied().collect();
    let expected_order: Vec<EntryId> = expected.keys().copied().collect();
    assert_eq!(order, expected_order);
}

#[test]
fn test_corrupt_snapshot_reseeds() {
    let storage = MemoryStorage::new();
    storage.set(CATALOG_KEY, "[{\"id\": \"broken\"").unwrap();
    storage.set(USER_KEY, "alice").unwrap();

    let store = session(&storage);
    assert_eq!(store.catalog().len(), 4);
    assert_eq!(store.active_user(), Some("alice"));

    let stored = stored_snapshot(&storage).unwrap();
    assert!(stored.contains("The Library That Never Ends"));
}

#[test]
fn test_no_seed_when_disabled() {
    let storage = MemoryStorage::new();
    let config = LibraryConfig {
        seed_when_empty: false,
        ..LibraryConfig::default()
    };
    let store = session_with(&storage, config);
    assert!(store.catalog().is_empty());
    assert_eq!(stored_snapshot(&storage).as_deref(), Some("[]"));
}

#[test]
fn test_last_writer_wins_between_sessions() {
    let storage = MemoryStorage::new();
    let mut tab_a = session(&storage);
    let mut tab_b = session(&storage);

    tab_a.set_active_user("alice").unwrap();
    let lost = tab_a.create_entry(draft("From tab A")).unwrap().id();

    tab_b.set_active_user("bob").unwrap();
    tab_b.create_entry(draft("From tab B")).unwrap();

    // tab B never saw tab A's entry, and its write replaced the snapshot
    tab_a.reload().unwrap();
    assert!(!tab_a.catalog().contains_key(&lost));
    assert_eq!(tab_a.catalog().len(), 5);
}

#[test]
fn test_guarded_writes_detect_concurrent_session() {
    let storage = MemoryStorage::new();
    let guarded = LibraryConfig {
        guard_writes: true,
        ..LibraryConfig::default()
    };
    let mut tab_a = session_with(&storage, guarded.clone());
    let mut tab_b = session_with(&storage, guarded);

    tab_a.set_active_user("alice").unwrap();
    tab_a.create_entry(draft("From tab A")).unwrap();

    tab_b.set_active_user("bob").unwrap();
    let err = tab_b.create_entry(draft("From tab B")).unwrap_err();
    assert!(matches!(err, AppError::StaleSnapshot { .. }));
    assert_eq!(tab_b.catalog().len(), 4);

    tab_b.reload().unwrap();
    tab_b.create_entry(draft("From tab B")).unwrap();
    assert_eq!(tab_b.catalog().len(), 6);
}

#[test]
fn test_file_storage_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let open = || {
        let storage = FileStorage::open(dir.path()).unwrap();
        let mut store = LibraryStore::new(Repository::new(Arc::new(storage)), LibraryConfig::default());
        store.initialize().unwrap();
        store
    };

    let mut store = open();
    store.set_active_user("alice").unwrap();
    let id = store.create_entry(draft("Persisted")).unwrap().id();
    let expected = store.catalog().clone();
    drop(store);

    let reopened = open();
    assert_eq!(reopened.catalog(), &expected);
    assert_eq!(reopened.get_entry(id).unwrap().title, "Persisted");
    assert_eq!(reopened.active_user(), Some("alice"));
}

#[test]
fn test_open_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.storage.backend = StorageBackend::File;
    config.storage.data_dir = dir.path().join("library");

    let store = LibraryStore::open(&config).unwrap();
    assert_eq!(store.catalog().len(), 4);
    assert!(dir.path().join("library").join(CATALOG_KEY).exists());
}

#[test]
fn test_garbage_version_keeps_catalog() {
    let storage = MemoryStorage::new();
    let mut store = session(&storage);
    store.set_active_user("alice").unwrap();
    let precious = store.create_entry(draft("Precious")).unwrap().id();
    storage.set(VERSION_KEY, "garbage").unwrap();

    let mut reopened = session(&storage);
    assert_eq!(reopened.catalog().len(), 5);
    assert_eq!(reopened.get_entry(precious).unwrap().title, "Precious");

    // the next write repairs the counter
    reopened.create_entry(draft("After")).unwrap();
    assert_eq!(storage.get(VERSION_KEY).unwrap().as_deref(), Some("1"));
}

#[test]
fn test_failed_write_leaves_stored_snapshot_untouched() {
    for failing_key in [VERSION_KEY, CATALOG_KEY] {
        let inner = MemoryStorage::new();
        session(&inner);
        let before = stored_snapshot(&inner);

        let storage = FailingKeyStorage {
            inner: inner.clone(),
            failing_key,
        };
        let mut store = LibraryStore::new(Repository::new(Arc::new(storage)), LibraryConfig::default());
        store.initialize().unwrap();
        store.set_active_user("alice").unwrap();

        let err = store.create_entry(draft("Half")).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(store.catalog().len(), 4);
        assert_eq!(stored_snapshot(&inner), before);
        assert!(!stored_snapshot(&inner).unwrap().contains("Half"));
    }
}

#[test]
fn test_corrupt_snapshot_reseeds_samples_even_without_seeding() {
    let storage = MemoryStorage::new();
    storage.set(CATALOG_KEY, "not json").unwrap();
    let config = LibraryConfig {
        seed_when_empty: false,
        ..LibraryConfig::default()
    };

    let store = session_with(&storage, config);
    assert_eq!(store.catalog().len(), 4);
}
