use std::sync::Arc;

use chrono::NaiveDate;
use dream_library::{
    config::LibraryConfig,
    models::EntryDraft,
    repository::{KeyValueStorage, MemoryStorage, Repository},
    AppError, AppResult, LibraryStore,
};

/// A fresh session over `storage`, already initialized
pub fn session(storage: &MemoryStorage) -> LibraryStore {
    session_with(storage, LibraryConfig::default())
}

pub fn session_with(storage: &MemoryStorage, config: LibraryConfig) -> LibraryStore {
    let repository = Repository::new(Arc::new(storage.clone()));
    let mut store = LibraryStore::new(repository, config);
    store.initialize().expect("initialize library");
    store
}

pub fn draft(title: &str) -> EntryDraft {
    EntryDraft::new(title)
        .date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .description("d")
        .theme("")
        .recurring(false)
}

/// Serialized catalog as currently stored
pub fn stored_snapshot(storage: &MemoryStorage) -> Option<String> {
    use dream_library::repository::CATALOG_KEY;
    storage.get(CATALOG_KEY).unwrap()
}

/// Shared memory medium whose writes to one key always fail
pub struct FailingKeyStorage {
    pub inner: MemoryStorage,
    pub failing_key: &'static str,
}

impl KeyValueStorage for FailingKeyStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        if key == self.failing_key {
            return Err(AppError::Storage(format!("write to {} refused", key)));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.inner.remove(key)
    }
}
