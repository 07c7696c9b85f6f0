//! Repository layer over the key-value persistence medium

pub mod catalog;
pub mod file;
pub mod memory;
pub mod session;

use std::sync::Arc;

use crate::{
    config::{StorageBackend, StorageConfig},
    error::AppResult,
};

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Key holding the JSON array of catalog entries
pub const CATALOG_KEY: &str = "sharedDreamLibrary";
/// Key holding the active user name as a plain string
pub const USER_KEY: &str = "dreamLibraryUser";
/// Key holding the catalog snapshot counter
pub const VERSION_KEY: &str = "sharedDreamLibraryVersion";

/// Synchronous, string-valued key-value medium
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;
}

/// Main repository struct holding the storage medium
#[derive(Clone)]
pub struct Repository {
    pub catalog: catalog::CatalogRepository,
    pub session: session::SessionRepository,
}

impl Repository {
    /// Create a new repository over the given medium
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            catalog: catalog::CatalogRepository::new(storage.clone()),
            session: session::SessionRepository::new(storage),
        }
    }

    /// Open the medium named by the storage configuration
    pub fn from_config(config: &StorageConfig) -> AppResult<Self> {
        let storage: Arc<dyn KeyValueStorage> = match config.backend {
            StorageBackend::File => Arc::new(FileStorage::open(&config.data_dir)?),
            StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        };
        Ok(Self::new(storage))
    }
}
