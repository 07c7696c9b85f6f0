//! Catalog snapshot persistence

use std::sync::Arc;

use super::{KeyValueStorage, CATALOG_KEY, VERSION_KEY};
use crate::{
    error::{AppError, AppResult},
    models::{Catalog, Entry},
};

#[derive(Clone)]
pub struct CatalogRepository {
    storage: Arc<dyn KeyValueStorage>,
}

impl CatalogRepository {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Read the persisted catalog.
    ///
    /// Returns `Ok(None)` when nothing has been written yet. A snapshot that
    /// does not parse, or that repeats an id, is an error.
    pub fn load(&self) -> AppResult<Option<Catalog>> {
        let Some(raw) = self.storage.get(CATALOG_KEY)? else {
            return Ok(None);
        };

        let entries: Vec<Entry> = serde_json::from_str(&raw)?;
        let count = entries.len();
        let catalog: Catalog = entries.into_iter().map(|e| (e.id(), e)).collect();
        if catalog.len() != count {
            return Err(AppError::Storage(format!(
                "Snapshot repeats entry ids ({} records, {} distinct)",
                count,
                catalog.len()
            )));
        }

        tracing::debug!("Loaded catalog snapshot with {} entries", count);
        Ok(Some(catalog))
    }

    /// Current snapshot counter, 0 when never written.
    ///
    /// A counter that does not parse is logged and read as 0; it must not
    /// cost the catalog it sits next to.
    pub fn version(&self) -> AppResult<u64> {
        let Some(raw) = self.storage.get(VERSION_KEY)? else {
            return Ok(0);
        };
        match raw.trim().parse::<u64>() {
            Ok(version) => Ok(version),
            Err(e) => {
                tracing::warn!("Invalid snapshot version '{}' ({}), reading it as 0", raw, e);
                Ok(0)
            }
        }
    }

    /// Write the full catalog and bump the snapshot counter.
    ///
    /// With `expected` set, the write is refused when the stored counter no
    /// longer matches it. The counter is written before the catalog, so a
    /// failed write never leaves a new catalog behind. Returns the new counter.
    pub fn save(&self, catalog: &Catalog, expected: Option<u64>) -> AppResult<u64> {
        let entries: Vec<&Entry> = catalog.values().collect();
        let raw = serde_json::to_string(&entries)?;

        let found = self.version()?;
        if let Some(expected) = expected {
            if found != expected {
                tracing::warn!(
                    "Refusing catalog write: snapshot version moved from {} to {}",
                    expected,
                    found
                );
                return Err(AppError::StaleSnapshot { expected, found });
            }
        }

        let next = found + 1;
        self.storage.set(VERSION_KEY, &next.to_string())?;
        self.storage.set(CATALOG_KEY, &raw)?;

        tracing::debug!("Saved catalog snapshot v{} with {} entries", next, entries.len());
        Ok(next)
    }
}
