//! Lending library service: catalog lifecycle, checkout ledger and views

use chrono::Utc;
use snowflaked::Generator;

use crate::{
    config::{AppConfig, LibraryConfig},
    error::{AppError, AppResult},
    models::{
        seed::sample_entries, Catalog, CheckoutRecord, Entry, EntryDraft, EntryId, LibraryStats,
        ListFilter,
    },
    repository::Repository,
};

/// Snowflake instance ids are 10 bits wide
const INSTANCE_MASK: u16 = 0x3FF;

/// One session's view of the shared library.
///
/// Every command checks all of its preconditions first, then writes the
/// staged catalog to storage, and only then replaces the in-memory catalog.
/// A rejected command or a failed write leaves both untouched.
pub struct LibraryStore {
    repository: Repository,
    config: LibraryConfig,
    catalog: Catalog,
    active_user: Option<String>,
    snapshot_version: u64,
    loaded: bool,
    ids: Generator,
}

impl LibraryStore {
    pub fn new(repository: Repository, config: LibraryConfig) -> Self {
        Self {
            repository,
            config,
            catalog: Catalog::new(),
            active_user: None,
            snapshot_version: 0,
            loaded: false,
            ids: Generator::new(rand::random::<u16>() & INSTANCE_MASK),
        }
    }

    /// Open the configured storage and load the library
    pub fn open(config: &AppConfig) -> AppResult<Self> {
        let repository = Repository::from_config(&config.storage)?;
        let mut store = Self::new(repository, config.library.clone());
        store.initialize()?;
        Ok(store)
    }

    /// Load the catalog and the active user from storage.
    ///
    /// Seeds the sample catalog when nothing is stored, and reseeds when the
    /// stored snapshot cannot be read. Does nothing once loaded.
    pub fn initialize(&mut self) -> AppResult<()> {
        if self.loaded {
            return Ok(());
        }

        match self.repository.catalog.load() {
            Ok(Some(catalog)) => {
                let version = self.repository.catalog.version().unwrap_or_else(|e| {
                    tracing::warn!("Snapshot version unreadable ({}), reading it as 0", e);
                    0
                });
                tracing::info!("Library loaded: {} entries (snapshot v{})", catalog.len(), version);
                self.catalog = catalog;
                self.snapshot_version = version;
            }
            Ok(None) => {
                tracing::info!("No library snapshot found, seeding sample catalog");
                self.reseed(self.config.seed_when_empty)?;
            }
            Err(e) => {
                tracing::warn!("Library snapshot unreadable ({}), reseeding sample catalog", e);
                self.reseed(true)?;
            }
        }

        self.active_user = match self.repository.session.load_user() {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("Stored active user unreadable: {}", e);
                None
            }
        };

        self.loaded = true;
        Ok(())
    }

    /// Drop in-memory state and load again, picking up other sessions' writes
    pub fn reload(&mut self) -> AppResult<()> {
        self.loaded = false;
        self.catalog.clear();
        self.active_user = None;
        self.initialize()
    }

    /// Replace the stored catalog with the samples, or with nothing
    fn reseed(&mut self, with_samples: bool) -> AppResult<()> {
        let catalog: Catalog = if with_samples {
            sample_entries().into_iter().map(|e| (e.id(), e)).collect()
        } else {
            Catalog::new()
        };
        self.snapshot_version = self.repository.catalog.save(&catalog, None)?;
        self.catalog = catalog;
        Ok(())
    }

    /// Set the identity every following command acts as
    pub fn set_active_user(&mut self, name: &str) -> AppResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("User name must not be blank".to_string()));
        }
        self.repository.session.save_user(name)?;
        self.active_user = Some(name.to_string());
        tracing::info!("Active user set to {}", name);
        Ok(())
    }

    pub fn active_user(&self) -> Option<&str> {
        self.active_user.as_deref()
    }

    fn require_user(&self) -> AppResult<String> {
        self.active_user
            .clone()
            .ok_or_else(|| AppError::Validation("No active user".to_string()))
    }

    fn find(&self, id: EntryId) -> AppResult<&Entry> {
        self.catalog
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Entry with id {} not found", id)))
    }

    /// Persist the staged catalog, then adopt it
    fn commit(&mut self, next: Catalog) -> AppResult<()> {
        let expected = self.config.guard_writes.then_some(self.snapshot_version);
        self.snapshot_version = self.repository.catalog.save(&next, expected)?;
        self.catalog = next;
        Ok(())
    }

    fn next_id(&mut self) -> EntryId {
        loop {
            let id = EntryId(self.ids.generate());
            if !self.catalog.contains_key(&id) {
                return id;
            }
        }
    }

    /// Share a new entry; it goes to the front of the catalog
    pub fn create_entry(&mut self, draft: EntryDraft) -> AppResult<Entry> {
        self.initialize()?;
        let author = self.require_user()?;
        if draft.title.trim().is_empty() {
            return Err(AppError::Validation("Title must not be blank".to_string()));
        }

        let entry = Entry::new(self.next_id(), author, draft);

        let mut next = Catalog::with_capacity(self.catalog.len() + 1);
        next.insert(entry.id(), entry.clone());
        next.extend(self.catalog.iter().map(|(id, e)| (*id, e.clone())));
        self.commit(next)?;

        tracing::info!("Entry {} '{}' created by {}", entry.id(), entry.title, entry.author());
        Ok(entry)
    }

    /// Check an entry out to the active user
    pub fn check_out(&mut self, id: EntryId) -> AppResult<Entry> {
        self.initialize()?;
        let entry = self.find(id)?;
        let reader = self.require_user()?;

        if entry.is_authored_by(&reader) {
            return Err(AppError::Forbidden(format!(
                "Entry {} is your own and cannot be checked out",
                id
            )));
        }
        if let Some(current) = entry.current_reader() {
            return Err(AppError::Conflict(format!(
                "Entry {} is already checked out by {}",
                id, current
            )));
        }

        let mut next = self.catalog.clone();
        let updated = match next.get_mut(&id) {
            Some(entry) => {
                entry.lend_to(&reader, Utc::now());
                entry.clone()
            }
            None => return Err(AppError::NotFound(format!("Entry with id {} not found", id))),
        };
        self.commit(next)?;

        tracing::info!("Entry {} checked out by {} (read {} times)", id, reader, updated.read_count());
        Ok(updated)
    }

    /// Return an entry the active user is reading
    pub fn return_entry(&mut self, id: EntryId) -> AppResult<Entry> {
        self.initialize()?;
        let entry = self.find(id)?;
        let user = self.require_user()?;

        match entry.current_reader() {
            None => {
                return Err(AppError::Conflict(format!("Entry {} is not checked out", id)));
            }
            Some(reader) if reader != user => {
                return Err(AppError::Forbidden(format!(
                    "Entry {} is checked out by {}, not {}",
                    id, reader, user
                )));
            }
            Some(_) => {}
        }

        let mut next = self.catalog.clone();
        let updated = match next.get_mut(&id) {
            Some(entry) => {
                entry.take_back();
                entry.clone()
            }
            None => return Err(AppError::NotFound(format!("Entry with id {} not found", id))),
        };
        self.commit(next)?;

        tracing::info!("Entry {} returned by {}", id, user);
        Ok(updated)
    }

    /// Delete an entry the active user authored.
    ///
    /// Entries on loan to someone else are deleted all the same; the loan and
    /// its ledger go with the entry.
    pub fn delete_entry(&mut self, id: EntryId) -> AppResult<Entry> {
        self.initialize()?;
        let entry = self.find(id)?;
        let user = self.require_user()?;

        if !entry.is_authored_by(&user) {
            return Err(AppError::Forbidden(format!(
                "Only {} can delete entry {}",
                entry.author(),
                id
            )));
        }
        if let Some(reader) = entry.current_reader() {
            tracing::warn!("Deleting entry {} while it is checked out by {}", id, reader);
        }

        let mut next = self.catalog.clone();
        let removed = match next.shift_remove(&id) {
            Some(entry) => entry,
            None => return Err(AppError::NotFound(format!("Entry with id {} not found", id))),
        };
        self.commit(next)?;

        tracing::info!("Entry {} deleted by {}", id, user);
        Ok(removed)
    }

    /// Entries passing `filter` and matching `search`, newest first
    pub fn list(&self, filter: ListFilter, search: &str) -> Vec<&Entry> {
        let needle = search.trim().to_lowercase();
        let user = self.active_user.as_deref();

        self.catalog
            .values()
            .filter(|e| match filter {
                ListFilter::All => true,
                ListFilter::Mine => user.is_some_and(|u| e.is_authored_by(u)),
                ListFilter::CheckedOut => e.is_checked_out(),
                ListFilter::Available => !e.is_checked_out(),
            })
            .filter(|e| e.matches(&needle))
            .collect()
    }

    /// Entries the active user currently has checked out
    pub fn my_active_loans(&self) -> Vec<&Entry> {
        match self.active_user.as_deref() {
            Some(user) => self.catalog.values().filter(|e| e.is_read_by(user)).collect(),
            None => Vec::new(),
        }
    }

    pub fn get_entry(&self, id: EntryId) -> AppResult<&Entry> {
        self.find(id)
    }

    /// The last few checkouts of an entry, oldest first
    pub fn recent_readers(&self, id: EntryId) -> AppResult<&[CheckoutRecord]> {
        let history = self.find(id)?.checkout_history();
        let start = history.len().saturating_sub(self.config.recent_readers);
        Ok(&history[start..])
    }

    pub fn stats(&self) -> LibraryStats {
        let user = self.active_user.as_deref();
        let mut stats = LibraryStats {
            total: self.catalog.len(),
            ..Default::default()
        };
        for entry in self.catalog.values() {
            if entry.is_checked_out() {
                stats.checked_out += 1;
            } else {
                stats.available += 1;
            }
            if let Some(user) = user {
                if entry.is_authored_by(user) {
                    stats.authored_by_me += 1;
                }
                if entry.is_read_by(user) {
                    stats.reading_now += 1;
                }
            }
            stats.total_reads += entry.read_count();
        }
        stats
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn snapshot_version(&self) -> u64 {
        self.snapshot_version
    }
}
