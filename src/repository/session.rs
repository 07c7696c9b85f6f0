//! Active-user persistence

use std::sync::Arc;

use super::{KeyValueStorage, USER_KEY};
use crate::error::AppResult;

#[derive(Clone)]
pub struct SessionRepository {
    storage: Arc<dyn KeyValueStorage>,
}

impl SessionRepository {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Get the persisted active user, ignoring blank values
    pub fn load_user(&self) -> AppResult<Option<String>> {
        Ok(self
            .storage
            .get(USER_KEY)?
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty()))
    }

    pub fn save_user(&self, user: &str) -> AppResult<()> {
        self.storage.set(USER_KEY, user)
    }
}
