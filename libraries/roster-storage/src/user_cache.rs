//! Local snapshot of the user directory.
//!
//! The snapshot is a JSON array of `User` records in collection order. Once
//! written it is the source of truth for reads; nothing here expires it.

use roster_core::{KeyValueStore, Result, User};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::StorageError;

/// Key holding the serialized snapshot
pub const USERS_KEY: &str = "users";

/// Typed access to the persisted user snapshot
#[derive(Clone)]
pub struct UserCache {
    store: Arc<dyn KeyValueStore>,
}

impl UserCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the snapshot.
    ///
    /// Returns `Ok(None)` when no snapshot was ever written. A snapshot that
    /// no longer parses is logged and reported as absent.
    pub async fn load(&self) -> Result<Option<Vec<User>>> {
        let Some(raw) = self.store.get(USERS_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<Vec<User>>(&raw) {
            Ok(users) => {
                debug!(count = users.len(), "Loaded user snapshot");
                Ok(Some(users))
            }
            Err(e) => {
                warn!(error = %e, "Discarding unreadable user snapshot");
                Ok(None)
            }
        }
    }

    /// Replace the snapshot
    pub async fn store(&self, users: &[User]) -> Result<()> {
        let raw = serde_json::to_string(users).map_err(StorageError::from)?;
        self.store.set(USERS_KEY, &raw).await?;
        debug!(count = users.len(), "Stored user snapshot");
        Ok(())
    }

    /// Drop the snapshot entirely
    pub async fn clear(&self) -> Result<()> {
        self.store.remove(USERS_KEY).await
    }
}
