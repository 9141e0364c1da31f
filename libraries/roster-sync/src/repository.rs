//! User repository over the remote directory and the local snapshot.
//!
//! Reads are served by one of two backings. `Remote` fetches pages from the
//! directory service; the first page-1 read also pulls the next page and
//! installs both as the local snapshot. From then on the repository is
//! `Cached`: pages are cut from the snapshot and no read reaches the remote
//! unless a lookup misses. There is no path back to `Remote`.
//!
//! Writes always reach the remote first. When a snapshot exists the write is
//! mirrored into it and persisted; persistence failures are logged and do not
//! fail the operation.

use roster_core::{
    NewUser, Result, RosterError, User, UserApi, UserId, UserPage, UserPatch, BOOTSTRAP_PAGES,
};
use roster_storage::UserCache;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// Which backing currently serves reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackingKind {
    /// No snapshot yet; reads go to the remote directory
    Remote,
    /// Reads are served from the local snapshot
    Cached,
}

enum Backing {
    Remote,
    Cached(Vec<User>),
}

impl Backing {
    fn kind(&self) -> BackingKind {
        match self {
            Self::Remote => BackingKind::Remote,
            Self::Cached(_) => BackingKind::Cached,
        }
    }
}

/// Paged access to the user directory with a local mirror.
pub struct UserRepository {
    api: Arc<dyn UserApi>,
    cache: UserCache,
    backing: RwLock<Backing>,
    bootstrap: Mutex<()>,
}

impl UserRepository {
    /// Open the repository, choosing the backing from the persisted snapshot.
    pub async fn open(api: Arc<dyn UserApi>, cache: UserCache) -> Result<Self> {
        let backing = match cache.load().await? {
            Some(users) => {
                debug!(count = users.len(), "Serving users from local snapshot");
                Backing::Cached(users)
            }
            None => {
                debug!("No local snapshot; serving users from remote");
                Backing::Remote
            }
        };

        Ok(Self {
            api,
            cache,
            backing: RwLock::new(backing),
            bootstrap: Mutex::new(()),
        })
    }

    /// Current backing
    pub async fn backing_kind(&self) -> BackingKind {
        self.backing.read().await.kind()
    }

    /// Copy of the local snapshot, if one exists
    pub async fn snapshot(&self) -> Option<Vec<User>> {
        match &*self.backing.read().await {
            Backing::Cached(users) => Some(users.clone()),
            Backing::Remote => None,
        }
    }

    /// One page of the directory.
    ///
    /// With a snapshot the page is cut locally with the fixed page size. Without
    /// one the remote page is returned as-is; reading page 1 also seeds the
    /// snapshot. Failing to fetch the extra bootstrap pages is not an error.
    pub async fn list(&self, page: u32) -> Result<UserPage> {
        if page == 0 {
            return Err(RosterError::invalid_input("page numbers start at 1"));
        }

        if let Some(cached) = self.cached_page(page).await {
            return cached;
        }
        if page != 1 {
            return self.api.list_users(page).await;
        }

        // One bootstrap at a time; a waiter finds the snapshot already installed
        let _bootstrap = self.bootstrap.lock().await;
        if let Some(cached) = self.cached_page(page).await {
            return cached;
        }

        let first = self.api.list_users(page).await?;
        self.bootstrap(&first).await;
        Ok(first)
    }

    async fn cached_page(&self, page: u32) -> Option<Result<UserPage>> {
        match &*self.backing.read().await {
            Backing::Cached(users) => {
                debug!(page, total = users.len(), "Listing users from snapshot");
                Some(UserPage::from_snapshot(users, page))
            }
            Backing::Remote => None,
        }
    }

    /// Pull the remaining bootstrap pages and install the merged snapshot.
    ///
    /// Callers hold the bootstrap lock.
    async fn bootstrap(&self, first: &UserPage) {
        let mut users = first.users.clone();
        let last_page = BOOTSTRAP_PAGES.min(first.total_pages.max(1));

        for page in 2..=last_page {
            match self.api.list_users(page).await {
                Ok(next) => users.extend(next.users),
                Err(e) => {
                    warn!(page, error = %e, "Bootstrap fetch failed; keeping remote backing");
                    return;
                }
            }
        }

        let mut backing = self.backing.write().await;
        self.persist(&users).await;
        info!(count = users.len(), pages = last_page, "Local snapshot bootstrapped");
        *backing = Backing::Cached(users);
    }

    /// A single user: snapshot first, remote on a miss.
    pub async fn get(&self, id: UserId) -> Result<User> {
        {
            let backing = self.backing.read().await;
            if let Backing::Cached(users) = &*backing {
                if let Some(user) = users.iter().find(|u| u.id == id) {
                    return Ok(user.clone());
                }
                debug!(user_id = %id, "User not in snapshot; asking remote");
            }
        }

        self.api.get_user(id).await
    }

    /// Create a user.
    ///
    /// The remote's id is ignored: the record gets one more than the largest
    /// id in the snapshot, or 1 when there is none. The record is appended to
    /// the snapshot, creating the snapshot if it did not exist yet. A create
    /// racing the first bootstrap waits for it and numbers after its records.
    pub async fn create(&self, new_user: NewUser) -> Result<User> {
        new_user.validate()?;
        let payload = new_user.with_derived_avatar();

        let created = self.api.create_user(&payload).await?;

        // Wait out an in-flight bootstrap so its records are not lost
        let _bootstrap = self.bootstrap.lock().await;
        let mut backing = self.backing.write().await;
        if let Backing::Remote = &*backing {
            info!("Starting local snapshot from a created user");
            *backing = Backing::Cached(Vec::new());
        }
        let Backing::Cached(users) = &mut *backing else {
            return Err(RosterError::storage("local snapshot unavailable"));
        };

        let user = created.into_user(next_id(users), payload);
        users.push(user.clone());
        self.persist(users).await;

        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Apply a partial update.
    ///
    /// Returns the submitted patch; the remote's acknowledgement is not merged
    /// back into the result.
    pub async fn update(&self, id: UserId, patch: UserPatch) -> Result<UserPatch> {
        patch.validate()?;

        self.api.update_user(id, &patch).await?;

        let mut backing = self.backing.write().await;
        if let Backing::Cached(users) = &mut *backing {
            match users.iter_mut().find(|u| u.id == id) {
                Some(user) => patch.apply_to(user),
                None => debug!(user_id = %id, "Updated user is not in snapshot"),
            }
            self.persist(users).await;
        }

        info!(user_id = %id, "User updated");
        Ok(patch)
    }

    /// Delete a user.
    pub async fn delete(&self, id: UserId) -> Result<()> {
        self.api.delete_user(id).await?;

        let mut backing = self.backing.write().await;
        if let Backing::Cached(users) = &mut *backing {
            users.retain(|u| u.id != id);
            self.persist(users).await;
        }

        info!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn persist(&self, users: &[User]) {
        if let Err(e) = self.cache.store(users).await {
            warn!(error = %e, "Failed to persist user snapshot");
        }
    }
}

/// Identifier for a record created locally
fn next_id(users: &[User]) -> UserId {
    users
        .iter()
        .map(|u| u.id)
        .max()
        .map_or(UserId::new(1), UserId::next)
}
