//! Listing lifecycle of the directory view.
//!
//! A page load moves `Idle -> Loading -> Loaded | Errored`. Loads are
//! ticketed: when a newer load has started, the result of an older one is
//! dropped instead of overwriting the visible list.

use async_trait::async_trait;
use roster_core::{Result, User, UserId, UserPage};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::repository::UserRepository;

const FETCH_FAILED: &str = "Failed to fetch users";
const DELETE_FAILED: &str = "Failed to delete user";

/// What the directory view needs from the data layer
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// One page of users
    async fn list(&self, page: u32) -> Result<UserPage>;

    /// Delete a user
    async fn delete(&self, id: UserId) -> Result<()>;
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn list(&self, page: u32) -> Result<UserPage> {
        UserRepository::list(self, page).await
    }

    async fn delete(&self, id: UserId) -> Result<()> {
        UserRepository::delete(self, id).await
    }
}

/// State of the current page load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// Identifies one page load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    page: u32,
}

impl LoadTicket {
    pub fn page(&self) -> u32 {
        self.page
    }
}

/// Drives the paged directory view.
pub struct DirectoryController {
    directory: Arc<dyn UserDirectory>,
    users: Vec<User>,
    page: u32,
    total_pages: u32,
    phase: LoadPhase,
    error: Option<String>,
    pending_delete: Option<UserId>,
    updated_user: Option<User>,
    generation: u64,
}

impl DirectoryController {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            directory,
            users: Vec::new(),
            page: 1,
            total_pages: 1,
            phase: LoadPhase::Idle,
            error: None,
            pending_delete: None,
            updated_user: None,
            generation: 0,
        }
    }

    /// Visible records
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    /// Most recent failure, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Record awaiting delete confirmation
    pub fn pending_delete(&self) -> Option<UserId> {
        self.pending_delete
    }

    /// Switch to `page` and load it.
    pub async fn set_page(&mut self, page: u32) {
        let ticket = self.begin_load(page);
        let result = self.directory.list(page).await;
        self.finish_load(ticket, result);
    }

    /// Reload the current page
    pub async fn reload(&mut self) {
        self.set_page(self.page).await;
    }

    /// Enter the view: apply a carried edit if there is one, else load the
    /// current page.
    pub async fn show(&mut self) {
        if let Some(user) = self.updated_user.take() {
            self.phase = LoadPhase::Loading;
            self.merge(user);
            self.phase = LoadPhase::Loaded;
        } else {
            self.reload().await;
        }
    }

    /// Carry an edited record back to the view; the next `show` merges it
    /// instead of fetching.
    pub fn carry_updated(&mut self, user: User) {
        self.updated_user = Some(user);
    }

    /// Navigate back from the edit view with the edited record.
    pub async fn return_from_edit(&mut self, user: User) {
        self.carry_updated(user);
        self.show().await;
    }

    /// Start loading `page`. Any earlier load still in flight becomes stale.
    pub fn begin_load(&mut self, page: u32) -> LoadTicket {
        self.generation += 1;
        self.page = page;
        self.phase = LoadPhase::Loading;
        debug!(page, generation = self.generation, "Loading directory page");
        LoadTicket {
            generation: self.generation,
            page,
        }
    }

    /// Apply the result of a load. Returns `false` when the ticket was
    /// superseded and the result was dropped.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<UserPage>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                page = ticket.page,
                generation = ticket.generation,
                current = self.generation,
                "Dropping stale page load"
            );
            return false;
        }

        match result {
            Ok(page) => {
                self.users = page.users;
                self.total_pages = page.total_pages;
                self.phase = LoadPhase::Loaded;
            }
            Err(e) => {
                warn!(page = ticket.page, error = %e, "Page load failed");
                self.error = Some(FETCH_FAILED.to_string());
                self.phase = LoadPhase::Errored;
            }
        }
        true
    }

    /// Ask for confirmation before deleting `id`.
    pub fn request_delete(&mut self, id: UserId) {
        self.pending_delete = Some(id);
    }

    /// Abandon the pending delete
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Execute the pending delete.
    ///
    /// Returns the deleted id, or `None` when nothing was pending or the
    /// delete failed. Either way the marker is cleared.
    pub async fn confirm_delete(&mut self) -> Option<UserId> {
        let id = self.pending_delete.take()?;

        match self.directory.delete(id).await {
            Ok(()) => {
                self.users.retain(|u| u.id != id);
                Some(id)
            }
            Err(e) => {
                warn!(user_id = %id, error = %e, "Delete failed");
                self.error = Some(DELETE_FAILED.to_string());
                None
            }
        }
    }

    /// Forget the last error
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    fn merge(&mut self, updated: User) {
        match self.users.iter_mut().find(|u| u.id == updated.id) {
            Some(user) => *user = updated,
            None => debug!(user_id = %updated.id, "Edited user is not on the visible page"),
        }
    }
}
