/// Core traits for Roster
use crate::error::Result;
use crate::types::{CreatedUser, Credentials, NewUser, SessionToken, User, UserId, UserPage, UserPatch};
use async_trait::async_trait;

/// Remote user directory
///
/// Implementers talk to the authoritative directory service. Every failure is
/// already converted to a single human-readable message (`Auth` for the auth
/// endpoints, `Network` for everything else); callers show it and move on.
#[async_trait]
pub trait UserApi: Send + Sync {
    /// Register a new account and return its session token
    async fn register(&self, credentials: &Credentials) -> Result<SessionToken>;

    /// Log in and return a session token
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken>;

    /// Fetch one page of users as paged by the remote
    async fn list_users(&self, page: u32) -> Result<UserPage>;

    /// Fetch a single user
    async fn get_user(&self, id: UserId) -> Result<User>;

    /// Create a user; the remote's identifier in the response is not stable
    async fn create_user(&self, user: &NewUser) -> Result<CreatedUser>;

    /// Send a partial update; the remote acknowledgement carries nothing we keep
    async fn update_user(&self, id: UserId, patch: &UserPatch) -> Result<()>;

    /// Delete a user
    async fn delete_user(&self, id: UserId) -> Result<()>;
}

/// String-valued persisted state
///
/// Values survive restarts when backed by durable storage. Keys are flat
/// strings such as `token` and `users`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key was never set or was removed
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace a value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value; removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}
