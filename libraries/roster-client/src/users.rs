//! User record endpoints.

use crate::client::{expect_success, read_json, send, ApiClient};
use crate::error::Result;
use crate::types::{UserEnvelope, UsersPageResponse};
use reqwest::Method;
use roster_core::{CreatedUser, NewUser, User, UserId, UserPage, UserPatch};
use tracing::debug;

/// Users client for the remote directory.
pub struct UsersClient<'a> {
    api: &'a ApiClient,
}

impl<'a> UsersClient<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Get one page of users, paged by the server.
    pub async fn list(&self, page: u32) -> Result<UserPage> {
        debug!(page, "Fetching users page");

        let response = send(
            self.api
                .request(Method::GET, "/users")
                .query(&[("page", page)]),
        )
        .await?;
        let body: UsersPageResponse = read_json(response, "users page").await?;

        debug!(
            page = body.page,
            count = body.data.len(),
            total = body.total,
            total_pages = body.total_pages,
            "Fetched users page"
        );

        Ok(body.into())
    }

    /// Get a single user by ID.
    pub async fn get(&self, id: UserId) -> Result<User> {
        debug!(user_id = %id, "Fetching user");

        let response = send(self.api.request(Method::GET, &format!("/users/{}", id))).await?;
        let body: UserEnvelope = read_json(response, "user").await?;

        Ok(body.data)
    }

    /// Create a user. The echoed record's `id` is whatever the server chose.
    pub async fn create(&self, user: &NewUser) -> Result<CreatedUser> {
        debug!(email = %user.email, "Creating user");

        let response = send(self.api.request(Method::POST, "/users").json(user)).await?;
        let created: CreatedUser = read_json(response, "created user").await?;

        debug!(remote_id = ?created.id, created_at = ?created.created_at, "User created remotely");
        Ok(created)
    }

    /// Send a partial update. The acknowledgement body is not used.
    pub async fn update(&self, id: UserId, patch: &UserPatch) -> Result<()> {
        debug!(user_id = %id, "Updating user");

        let response = send(
            self.api
                .request(Method::PUT, &format!("/users/{}", id))
                .json(patch),
        )
        .await?;
        expect_success(response).await
    }

    /// Delete a user.
    pub async fn delete(&self, id: UserId) -> Result<()> {
        debug!(user_id = %id, "Deleting user");

        let response = send(self.api.request(Method::DELETE, &format!("/users/{}", id))).await?;
        expect_success(response).await?;

        debug!(user_id = %id, "User deleted remotely");
        Ok(())
    }
}
