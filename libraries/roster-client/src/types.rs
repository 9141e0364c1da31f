//! Types for the remote directory API requests and responses.

use roster_core::{User, UserPage};
use serde::Deserialize;
use std::time::Duration;

/// Configuration for connecting to the remote directory.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "https://reqres.in/api")
    pub url: String,
    /// Value for the `x-api-key` header, when the deployment requires one
    pub api_key: Option<String>,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Send an API key with every request.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// =============================================================================
// Authentication Types
// =============================================================================

/// Response from the register and login endpoints.
///
/// The token is optional on the wire; its absence is an auth failure.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub token: Option<String>,
    /// Account id, only sent by register; logged, never interpreted
    #[serde(default)]
    pub id: Option<serde_json::Value>,
}

// =============================================================================
// User Types
// =============================================================================

/// `GET /users?page=N`
#[derive(Debug, Deserialize)]
pub struct UsersPageResponse {
    pub data: Vec<User>,
    pub page: u32,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: u32,
}

impl From<UsersPageResponse> for UserPage {
    fn from(response: UsersPageResponse) -> Self {
        Self {
            users: response.data,
            page: response.page,
            per_page: response.per_page,
            total: response.total,
            total_pages: response.total_pages,
        }
    }
}

/// `GET /users/{id}`
#[derive(Debug, Deserialize)]
pub struct UserEnvelope {
    pub data: User,
}

// =============================================================================
// Error Types
// =============================================================================

/// Error body sent by the server, e.g. `{"error": "Missing password"}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
