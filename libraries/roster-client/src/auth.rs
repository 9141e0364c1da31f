//! Authentication endpoints.

use crate::client::{read_json, send, ApiClient};
use crate::error::{ClientError, Result};
use crate::types::TokenResponse;
use reqwest::Method;
use roster_core::{Credentials, SessionToken};
use tracing::{debug, info, warn};

/// Authentication client for the remote directory.
pub struct AuthClient<'a> {
    api: &'a ApiClient,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Register a new account.
    ///
    /// Returns the session token on success.
    pub async fn register(&self, credentials: &Credentials) -> Result<SessionToken> {
        self.exchange("/register", credentials).await
    }

    /// Login with email and password.
    ///
    /// Returns the session token on success.
    pub async fn login(&self, credentials: &Credentials) -> Result<SessionToken> {
        self.exchange("/login", credentials).await
    }

    async fn exchange(&self, path: &str, credentials: &Credentials) -> Result<SessionToken> {
        debug!(path = %path, email = %credentials.email, "Requesting session token");

        let response = send(self.api.request(Method::POST, path).json(credentials)).await?;
        let body: TokenResponse = read_json(response, "auth response").await?;

        let Some(token) = body.token.and_then(|raw| SessionToken::new(raw).ok()) else {
            warn!(path = %path, "Auth response carried no token");
            return Err(ClientError::MissingToken);
        };

        info!(path = %path, email = %credentials.email, account_id = ?body.id, "Session token issued");
        Ok(token)
    }
}
