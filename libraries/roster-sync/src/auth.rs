//! Credential exchange and session bookkeeping.

use roster_core::{Credentials, Result, SessionToken, UserApi};
use roster_storage::SessionStore;
use std::sync::Arc;
use tracing::info;

/// Logs users in and out, keeping the session store current.
pub struct Authenticator {
    api: Arc<dyn UserApi>,
    session: SessionStore,
}

impl Authenticator {
    pub fn new(api: Arc<dyn UserApi>, session: SessionStore) -> Self {
        Self { api, session }
    }

    /// Create an account and start a session for it
    pub async fn register(&self, credentials: &Credentials) -> Result<SessionToken> {
        let token = self.api.register(credentials).await?;
        self.session.save(&token).await?;
        info!(email = %credentials.email, "Registered");
        Ok(token)
    }

    /// Start a session
    pub async fn login(&self, credentials: &Credentials) -> Result<SessionToken> {
        let token = self.api.login(credentials).await?;
        self.session.save(&token).await?;
        info!(email = %credentials.email, "Logged in");
        Ok(token)
    }

    /// End the session. The local user snapshot is left alone.
    pub async fn logout(&self) -> Result<()> {
        self.session.clear().await
    }

    /// Whether a session token is present
    pub async fn is_authenticated(&self) -> Result<bool> {
        self.session.is_authenticated().await
    }
}
