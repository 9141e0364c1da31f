//! Session token persistence.

use roster_core::{KeyValueStore, Result, SessionToken};
use std::sync::Arc;
use tracing::{debug, info};

/// Key holding the raw session token
pub const TOKEN_KEY: &str = "token";

/// Process-wide session state.
///
/// Written on successful login or registration, read on every protected
/// navigation, cleared only by an explicit logout.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persist a freshly issued token, replacing any previous one
    pub async fn save(&self, token: &SessionToken) -> Result<()> {
        self.store.set(TOKEN_KEY, token.as_str()).await?;
        info!("Session token saved");
        Ok(())
    }

    /// Current token, if any. A stored empty value reads as absent.
    pub async fn read(&self) -> Result<Option<SessionToken>> {
        let raw = self.store.get(TOKEN_KEY).await?;
        Ok(raw.and_then(|raw| SessionToken::new(raw).ok()))
    }

    /// Forget the token (logout)
    pub async fn clear(&self) -> Result<()> {
        self.store.remove(TOKEN_KEY).await?;
        info!("Session token cleared");
        Ok(())
    }

    /// Whether a token is present. Presence alone authorizes.
    pub async fn is_authenticated(&self) -> Result<bool> {
        let present = self.read().await?.is_some();
        debug!(present, "Checked session token");
        Ok(present)
    }
}
