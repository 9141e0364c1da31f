/// Shared application context
use crate::config::ConsoleConfig;
use crate::error::Result;
use crate::guard::RouteGuard;
use roster_client::{ApiClient, ClientConfig};
use roster_core::{KeyValueStore, User, UserApi, UserId, PAGE_SIZE};
use roster_storage::{MemoryStore, SessionStore, SqliteStore, UserCache};
use roster_sync::{Authenticator, DirectoryController, UserRepository};
use std::path::Path;
use std::sync::Arc;

/// Everything a command needs, built once at startup.
///
/// Owns the persisted state; the repository, authenticator and guard all
/// receive it from here.
#[derive(Clone)]
pub struct AppContext {
    pub session: SessionStore,
    pub auth: Arc<Authenticator>,
    pub repository: Arc<UserRepository>,
    pub guard: RouteGuard,
}

impl AppContext {
    /// Build the context from configuration: open (and migrate) the state
    /// database or fall back to memory, then wire the remote client.
    pub async fn build(config: &ConsoleConfig) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = if config.storage.ephemeral {
            tracing::info!("Using in-memory state");
            Arc::new(MemoryStore::new())
        } else {
            ensure_parent_dir(&config.storage.database_url).await?;
            let pool = roster_storage::create_pool(&config.storage.database_url).await?;
            roster_storage::run_migrations(&pool).await?;
            tracing::info!("State database ready");
            Arc::new(SqliteStore::new(pool))
        };

        let mut client_config =
            ClientConfig::new(config.api.base_url.clone()).with_timeout(config.api.timeout());
        if let Some(key) = &config.api.api_key {
            client_config = client_config.with_api_key(key.clone());
        }
        let api: Arc<dyn UserApi> = Arc::new(ApiClient::new(client_config)?);

        Self::from_parts(api, store).await
    }

    /// Assemble the context from an API implementation and a state store
    pub async fn from_parts(api: Arc<dyn UserApi>, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let session = SessionStore::new(Arc::clone(&store));
        let repository = UserRepository::open(Arc::clone(&api), UserCache::new(store)).await?;

        Ok(Self {
            auth: Arc::new(Authenticator::new(api, session.clone())),
            repository: Arc::new(repository),
            guard: RouteGuard::new(session.clone()),
            session,
        })
    }

    /// A fresh directory view controller over the repository
    pub fn directory(&self) -> DirectoryController {
        DirectoryController::new(self.repository.clone())
    }

    /// Page of the local snapshot that holds `id`, or the first page
    pub async fn page_holding(&self, id: UserId) -> u32 {
        self.repository
            .snapshot()
            .await
            .and_then(|users| users.iter().position(|u| u.id == id))
            .map_or(1, |index| (index / PAGE_SIZE) as u32 + 1)
    }

    /// The directory view as it looks on returning from editing `user`.
    ///
    /// Every run starts with an empty controller, so the page the user was
    /// browsing is loaded first; the edited record is then merged into it
    /// without a second fetch.
    pub async fn directory_after_edit(&self, user: User) -> DirectoryController {
        let mut directory = self.directory();
        directory.set_page(self.page_holding(user.id).await).await;
        directory.return_from_edit(user).await;
        directory
    }
}

/// Create the directory holding a file-backed `SQLite` database.
async fn ensure_parent_dir(database_url: &str) -> Result<()> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    let path = path.split('?').next().unwrap_or(path);

    if path.is_empty() || path == ":memory:" {
        return Ok(());
    }

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}
