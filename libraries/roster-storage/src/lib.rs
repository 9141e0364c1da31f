//! Roster Storage
//!
//! Persisted client state for Roster: the session token and the local
//! snapshot of the user directory.
//!
//! # Architecture
//!
//! - **Key-Value**: all state is string-valued under flat keys, mirroring
//!   browser local storage (`token`, `users`)
//! - **Backends**: `SqliteStore` for durable state, `MemoryStore` for tests
//!   and ephemeral runs; both implement `roster_core::KeyValueStore`
//! - **Typed views**: `SessionStore` and `UserCache` own the encoding of
//!   their key
//!
//! # Example
//!
//! ```rust,no_run
//! use roster_storage::{create_pool, run_migrations, SessionStore, SqliteStore};
//! use roster_core::SessionToken;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://roster.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = Arc::new(SqliteStore::new(pool));
//! let session = SessionStore::new(store);
//! session.save(&SessionToken::new("QpwL5tke4Pnpja7X4")?).await?;
//! assert!(session.is_authenticated().await?);
//! # Ok(())
//! # }
//! ```

mod error;
mod memory;
mod session;
mod sqlite;
mod user_cache;

pub use error::StorageError;
pub use memory::MemoryStore;
pub use session::{SessionStore, TOKEN_KEY};
pub use sqlite::SqliteStore;
pub use user_cache::{UserCache, USERS_KEY};

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://roster.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = %database_url, "Opening state database");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}
