//! Roster Console Library
//!
//! Terminal front end for the user directory: configuration, the application
//! context that owns persisted state, route resolution behind the session
//! guard, and plain-text views.
//!
//! This library exposes the components the `roster` binary is assembled from.

pub mod config;
pub mod error;
pub mod guard;
pub mod routes;
pub mod state;
pub mod views;

// Re-export commonly used types for convenience
pub use config::{ApiSettings, ConsoleConfig, StorageSettings};
pub use error::{ConsoleError, Result};
pub use guard::{Navigation, RouteGuard};
pub use routes::Route;
pub use state::AppContext;
