//! Roster Directory Client
//!
//! HTTP client library for the remote user directory API.
//!
//! # Features
//!
//! - **Authentication**: Register and log in with email/password, receive a session token
//! - **Users**: List pages, fetch, create, update, and delete user records
//! - **Error conversion**: every failure becomes a single human-readable message
//!   through the `roster_core::UserApi` implementation
//!
//! # Example
//!
//! ```ignore
//! use roster_client::{ApiClient, ClientConfig};
//! use roster_core::{Credentials, UserApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(ClientConfig::new("https://reqres.in/api"))?;
//!
//!     let token = client
//!         .login(&Credentials::new("eve.holt@reqres.in", "cityslicka"))
//!         .await?;
//!
//!     let page = client.list_users(1).await?;
//!     println!("Page 1 of {}: {} users", page.total_pages, page.users.len());
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod client;
mod error;
mod types;
mod users;

// Re-export main types
pub use client::ApiClient;
pub use error::{ClientError, Result};
pub use types::{ApiErrorBody, ClientConfig, TokenResponse, UserEnvelope, UsersPageResponse};

// Re-export sub-clients for direct use if needed
pub use auth::AuthClient;
pub use users::UsersClient;
