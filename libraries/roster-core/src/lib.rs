//! Roster Core
//!
//! Platform-agnostic types, traits, and error handling for the Roster
//! user directory console.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `NewUser`, `UserPatch`, `UserPage`, `SessionToken`
//! - **Core Traits**: `UserApi` (remote directory), `KeyValueStore` (persisted state)
//! - **Paging**: fixed page size and slice arithmetic shared by every backing
//! - **Error Handling**: Unified `RosterError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use roster_core::{NewUser, UserId, UserPage, User};
//!
//! let draft = NewUser::new("Ada", "Lovelace", "ada@example.com");
//! let user = draft.into_user(UserId::new(1));
//! assert!(user.avatar.contains("Ada+Lovelace"));
//!
//! let page = UserPage::from_snapshot(&[user], 1).unwrap();
//! assert_eq!(page.total_pages, 1);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod pagination;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, RosterError};
pub use pagination::{page_slice, total_pages, BOOTSTRAP_PAGES, PAGE_SIZE};
pub use traits::{KeyValueStore, UserApi};
pub use types::{
    avatar_url, CreatedUser, Credentials, NewUser, SessionToken, User, UserId, UserPage,
    UserPatch,
};
