//! Roster Sync
//!
//! Client-side data synchronization for the user directory: reconciles the
//! remote paginated API with the local snapshot, and drives the paged
//! directory view on top of it.
//!
//! - [`UserRepository`] serves reads from the remote until a snapshot exists,
//!   then from the snapshot; writes always go to the remote first and are
//!   mirrored into the snapshot.
//! - [`Authenticator`] exchanges credentials for a session token and keeps
//!   the session store in step.
//! - [`DirectoryController`] owns the listing lifecycle of the directory view:
//!   page loads, merge-after-edit, and confirm-before-delete.

mod auth;
mod controller;
mod repository;

pub use auth::Authenticator;
pub use controller::{DirectoryController, LoadPhase, LoadTicket, UserDirectory};
pub use repository::{BackingKind, UserRepository};
