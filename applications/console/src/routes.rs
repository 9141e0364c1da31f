//! Navigable views and their paths.

use roster_core::UserId;
use std::fmt;

/// A navigable view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Login form; also where every unknown path lands
    Entry,
    /// Registration form
    Register,
    /// Paged directory list
    Users,
    /// Edit form for one user
    EditUser(UserId),
    /// Create form
    AddUser,
}

impl Route {
    /// Resolve a path. `/`, unknown paths and malformed ids all resolve to
    /// [`Route::Entry`].
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim();
        let trimmed = trimmed.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(trimmed);

        match trimmed {
            "/login" => Self::Entry,
            "/signup" => Self::Register,
            "/users" => Self::Users,
            "/add-user" => Self::AddUser,
            other => other
                .strip_prefix("/edit/")
                .and_then(|id| id.parse::<UserId>().ok())
                .map_or(Self::Entry, Self::EditUser),
        }
    }

    /// Canonical path
    pub fn path(&self) -> String {
        match self {
            Self::Entry => "/login".to_string(),
            Self::Register => "/signup".to_string(),
            Self::Users => "/users".to_string(),
            Self::EditUser(id) => format!("/edit/{}", id),
            Self::AddUser => "/add-user".to_string(),
        }
    }

    /// Whether the route needs a session
    pub fn is_protected(&self) -> bool {
        matches!(self, Self::Users | Self::EditUser(_) | Self::AddUser)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
