//! Session gate in front of the directory views.

use crate::routes::Route;
use roster_core::Result;
use roster_storage::SessionStore;
use tracing::debug;

/// Outcome of a navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Show the requested view
    Render(Route),
    /// Show another view instead
    Redirect(Route),
}

impl Navigation {
    /// The view that ends up on screen
    pub fn route(&self) -> Route {
        match self {
            Self::Render(route) | Self::Redirect(route) => *route,
        }
    }
}

/// Redirects protected views to the entry view when no session token is
/// stored. A present token authorizes; it is never checked with the remote.
#[derive(Clone)]
pub struct RouteGuard {
    session: SessionStore,
}

impl RouteGuard {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    /// Resolve `path` and apply the session check.
    ///
    /// Paths that resolve to the entry view without naming it (`/`, unknown
    /// paths) are reported as redirects.
    pub async fn navigate(&self, path: &str) -> Result<Navigation> {
        let route = Route::from_path(path);

        if route == Route::Entry && route.path() != path.trim() {
            debug!(path, "Unknown path; redirecting to entry");
            return Ok(Navigation::Redirect(Route::Entry));
        }

        self.check(route).await
    }

    /// Apply the session check to an already resolved route
    pub async fn check(&self, route: Route) -> Result<Navigation> {
        if route.is_protected() && !self.session.is_authenticated().await? {
            debug!(route = %route, "No session; redirecting to entry");
            return Ok(Navigation::Redirect(Route::Entry));
        }
        Ok(Navigation::Render(route))
    }
}
