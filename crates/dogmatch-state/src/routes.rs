//! View routing and the authentication guard

use dogmatch_core::Session;
use std::fmt;

/// Views of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Login view, `/`
    Login,
    /// Dog search view, `/search`
    Search,
    /// Match result view, `/match`
    Match,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Search => "/search",
            Route::Match => "/match",
        }
    }

    /// Map a path to its view; nested paths belong to their top-level view
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Some(Route::Login);
        }

        [Route::Search, Route::Match].into_iter().find(|route| {
            trimmed == route.path()
                || trimmed
                    .strip_prefix(route.path())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    /// Whether the view requires a session
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Search | Route::Match)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// The view actually shown when `requested` is entered with `session`
///
/// Protected views fall back to the login view without a session; the login
/// view forwards to search when already logged in. Re-evaluate whenever the
/// session changes.
pub fn resolve_route(requested: Route, session: Option<&Session>) -> Route {
    match (requested, session) {
        (route, None) if route.is_protected() => Route::Login,
        (Route::Login, Some(session)) if session.is_logged_in => Route::Search,
        (route, _) => route,
    }
}
