//! Navigation guard for protected views.
//!
//! The decision is recomputed from the session on every call. Nothing is
//! cached, so a token that expires or is cleared between two navigations is
//! caught on the second one.

use tracing::{debug, info};

use crate::error::{NotelyError, NotelyResult};
use crate::session::{token, SessionStore};

/// Whether a view needs a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
}

/// Navigation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    SignIn,
    SignUp,
    Dashboard,
    /// `/`, an alias for the dashboard.
    Root,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::SignIn => "/signin",
            Route::SignUp => "/signup",
            Route::Dashboard => "/dashboard",
            Route::Root => "/",
        }
    }

    /// Parse a path. Unknown paths are `None`.
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Route::Root),
            "/signin" => Some(Route::SignIn),
            "/signup" => Some(Route::SignUp),
            "/dashboard" => Some(Route::Dashboard),
            _ => None,
        }
    }

    /// Follow aliases to the view that is actually shown.
    pub fn resolve(self) -> Route {
        match self {
            Route::Root => Route::Dashboard,
            other => other,
        }
    }

    pub fn access(&self) -> Access {
        match self.resolve() {
            Route::Dashboard => Access::Protected,
            _ => Access::Public,
        }
    }
}

/// Why a navigation was redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// No token is held.
    NoSession,
    /// A token is held but is malformed or expired.
    SessionExpired,
}

/// Outcome of a navigation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show `route` (aliases already resolved).
    Allow { route: Route },
    /// Go to `to` instead.
    Redirect { to: Route, reason: RedirectReason },
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow { .. })
    }
}

/// Decides whether the current session may reach a route.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: SessionStore,
}

impl RouteGuard {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    /// Check a navigation against the current time.
    pub fn check(&self, route: Route) -> GuardDecision {
        self.check_at(route, chrono::Utc::now().timestamp())
    }

    /// Check a navigation as if the clock read `now` (Unix seconds).
    pub fn check_at(&self, route: Route, now: i64) -> GuardDecision {
        let target = route.resolve();
        if target.access() == Access::Public {
            return GuardDecision::Allow { route: target };
        }

        match self.session.get() {
            None => {
                debug!("No session, redirecting {} to sign-in", target.path());
                GuardDecision::Redirect {
                    to: Route::SignIn,
                    reason: RedirectReason::NoSession,
                }
            }
            Some(token) if !token::is_valid_at(&token, now) => {
                info!("Session expired, redirecting {} to sign-in", target.path());
                GuardDecision::Redirect {
                    to: Route::SignIn,
                    reason: RedirectReason::SessionExpired,
                }
            }
            Some(_) => GuardDecision::Allow { route: target },
        }
    }

    /// Error form of [`check`](Self::check) for callers that are about to
    /// issue authenticated requests.
    pub fn require(&self, route: Route) -> NotelyResult<Route> {
        match self.check(route) {
            GuardDecision::Allow { route } => Ok(route),
            GuardDecision::Redirect { .. } => Err(NotelyError::SessionExpired),
        }
    }
}
