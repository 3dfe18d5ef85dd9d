//! Route classification and the session guard.

pub mod guard;

pub use guard::{Access, GuardDecision, RedirectReason, Route, RouteGuard};
