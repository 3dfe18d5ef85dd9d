//! Session token lifecycle.
//!
//! The token is absent at startup unless a persisted one is restored, set
//! once per successful authentication, and cleared only on sign-out.

pub mod store;
pub mod token;

pub use store::SessionStore;
pub use token::{is_valid, is_valid_at};
