//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST, PUT, DELETE)
//! - [`SessionStorage`] - Durable slot for the session token

pub mod http;
pub mod session_storage;

pub use http::{Headers, HttpClient, HttpError, Response};
pub use session_storage::{SessionStorage, SessionStorageError, SESSION_TOKEN_KEY};
