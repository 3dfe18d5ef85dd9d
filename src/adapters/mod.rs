//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`FileSessionStorage`] - File-based session token slot
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Scripted HTTP responses
//! - [`mock::InMemorySessionStorage`] - In-memory token slot

pub mod file_session;
pub mod mock;
pub mod reqwest_http;

pub use file_session::FileSessionStorage;
pub use mock::{InMemorySessionStorage, MockHttpClient, MockResponse};
pub use reqwest_http::ReqwestHttpClient;
