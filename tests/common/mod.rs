//! Common test utilities for integration tests.
//!
//! This module provides reusable fixtures: session tokens with chosen
//! expiries, note payloads in the service's wire shape, and builders for
//! clients pointed at a mock server.
//!
//! # Example
//!
//! ```ignore
//! use common::{valid_token, TestClientBuilder};
//!
//! let app = TestClientBuilder::new(&server.uri())
//!     .with_token(&valid_token())
//!     .build();
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use std::sync::Arc;

use notely::adapters::ReqwestHttpClient;
use notely::api::ApiClient;
use notely::config::ClientConfig;
use notely::notes::{NotesApi, NotesSync};
use notely::session::SessionStore;
use notely::traits::HttpClient;
use notely::Notely;

/// Builds a JWT-shaped token whose `exp` is `exp` (Unix seconds).
pub fn token_with_exp(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"id":"user-1","exp":{}}}"#, exp));
    format!("{}.{}.test-signature", header, payload)
}

/// A token that stays valid for the duration of a test run.
pub fn valid_token() -> String {
    token_with_exp(chrono::Utc::now().timestamp() + 3600)
}

/// A token that expired an hour ago.
pub fn expired_token() -> String {
    token_with_exp(chrono::Utc::now().timestamp() - 3600)
}

/// A note in the notes service's wire shape.
pub fn note_json(id: &str, content: &str) -> serde_json::Value {
    serde_json::json!({
        "_id": id,
        "content": content,
        "userId": "user-1",
        "createdAt": "2024-03-13T09:30:00.000Z"
    })
}

/// A `GET /notes` body.
pub fn notes_json(notes: &[(&str, &str)]) -> serde_json::Value {
    let notes: Vec<_> = notes.iter().map(|(id, c)| note_json(id, c)).collect();
    serde_json::json!({ "notes": notes })
}

/// Builder for [`Notely`] clients used in tests.
pub struct TestClientBuilder {
    base_url: String,
    http: Option<Arc<dyn HttpClient>>,
    token: Option<String>,
}

impl TestClientBuilder {
    /// Client for a service at `base_url`, reached with reqwest.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            http: None,
            token: None,
        }
    }

    /// Use a scripted transport instead of reqwest.
    pub fn with_mock(mut self, mock: &MockHttpClient) -> Self {
        self.http = Some(Arc::new(mock.clone()));
        self
    }

    /// Start with a token already in the session store.
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn build(self) -> Notely {
        let config = ClientConfig::default()
            .with_api_base_url(self.base_url)
            .without_session_persistence();
        let http = self
            .http
            .unwrap_or_else(|| Arc::new(ReqwestHttpClient::new()));

        let session = SessionStore::new();
        if let Some(token) = self.token {
            futures::executor::block_on(session.set(token));
        }
        Notely::with_parts(config, http, session)
    }
}

/// A bare sync engine over a scripted transport.
pub fn notes_sync(base_url: &str, mock: &MockHttpClient) -> NotesSync {
    let client = ApiClient::new(base_url, Arc::new(mock.clone()), SessionStore::new());
    NotesSync::new(NotesApi::new(client))
}
