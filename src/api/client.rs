//! Base HTTP client shared by the auth and notes APIs.
//!
//! [`ApiClient`] joins paths onto the configured base URL, encodes JSON
//! bodies, and asks the [`BearerAuthorizer`] for headers on every call. It
//! returns the raw [`Response`] so each service can classify statuses its own
//! way; only transport failures are mapped here.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::{NotelyError, NotelyResult};
use crate::session::SessionStore;
use crate::traits::{Headers, HttpClient, Response};

/// Attaches the current session token to outbound calls.
#[derive(Debug, Clone)]
pub struct BearerAuthorizer {
    session: SessionStore,
}

impl BearerAuthorizer {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    /// Headers for a JSON request, with `Authorization: Bearer <token>` when
    /// the store holds a token.
    ///
    /// The store is read on every call, so a token set or cleared between
    /// two requests is picked up immediately.
    pub fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        if let Some(token) = self.session.get() {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        headers
    }
}

/// JSON-over-HTTP client bound to one service base URL.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
    authorizer: BearerAuthorizer,
}

impl ApiClient {
    /// Create a client for `base_url`, authorizing from `session`.
    pub fn new(
        base_url: impl Into<String>,
        http: Arc<dyn HttpClient>,
        session: SessionStore,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http,
            authorizer: BearerAuthorizer::new(session),
        }
    }

    /// The base URL with no trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get(&self, path: &str) -> NotelyResult<Response> {
        let url = self.url(path);
        debug!("GET {}", url);
        Ok(self.http.get(&url, &self.authorizer.headers()).await?)
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> NotelyResult<Response> {
        let url = self.url(path);
        debug!("POST {}", url);
        let body = encode(body)?;
        Ok(self.http.post(&url, &body, &self.authorizer.headers()).await?)
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> NotelyResult<Response> {
        let url = self.url(path);
        debug!("PUT {}", url);
        let body = encode(body)?;
        Ok(self.http.put(&url, &body, &self.authorizer.headers()).await?)
    }

    pub async fn delete(&self, path: &str) -> NotelyResult<Response> {
        let url = self.url(path);
        debug!("DELETE {}", url);
        Ok(self.http.delete(&url, &self.authorizer.headers()).await?)
    }
}

/// Decode a success body, reporting an unreadable one as a transport error.
pub fn decode<T: DeserializeOwned>(response: &Response) -> NotelyResult<T> {
    response.json().map_err(|e| {
        let text = response.text().unwrap_or_default();
        NotelyError::Transport {
            status: Some(response.status),
            message: format!(
                "Invalid response format: {}. Response: {}",
                e,
                text.chars().take(200).collect::<String>()
            ),
        }
    })
}

/// A 5xx (or otherwise unexpected) status as a transport error.
pub fn transport_status(response: &Response) -> NotelyError {
    NotelyError::Transport {
        status: Some(response.status),
        message: response.error_message(),
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> NotelyResult<String> {
    serde_json::to_string(body)
        .map_err(|e| NotelyError::transport(format!("Failed to encode request: {}", e)))
}
