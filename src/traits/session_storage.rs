//! Durable storage for the session token.
//!
//! The session survives restarts by being written to a single key-value slot
//! (key [`SESSION_TOKEN_KEY`]). The slot is read once at process start to
//! rehydrate the [`SessionStore`](crate::session::SessionStore).

use async_trait::async_trait;

/// Fixed key under which the token is persisted.
pub const SESSION_TOKEN_KEY: &str = "token";

/// Session storage errors.
#[derive(Debug, Clone)]
pub enum SessionStorageError {
    /// Failed to load the slot
    LoadFailed(String),
    /// Failed to save the slot
    SaveFailed(String),
    /// Failed to clear the slot
    ClearFailed(String),
    /// Serialization/deserialization error
    Serialization(String),
}

impl std::fmt::Display for SessionStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStorageError::LoadFailed(msg) => write!(f, "Failed to load session: {}", msg),
            SessionStorageError::SaveFailed(msg) => write!(f, "Failed to save session: {}", msg),
            SessionStorageError::ClearFailed(msg) => {
                write!(f, "Failed to clear session: {}", msg)
            }
            SessionStorageError::Serialization(msg) => {
                write!(f, "Session serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for SessionStorageError {}

/// Trait for the durable token slot.
///
/// Implementations include the file-backed production store and an in-memory
/// store for tests.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Read the persisted token.
    ///
    /// # Returns
    /// - `Ok(Some(token))` if a token is persisted
    /// - `Ok(None)` if the slot is empty
    /// - `Err(error)` if reading failed
    async fn load(&self) -> Result<Option<String>, SessionStorageError>;

    /// Persist the token, replacing any previous value.
    async fn save(&self, token: &str) -> Result<(), SessionStorageError>;

    /// Empty the slot.
    async fn clear(&self) -> Result<(), SessionStorageError>;
}
