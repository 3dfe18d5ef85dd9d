//! File-based session storage adapter.
//!
//! The token is kept in a small JSON document, `{"token": "..."}`, by default
//! at `~/.notely/session.json`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::traits::{SessionStorage, SessionStorageError, SESSION_TOKEN_KEY};

/// The session directory name.
const SESSION_DIR: &str = ".notely";

/// The session file name.
const SESSION_FILE: &str = "session.json";

/// File-backed [`SessionStorage`].
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    /// Storage at the default location under the home directory.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn new() -> Option<Self> {
        Self::default_path().map(Self::with_path)
    }

    /// Storage at an explicit file path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// `~/.notely/session.json`, if a home directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(SESSION_DIR).join(SESSION_FILE))
    }

    /// Get the path to the session file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn load(&self) -> Result<Option<String>, SessionStorageError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SessionStorageError::LoadFailed(e.to_string())),
        };

        let value: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|e| SessionStorageError::Serialization(e.to_string()))?;

        Ok(value
            .get(SESSION_TOKEN_KEY)
            .and_then(|t| t.as_str())
            .filter(|t| !t.is_empty())
            .map(str::to_string))
    }

    async fn save(&self, token: &str) -> Result<(), SessionStorageError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SessionStorageError::SaveFailed(e.to_string()))?;
        }

        let mut doc = serde_json::Map::new();
        doc.insert(
            SESSION_TOKEN_KEY.to_string(),
            serde_json::Value::String(token.to_string()),
        );
        let json = serde_json::to_string_pretty(&doc)
            .map_err(|e| SessionStorageError::Serialization(e.to_string()))?;

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| SessionStorageError::SaveFailed(e.to_string()))
    }

    async fn clear(&self) -> Result<(), SessionStorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionStorageError::ClearFailed(e.to_string())),
        }
    }
}
