//! In-memory session storage for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::traits::{SessionStorage, SessionStorageError};

/// In-memory [`SessionStorage`] with injectable failures.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStorage {
    token: Arc<Mutex<Option<String>>>,
    save_should_fail: Arc<Mutex<bool>>,
    load_should_fail: Arc<Mutex<bool>>,
}

impl InMemorySessionStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage that already holds `token`.
    pub fn with_token(token: &str) -> Self {
        let storage = Self::default();
        storage.set_token(Some(token.to_string()));
        storage
    }

    /// Configure whether save should fail.
    pub fn set_save_should_fail(&self, should_fail: bool) {
        *self.save_should_fail.lock().unwrap() = should_fail;
    }

    /// Configure whether load should fail.
    pub fn set_load_should_fail(&self, should_fail: bool) {
        *self.load_should_fail.lock().unwrap() = should_fail;
    }

    /// Current slot contents, read synchronously.
    pub fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    /// Overwrite the slot synchronously.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.lock().unwrap() = token;
    }
}

#[async_trait]
impl SessionStorage for InMemorySessionStorage {
    async fn load(&self) -> Result<Option<String>, SessionStorageError> {
        if *self.load_should_fail.lock().unwrap() {
            return Err(SessionStorageError::LoadFailed(
                "Mock load failure".to_string(),
            ));
        }
        Ok(self.token())
    }

    async fn save(&self, token: &str) -> Result<(), SessionStorageError> {
        if *self.save_should_fail.lock().unwrap() {
            return Err(SessionStorageError::SaveFailed(
                "Mock save failure".to_string(),
            ));
        }
        self.set_token(Some(token.to_string()));
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionStorageError> {
        self.set_token(None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_load_clear() {
        let storage = InMemorySessionStorage::new();
        assert!(storage.load().await.unwrap().is_none());

        storage.save("t1").await.unwrap();
        assert_eq!(storage.load().await.unwrap(), Some("t1".to_string()));

        storage.clear().await.unwrap();
        assert!(storage.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let storage = InMemorySessionStorage::with_token("t1");
        storage.set_load_should_fail(true);
        storage.set_save_should_fail(true);

        assert!(matches!(
            storage.load().await,
            Err(SessionStorageError::LoadFailed(_))
        ));
        assert!(matches!(
            storage.save("t2").await,
            Err(SessionStorageError::SaveFailed(_))
        ));
        assert_eq!(storage.token(), Some("t1".to_string()));
    }
}
