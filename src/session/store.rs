//! The process-wide session token holder.

use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

use super::token;
use crate::traits::SessionStorage;

/// Holds the current session token.
///
/// Cloning is cheap and every clone shares the same slot, so one store can be
/// handed to the guard, the request authorizer and the OTP engine. Writes are
/// an atomic replace of the whole slot. When a [`SessionStorage`] is attached,
/// `set` and `clear` are mirrored to it; persistence failures are logged and
/// never surface.
#[derive(Clone, Default)]
pub struct SessionStore {
    token: Arc<RwLock<Option<String>>>,
    storage: Option<Arc<dyn SessionStorage>>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("present", &self.get().is_some())
            .field("persistent", &self.storage.is_some())
            .finish()
    }
}

impl SessionStore {
    /// An empty, memory-only store.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty store that mirrors writes to `storage`.
    pub fn with_storage(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            token: Arc::new(RwLock::new(None)),
            storage: Some(storage),
        }
    }

    /// Build a store from the persisted slot.
    ///
    /// An unreadable slot starts the process signed out.
    pub async fn restore(storage: Arc<dyn SessionStorage>) -> Self {
        let store = Self::with_storage(storage.clone());
        match storage.load().await {
            Ok(Some(token)) => {
                debug!("Restored session token {}", token::redact(&token));
                store.replace(Some(token));
            }
            Ok(None) => debug!("No persisted session"),
            Err(e) => warn!("Could not read persisted session: {}", e),
        }
        store
    }

    /// The current token, if any.
    pub fn get(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Store `token`, replacing any prior value.
    pub async fn set(&self, token: impl Into<String>) {
        let token = token.into();
        info!("Session established ({})", token::redact(&token));
        self.replace(Some(token.clone()));

        if let Some(storage) = &self.storage {
            if let Err(e) = storage.save(&token).await {
                warn!("Failed to persist session: {}", e);
            }
        }
    }

    /// Remove the token.
    pub async fn clear(&self) {
        info!("Session cleared");
        self.replace(None);

        if let Some(storage) = &self.storage {
            if let Err(e) = storage.clear().await {
                warn!("Failed to clear persisted session: {}", e);
            }
        }
    }

    /// Token validity predicate. False for an absent or malformed token.
    pub fn is_valid(candidate: Option<&str>) -> bool {
        candidate.map(token::is_valid).unwrap_or(false)
    }

    /// True if a token is held and it is currently valid.
    pub fn is_authenticated(&self) -> bool {
        Self::is_valid(self.get().as_deref())
    }

    fn replace(&self, token: Option<String>) {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = token;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemorySessionStorage;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    fn token_expiring_in(secs: i64) -> String {
        let exp = chrono::Utc::now().timestamp() + secs;
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{}}}"#, exp));
        format!("eyJhbGciOiJIUzI1NiJ9.{}.sig", payload)
    }

    #[tokio::test]
    async fn test_set_get_clear() {
        let store = SessionStore::new();
        assert!(store.get().is_none());

        store.set("first").await;
        store.set("second").await;
        assert_eq!(store.get(), Some("second".to_string()));

        store.clear().await;
        assert!(store.get().is_none());
    }

    #[tokio::test]
    async fn test_clones_share_the_slot() {
        let store = SessionStore::new();
        let reader = store.clone();
        store.set("t").await;
        assert_eq!(reader.get(), Some("t".to_string()));
    }

    #[tokio::test]
    async fn test_is_authenticated_requires_valid_token() {
        let store = SessionStore::new();
        assert!(!store.is_authenticated());

        store.set("opaque-garbage").await;
        assert!(!store.is_authenticated());

        store.set(token_expiring_in(-60)).await;
        assert!(!store.is_authenticated());

        store.set(token_expiring_in(3600)).await;
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_is_valid_absent_is_false() {
        assert!(!SessionStore::is_valid(None));
    }

    #[tokio::test]
    async fn test_writes_are_persisted() {
        let storage = InMemorySessionStorage::new();
        let store = SessionStore::with_storage(Arc::new(storage.clone()));

        store.set("persisted").await;
        assert_eq!(storage.token(), Some("persisted".to_string()));

        store.clear().await;
        assert_eq!(storage.token(), None);
    }

    #[tokio::test]
    async fn test_persist_failure_keeps_memory_session() {
        let storage = InMemorySessionStorage::new();
        storage.set_save_should_fail(true);
        let store = SessionStore::with_storage(Arc::new(storage.clone()));

        store.set("t").await;
        assert_eq!(store.get(), Some("t".to_string()));
        assert_eq!(storage.token(), None);
    }

    #[tokio::test]
    async fn test_restore_reads_slot() {
        let storage = InMemorySessionStorage::with_token("saved");
        let store = SessionStore::restore(Arc::new(storage)).await;
        assert_eq!(store.get(), Some("saved".to_string()));
    }

    #[tokio::test]
    async fn test_restore_with_unreadable_slot_starts_signed_out() {
        let storage = InMemorySessionStorage::with_token("saved");
        storage.set_load_should_fail(true);
        let store = SessionStore::restore(Arc::new(storage)).await;
        assert!(store.get().is_none());
    }
}
