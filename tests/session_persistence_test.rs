//! Session persistence across process restarts.

mod common;

use common::*;
use notely::adapters::FileSessionStorage;
use notely::config::ClientConfig;
use notely::session::SessionStore;
use notely::traits::SessionStorage;
use notely::Notely;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_token_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("notely").join("session.json");
    let token = valid_token();

    {
        let storage = FileSessionStorage::with_path(path.clone());
        let store = SessionStore::with_storage(Arc::new(storage));
        store.set(token.clone()).await;
    }

    let restored = SessionStore::restore(Arc::new(FileSessionStorage::with_path(path))).await;
    assert_eq!(restored.get(), Some(token));
    assert!(restored.is_authenticated());
}

#[tokio::test]
async fn test_sign_out_clears_persisted_slot() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("session.json");
    let storage = FileSessionStorage::with_path(path.clone());
    storage.save(&valid_token()).await.unwrap();

    let config = ClientConfig::default()
        .with_api_base_url("http://127.0.0.1:9")
        .with_session_path(&path);
    let app = Notely::from_config(config).await;
    assert!(app.is_authenticated());

    app.sign_out().await;
    assert!(!app.is_authenticated());
    assert!(!path.exists());

    let restored = SessionStore::restore(Arc::new(storage)).await;
    assert!(restored.get().is_none());
}

#[tokio::test]
async fn test_corrupt_slot_starts_signed_out() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("session.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = SessionStore::restore(Arc::new(FileSessionStorage::with_path(path))).await;
    assert!(store.get().is_none());
}

#[tokio::test]
async fn test_expired_persisted_token_is_held_but_not_authenticated() {
    let storage = InMemorySessionStorage::with_token(&expired_token());
    let store = SessionStore::restore(Arc::new(storage)).await;

    assert!(store.get().is_some());
    assert!(!store.is_authenticated());
}
