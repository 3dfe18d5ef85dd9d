//! Notes synchronization: optimistic mutation, reconciliation and ordering.

mod common;

use common::*;
use notely::notes::NotesViewStatus;
use notely::traits::HttpError;
use notely::NotelyError;
use std::time::Duration;

const BASE: &str = "http://notes.test";
const NOTES_URL: &str = "http://notes.test/notes";

#[tokio::test]
async fn test_load_twice_yields_identical_view() {
    let mock = MockHttpClient::new();
    mock.set_response(
        "GET",
        NOTES_URL,
        MockResponse::json(200, notes_json(&[("1", "a"), ("2", "b")])),
    );
    let sync = notes_sync(BASE, &mock);

    sync.load().await.unwrap();
    let first = sync.notes();
    sync.load().await.unwrap();

    assert_eq!(first, sync.notes());
    assert_eq!(first.len(), 2);
}

#[tokio::test]
async fn test_created_note_visible_before_reconciliation() {
    let mock = MockHttpClient::new();
    mock.push_response("GET", NOTES_URL, MockResponse::json(200, notes_json(&[])));
    mock.set_response(
        "POST",
        NOTES_URL,
        MockResponse::json(201, note_json("srv-1", "buy milk")),
    );
    mock.set_response(
        "GET",
        NOTES_URL,
        MockResponse::json(200, notes_json(&[("srv-1", "buy milk")]))
            .after(Duration::from_millis(60)),
    );
    let sync = notes_sync(BASE, &mock);
    sync.load().await.unwrap();
    assert_eq!(sync.status(), NotesViewStatus::Empty);

    let pending = {
        let sync = sync.clone();
        tokio::spawn(async move { sync.create("buy milk").await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    let interim = sync.notes();
    assert_eq!(interim.len(), 1);
    assert_eq!(interim[0].content, "buy milk");
    assert!(sync.is_refreshing());

    pending.await.unwrap().unwrap();
    let settled = sync.notes();
    assert_eq!(settled.len(), 1);
    assert_eq!(settled[0].content, "buy milk");
    assert_eq!(settled[0].id, "srv-1");
    assert!(!sync.is_refreshing());
}

#[tokio::test]
async fn test_failed_reconcile_keeps_created_note() {
    let mock = MockHttpClient::new();
    mock.set_response("POST", NOTES_URL, MockResponse::json(201, note_json("n1", "hello")));
    mock.set_response(
        "GET",
        NOTES_URL,
        MockResponse::Error(HttpError::Timeout("30s".to_string())),
    );
    let sync = notes_sync(BASE, &mock);

    sync.create("hello").await.unwrap();

    let notes = sync.notes();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].content, "hello");
    assert_eq!(mock.requests_to("GET", NOTES_URL).len(), 1);
}

#[tokio::test]
async fn test_create_update_load_round_trip() {
    let mock = MockHttpClient::new();
    mock.set_response("POST", NOTES_URL, MockResponse::json(201, note_json("n1", "first")));
    mock.set_response(
        "PUT",
        "http://notes.test/notes/n1",
        MockResponse::json(200, note_json("n1", "second")),
    );
    mock.push_response("GET", NOTES_URL, MockResponse::json(200, notes_json(&[("n1", "first")])));
    mock.set_response("GET", NOTES_URL, MockResponse::json(200, notes_json(&[("n1", "second")])));
    let sync = notes_sync(BASE, &mock);

    let created = sync.create("first").await.unwrap();
    sync.update(&created.id, "second").await.unwrap();
    sync.load().await.unwrap();

    let notes = sync.notes();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].id, "n1");
    assert_eq!(notes[0].content, "second");
    assert_eq!(
        mock.requests_to("PUT", "http://notes.test/notes/n1")[0]
            .json_body()
            .unwrap(),
        serde_json::json!({"content": "second"})
    );
}

#[tokio::test]
async fn test_last_load_response_wins() {
    let mock = MockHttpClient::new();
    // The earlier load answers last
    mock.push_response(
        "GET",
        NOTES_URL,
        MockResponse::json(200, notes_json(&[("1", "older request")]))
            .after(Duration::from_millis(60)),
    );
    mock.push_response(
        "GET",
        NOTES_URL,
        MockResponse::json(200, notes_json(&[("2", "newer request")]))
            .after(Duration::from_millis(10)),
    );
    let sync = notes_sync(BASE, &mock);

    let (first, second) = tokio::join!(sync.load(), sync.load());
    first.unwrap();
    second.unwrap();

    let notes = sync.notes();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].content, "older request");
}

#[tokio::test]
async fn test_concurrent_mutations_on_distinct_notes() {
    let mock = MockHttpClient::new();
    mock.push_response(
        "GET",
        NOTES_URL,
        MockResponse::json(200, notes_json(&[("1", "a"), ("2", "b")])),
    );
    mock.set_response(
        "PUT",
        "http://notes.test/notes/1",
        MockResponse::json(200, note_json("1", "a2"))
            .after(Duration::from_millis(20)),
    );
    mock.set_response("DELETE", "http://notes.test/notes/2", MockResponse::empty(200));
    mock.set_response("GET", NOTES_URL, MockResponse::json(200, notes_json(&[("1", "a2")])));
    let sync = notes_sync(BASE, &mock);
    sync.load().await.unwrap();

    let (updated, deleted) = futures::join!(sync.update("1", "a2"), sync.delete("2"));
    updated.unwrap();
    deleted.unwrap();

    let notes = sync.notes();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].content, "a2");
}

#[tokio::test]
async fn test_note_deleted_elsewhere_is_not_found() {
    let mock = MockHttpClient::new();
    mock.set_response("GET", NOTES_URL, MockResponse::json(200, notes_json(&[("1", "a")])));
    mock.set_response(
        "PUT",
        "http://notes.test/notes/1",
        MockResponse::json(404, serde_json::json!({"message": "Note not found"})),
    );
    let sync = notes_sync(BASE, &mock);
    sync.load().await.unwrap();

    let err = sync.update("1", "changed").await.unwrap_err();
    assert_eq!(err, NotelyError::NotFound { id: "1".to_string() });
    assert!(!err.is_retryable());
    assert_eq!(sync.notes()[0].content, "a");
}

#[tokio::test]
async fn test_results_after_detach_are_ignored() {
    let mock = MockHttpClient::new();
    mock.set_response(
        "GET",
        NOTES_URL,
        MockResponse::json(200, notes_json(&[("1", "a")]))
            .after(Duration::from_millis(40)),
    );
    let sync = notes_sync(BASE, &mock);

    let pending = {
        let sync = sync.clone();
        tokio::spawn(async move { sync.load().await })
    };
    tokio::time::sleep(Duration::from_millis(5)).await;
    sync.detach();

    let fetched = pending.await.unwrap().unwrap();
    assert_eq!(fetched.len(), 1);
    assert!(sync.notes().is_empty());
    assert_eq!(sync.status(), NotesViewStatus::Loading);
}
