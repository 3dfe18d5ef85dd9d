//! Mock service setups for integration tests.
//!
//! This module re-exports the scripted doubles from `notely::adapters::mock`
//! and mounts wiremock routes that behave like the auth and notes services.

pub use notely::adapters::mock::{InMemorySessionStorage, MockHttpClient, MockResponse};

use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mount `POST /auth/otp` answering with `code`.
pub async fn mount_otp(server: &MockServer, email: &str, code: u64) {
    Mock::given(method("POST"))
        .and(path("/auth/otp"))
        .and(body_json(serde_json::json!({ "email": email })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "otp": code })))
        .mount(server)
        .await;
}

/// Mount `POST /auth/signin` accepting only `code` for `email`.
///
/// Any other code gets a 400, as the service does for a wrong or expired code.
pub async fn mount_signin(server: &MockServer, email: &str, code: u64, token: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/signin"))
        .and(body_json(serde_json::json!({ "email": email, "otp": code })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": token,
            "user": { "name": "Test User", "email": email }
        })))
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/signin"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({ "message": "Invalid OTP" })),
        )
        .with_priority(10)
        .mount(server)
        .await;
}

/// Mount `GET /notes` for requests bearing `token`.
pub async fn mount_notes(server: &MockServer, token: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/notes"))
        .and(header("Authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
