//! Token validity predicate.
//!
//! The token is opaque to the client except for the `exp` claim in its JWT
//! payload. No signature is checked and no network call is made, so the
//! predicate can be evaluated synchronously on every navigation.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;

/// The claims the client reads out of a session token.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    /// Subject, if the service includes one.
    #[serde(default)]
    pub sub: Option<String>,
}

/// Decode the payload segment of a JWT-shaped token.
///
/// Returns `None` for anything that is not three dot-separated segments with
/// a base64url JSON payload carrying a numeric `exp`.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }
    let payload = URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .ok()?;
    serde_json::from_slice(&payload).ok()
}

/// True if `token` is well formed and has not expired.
pub fn is_valid(token: &str) -> bool {
    is_valid_at(token, chrono::Utc::now().timestamp())
}

/// True if `token` is well formed and `now` is before its expiry.
///
/// A token without an `exp` claim is treated as invalid.
pub fn is_valid_at(token: &str, now: i64) -> bool {
    match decode_claims(token) {
        Some(claims) => now < claims.exp,
        None => false,
    }
}

/// Seconds until `token` expires, clamped at zero.
pub fn expires_in(token: &str) -> Option<u64> {
    let claims = decode_claims(token)?;
    let now = chrono::Utc::now().timestamp();
    Some((claims.exp - now).max(0) as u64)
}

/// Short form of a token that is safe to log.
pub fn redact(token: &str) -> String {
    let prefix: String = token.chars().take(8).collect();
    format!("{}...", prefix)
}
