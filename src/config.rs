//! Client configuration.
//!
//! Defaults can be overridden with the builder setters or from the
//! environment:
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `NOTELY_API_BASE_URL` | `api_base_url` | `http://localhost:3000` |
//! | `NOTELY_SESSION_PATH` | `session_path` | `~/.notely/session.json` |
//! | `NOTELY_OTP_VALIDITY_MINUTES` | `otp_validity` | 5 minutes |
//! | `NOTELY_REQUEST_TIMEOUT_SECS` | `request_timeout` | 30 seconds |

use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::adapters::FileSessionStorage;
use crate::auth::DEFAULT_CODE_VALIDITY;

/// Default base URL of the auth and notes services.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

/// Default timeout for a single HTTP exchange.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_API_BASE_URL: &str = "NOTELY_API_BASE_URL";
pub const ENV_SESSION_PATH: &str = "NOTELY_SESSION_PATH";
pub const ENV_OTP_VALIDITY_MINUTES: &str = "NOTELY_OTP_VALIDITY_MINUTES";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "NOTELY_REQUEST_TIMEOUT_SECS";

/// Configuration for a [`Notely`](crate::app::Notely) client.
///
/// # Example
///
/// ```ignore
/// use notely::config::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_api_base_url("https://notes.example.com")
///     .with_request_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL shared by `/auth/*` and `/notes`
    pub api_base_url: String,
    /// Where the session token is persisted (`None` keeps it in memory only)
    pub session_path: Option<PathBuf>,
    /// Code validity window shown to the user
    pub otp_validity: Duration,
    /// Timeout for each HTTP request
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_path: FileSessionStorage::default_path(),
            otp_validity: DEFAULT_CODE_VALIDITY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_session_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_path = Some(path.into());
        self
    }

    /// Keep the session in memory only.
    pub fn without_session_persistence(mut self) -> Self {
        self.session_path = None;
        self
    }

    pub fn with_otp_validity(mut self, validity: Duration) -> Self {
        self.otp_validity = validity;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Defaults overridden by any `NOTELY_*` variables that are set.
    ///
    /// Unparseable numbers are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(url) = env_string(ENV_API_BASE_URL) {
            config = config.with_api_base_url(url);
        }
        if let Some(path) = env_string(ENV_SESSION_PATH) {
            config = config.with_session_path(path);
        }
        if let Some(minutes) = env_u64(ENV_OTP_VALIDITY_MINUTES) {
            match minutes.checked_mul(60) {
                Some(secs) => config = config.with_otp_validity(Duration::from_secs(secs)),
                None => warn!("Ignoring {}={}: out of range", ENV_OTP_VALIDITY_MINUTES, minutes),
            }
        }
        if let Some(secs) = env_u64(ENV_REQUEST_TIMEOUT_SECS) {
            config = config.with_request_timeout(Duration::from_secs(secs));
        }

        config
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_u64(key: &str) -> Option<u64> {
    let raw = env_string(key)?;
    match raw.parse::<u64>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            warn!("Ignoring {}={:?}: expected a positive integer", key, raw);
            None
        }
    }
}
