//! Unified error type for the notely client.

use thiserror::Error;

use super::category::ErrorCategory;
use crate::traits::HttpError;

/// Every failure the core surfaces to its caller.
///
/// None of these is fatal: each leaves the relevant engine in a state from
/// which the user can retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotelyError {
    /// Input rejected before any network call (malformed email, empty
    /// content, verification without a requested code), or a request the
    /// notes service refused as malformed.
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The one-time code could not be sent.
    #[error("Code delivery failed: {message}")]
    Delivery { message: String },

    /// The code was wrong or expired.
    #[error("Code verification failed: {message}")]
    Verification { message: String },

    /// Network failure or the service was unavailable.
    #[error("Transport error{}: {message}", status_suffix(.status))]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// The addressed note no longer exists.
    #[error("Note not found: {id}")]
    NotFound { id: String },

    /// A token is held but is no longer accepted.
    #[error("Session expired")]
    SessionExpired,
}

impl NotelyError {
    /// Shorthand for a [`NotelyError::Validation`].
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        NotelyError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Shorthand for a [`NotelyError::Transport`] without a status.
    pub fn transport(message: impl Into<String>) -> Self {
        NotelyError::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            NotelyError::Validation { .. } | NotelyError::NotFound { .. } => ErrorCategory::User,
            NotelyError::Delivery { .. }
            | NotelyError::Verification { .. }
            | NotelyError::SessionExpired => ErrorCategory::Auth,
            NotelyError::Transport {
                status: Some(status),
                ..
            } if *status >= 500 => ErrorCategory::Server,
            NotelyError::Transport { .. } => ErrorCategory::Network,
        }
    }

    /// Check if retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            NotelyError::Delivery { .. } => true,
            _ => self.category().is_retryable(),
        }
    }

    /// True when the caller should redirect to sign-in rather than show a
    /// form error.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, NotelyError::SessionExpired)
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            NotelyError::Validation { message, .. } => message.clone(),
            NotelyError::Delivery { .. } => "Invalid email. Please try again.".to_string(),
            NotelyError::Verification { .. } => {
                "Invalid credentials. Please try again.".to_string()
            }
            NotelyError::Transport { .. } => {
                "Could not reach the server. Please try again.".to_string()
            }
            NotelyError::NotFound { .. } => {
                "This note no longer exists. It may have been deleted elsewhere.".to_string()
            }
            NotelyError::SessionExpired => {
                "Your session has expired. Please sign in again.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            NotelyError::Validation { .. } => "E_VALIDATION",
            NotelyError::Delivery { .. } => "E_OTP_DELIVERY",
            NotelyError::Verification { .. } => "E_OTP_VERIFY",
            NotelyError::Transport { .. } => "E_TRANSPORT",
            NotelyError::NotFound { .. } => "E_NOT_FOUND",
            NotelyError::SessionExpired => "E_SESSION_EXPIRED",
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

impl From<HttpError> for NotelyError {
    fn from(err: HttpError) -> Self {
        NotelyError::transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_is_user_error_and_not_retryable() {
        let err = NotelyError::validation("email", "Email is required");
        assert_eq!(err.category(), ErrorCategory::User);
        assert!(!err.is_retryable());
        assert!(!err.requires_reauth());
        assert_eq!(err.user_message(), "Email is required");
        assert_eq!(err.to_string(), "Invalid email: Email is required");
    }

    #[test]
    fn test_transport_category_depends_on_status() {
        let net = NotelyError::transport("connection refused");
        assert_eq!(net.category(), ErrorCategory::Network);
        assert!(net.is_retryable());

        let server = NotelyError::Transport {
            status: Some(503),
            message: "unavailable".to_string(),
        };
        assert_eq!(server.category(), ErrorCategory::Server);
        assert_eq!(server.to_string(), "Transport error (503): unavailable");
    }

    #[test]
    fn test_delivery_is_retryable() {
        let err = NotelyError::Delivery {
            message: "mailer down".to_string(),
        };
        assert!(err.is_retryable());
        assert_eq!(err.category(), ErrorCategory::Auth);
    }

    #[test]
    fn test_only_session_expired_requires_reauth() {
        assert!(NotelyError::SessionExpired.requires_reauth());
        assert!(!NotelyError::Verification {
            message: "bad code".to_string()
        }
        .requires_reauth());
        assert!(!NotelyError::NotFound {
            id: "n1".to_string()
        }
        .requires_reauth());
    }

    #[test]
    fn test_not_found_is_distinct_from_transport() {
        let err = NotelyError::NotFound {
            id: "n1".to_string(),
        };
        assert_eq!(err.error_code(), "E_NOT_FOUND");
        assert_ne!(err.error_code(), NotelyError::transport("x").error_code());
        assert!(err.user_message().contains("no longer exists"));
    }

    #[test]
    fn test_from_http_error() {
        let err: NotelyError = HttpError::Timeout("30s".to_string()).into();
        assert!(matches!(err, NotelyError::Transport { status: None, .. }));
        assert!(err.to_string().contains("30s"));
    }
}
