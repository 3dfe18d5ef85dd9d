//! One-time passcode challenge.
//!
//! A challenge is a two-step flow: request a code for an email, then submit
//! the code. Sign-in and sign-up run the same machine; [`AuthFlow`] only
//! selects the verification endpoint and the extra profile fields sent with
//! the final call.
//!
//! ```text
//! Idle ──request──▶ CodeRequested ──verify──▶ Verifying ──ok──▶ Verified
//!   │                 ▲      │ resend             │
//!   │                 └──────┘                    └─err─▶ Failed(InvalidCode)
//!   └─delivery err─▶ Failed(DeliveryFailed)
//! ```
//!
//! `Failed` is never terminal: the user may resend, or resubmit a code when
//! one was delivered earlier. Code expiry and rate limiting belong to the
//! service; the client only displays the validity window.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::api::{AuthApi, User};
use crate::error::{NotelyError, NotelyResult};
use crate::session::SessionStore;

/// Window the service honours a code for.
pub const DEFAULT_CODE_VALIDITY: Duration = Duration::from_secs(5 * 60);

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex")
});

/// Extra fields bundled into the sign-up verification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpProfile {
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
}

/// Which verification endpoint a challenge ends in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFlow {
    SignIn,
    SignUp(SignUpProfile),
}

impl AuthFlow {
    pub fn label(&self) -> &'static str {
        match self {
            AuthFlow::SignIn => "sign-in",
            AuthFlow::SignUp(_) => "sign-up",
        }
    }
}

/// Why the last step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The service refused the email or could not send the code.
    DeliveryFailed,
    /// The code was wrong or expired.
    InvalidCode,
    /// The service could not be reached.
    Unreachable,
}

/// Where a challenge is in its flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeState {
    Idle,
    CodeRequested,
    Verifying,
    Verified,
    Failed(FailureReason),
}

/// Result of a successful delivery request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeDelivery {
    /// The code, when the service echoes it back. Development servers do;
    /// production delivery is out of band and this is `None`.
    pub code: Option<String>,
    /// How long the code stays valid, for display.
    pub valid_for: Duration,
}

/// One in-progress sign-in or sign-up attempt.
pub struct OtpChallenge {
    flow: AuthFlow,
    email: String,
    state: ChallengeState,
    requested_at: Option<DateTime<Utc>>,
    user: Option<User>,
    valid_for: Duration,
    api: AuthApi,
    session: SessionStore,
}

impl std::fmt::Debug for OtpChallenge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpChallenge")
            .field("flow", &self.flow.label())
            .field("email", &self.email)
            .field("state", &self.state)
            .field("requested_at", &self.requested_at)
            .finish()
    }
}

impl OtpChallenge {
    /// Start a challenge in `Idle`.
    pub fn new(flow: AuthFlow, api: AuthApi, session: SessionStore) -> Self {
        Self {
            flow,
            email: String::new(),
            state: ChallengeState::Idle,
            requested_at: None,
            user: None,
            valid_for: DEFAULT_CODE_VALIDITY,
            api,
            session,
        }
    }

    /// Override the validity window reported to the user.
    pub fn with_validity(mut self, valid_for: Duration) -> Self {
        self.valid_for = valid_for;
        self
    }

    pub fn state(&self) -> ChallengeState {
        self.state
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn flow(&self) -> &AuthFlow {
        &self.flow
    }

    pub fn requested_at(&self) -> Option<DateTime<Utc>> {
        self.requested_at
    }

    /// When the last delivered code stops being honoured, for display only.
    pub fn code_expires_at(&self) -> Option<DateTime<Utc>> {
        let window = chrono::Duration::from_std(self.valid_for).ok()?;
        self.requested_at
            .and_then(|at| at.checked_add_signed(window))
    }

    /// The account reported by the service once verified.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_verified(&self) -> bool {
        self.state == ChallengeState::Verified
    }

    /// True if a code can be requested again for the current email.
    pub fn can_resend(&self) -> bool {
        !self.email.is_empty()
            && matches!(
                self.state,
                ChallengeState::CodeRequested | ChallengeState::Failed(_)
            )
    }

    /// Ask the service to deliver a code to `email`.
    ///
    /// A malformed email is rejected without a call and leaves the state
    /// untouched. Calling this again for a different email restarts the
    /// challenge for that address.
    pub async fn request_code(&mut self, email: &str) -> NotelyResult<CodeDelivery> {
        if self.state == ChallengeState::Verified {
            return Err(NotelyError::validation(
                "otp",
                "This sign-in is already complete",
            ));
        }

        let email = validate_email(email)?;
        if email != self.email {
            self.email = email;
            self.requested_at = None;
        }

        debug!("Requesting {} code for {}", self.flow.label(), self.email);
        match self.api.request_otp(&self.email).await {
            Ok(code) => {
                self.state = ChallengeState::CodeRequested;
                self.requested_at = Some(Utc::now());
                info!("Code requested for {}", self.email);
                Ok(CodeDelivery {
                    code,
                    valid_for: self.valid_for,
                })
            }
            Err(e) => {
                warn!("Code delivery for {} failed: {}", self.email, e);
                self.state = ChallengeState::Failed(match e {
                    NotelyError::Transport { .. } => FailureReason::Unreachable,
                    _ => FailureReason::DeliveryFailed,
                });
                Err(e)
            }
        }
    }

    /// Re-issue the delivery call for the current email.
    ///
    /// Each successful resend resets `requested_at`. The service decides
    /// whether earlier codes stay valid and how many resends it accepts.
    pub async fn resend_code(&mut self) -> NotelyResult<CodeDelivery> {
        if !self.can_resend() {
            return Err(NotelyError::validation(
                "otp",
                "Request a code before asking to resend it",
            ));
        }
        let email = self.email.clone();
        self.request_code(&email).await
    }

    /// Submit `code` for `email`.
    ///
    /// Allowed once a code has been delivered, including after a failed
    /// attempt. On success the session token is stored and the challenge is
    /// `Verified`; on a rejected code it is `Failed(InvalidCode)` and the
    /// session is left as it was.
    pub async fn verify_code(&mut self, email: &str, code: &str) -> NotelyResult<Option<User>> {
        match self.state {
            ChallengeState::Verified => {
                return Err(NotelyError::validation(
                    "otp",
                    "This sign-in is already complete",
                ))
            }
            _ if self.requested_at.is_none() => {
                return Err(NotelyError::validation(
                    "otp",
                    "Request a code before verifying",
                ))
            }
            _ => {}
        }

        let email = validate_email(email)?;
        if email != self.email {
            return Err(NotelyError::validation(
                "email",
                "The code was sent to a different email",
            ));
        }
        let otp = parse_code(code)?;
        if let AuthFlow::SignUp(profile) = &self.flow {
            if profile.name.trim().is_empty() {
                return Err(NotelyError::validation("name", "Name is required"));
            }
        }

        debug!("Verifying {} code for {}", self.flow.label(), self.email);
        let verifying = VerifyingGuard::enter(&mut self.state);

        let result = match &self.flow {
            AuthFlow::SignIn => self.api.signin(&self.email, otp).await,
            AuthFlow::SignUp(profile) => {
                self.api
                    .signup(profile.name.trim(), &self.email, profile.date_of_birth, otp)
                    .await
            }
        };

        match result {
            Ok(response) => {
                verifying.settle(ChallengeState::Verified);
                self.user = response.user.clone();
                self.session.set(response.token).await;
                info!("{} verified for {}", self.flow.label(), self.email);
                Ok(response.user)
            }
            Err(e) => {
                warn!("Verification for {} failed: {}", self.email, e);
                verifying.settle(ChallengeState::Failed(match e {
                    NotelyError::Verification { .. } => FailureReason::InvalidCode,
                    _ => FailureReason::Unreachable,
                }));
                Err(e)
            }
        }
    }

    /// Discard the challenge without touching the session.
    pub fn abandon(self) {
        debug!(
            "Abandoned {} challenge in state {:?}",
            self.flow.label(),
            self.state
        );
    }
}

/// Holds a challenge in `Verifying` for one service call.
///
/// If the call is dropped before it settles, the prior state comes back so
/// the challenge can be retried or resent.
struct VerifyingGuard<'a> {
    state: &'a mut ChallengeState,
    previous: ChallengeState,
    settled: bool,
}

impl<'a> VerifyingGuard<'a> {
    fn enter(state: &'a mut ChallengeState) -> Self {
        let previous = *state;
        *state = ChallengeState::Verifying;
        Self {
            state,
            previous,
            settled: false,
        }
    }

    fn settle(mut self, next: ChallengeState) {
        *self.state = next;
        self.settled = true;
    }
}

impl Drop for VerifyingGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            debug!("Verification interrupted, back to {:?}", self.previous);
            *self.state = self.previous;
        }
    }
}

/// Trim and check an email address.
pub fn validate_email(email: &str) -> NotelyResult<String> {
    let email = email.trim();
    if email.is_empty() {
        return Err(NotelyError::validation("email", "Email is required"));
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(NotelyError::validation(
            "email",
            "Please enter a valid email address",
        ));
    }
    Ok(email.to_string())
}

/// Parse a code as the number the service expects.
fn parse_code(code: &str) -> NotelyResult<u64> {
    let code = code.trim();
    if code.is_empty() {
        return Err(NotelyError::validation("otp", "Code is required"));
    }
    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(NotelyError::validation("otp", "Code must be numeric"));
    }
    code.parse()
        .map_err(|_| NotelyError::validation("otp", "Code is too long"))
}
