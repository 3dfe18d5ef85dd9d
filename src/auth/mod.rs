//! Authentication module.
//!
//! This module provides:
//! - The authentication service client (`/auth/otp`, `/auth/signin`, `/auth/signup`)
//! - The one-time passcode challenge shared by sign-in and sign-up

pub mod api;
pub mod otp;

pub use api::{AuthApi, AuthResponse, User};
pub use otp::{
    AuthFlow, ChallengeState, CodeDelivery, FailureReason, OtpChallenge, SignUpProfile,
    DEFAULT_CODE_VALIDITY,
};
