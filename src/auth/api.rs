//! Authentication service endpoints.
//!
//! - `POST /auth/otp {email} -> {otp}`
//! - `POST /auth/signin {email, otp} -> {user?, token}`
//! - `POST /auth/signup {name, email, dateOfBirth, otp} -> {user?, token}`
//!
//! The code travels as a JSON number.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::client::{decode, transport_status};
use crate::api::ApiClient;
use crate::error::{NotelyError, NotelyResult};

/// The account the service reports after a successful verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
}

/// Response from the sign-in and sign-up endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub user: Option<User>,
    pub token: String,
}

#[derive(Debug, Deserialize)]
struct OtpResponse {
    #[serde(default)]
    otp: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct OtpRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    otp: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpRequest<'a> {
    name: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_of_birth: Option<String>,
    otp: u64,
}

/// Client for the authentication service.
#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Ask the service to issue and deliver a code for `email`.
    ///
    /// Returns the code if the service echoes it back (a development
    /// affordance); `None` when it only delivers out of band.
    pub async fn request_otp(&self, email: &str) -> NotelyResult<Option<String>> {
        let response = self
            .client
            .post("/auth/otp", &OtpRequest { email })
            .await?;

        if !response.is_success() {
            return Err(NotelyError::Delivery {
                message: format!("{} ({})", response.error_message(), response.status),
            });
        }

        if response.body.is_empty() {
            return Ok(None);
        }
        let body: OtpResponse = decode(&response)?;
        Ok(body.otp.and_then(|otp| match otp {
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::String(s) if !s.is_empty() => Some(s),
            _ => None,
        }))
    }

    /// Exchange a code for a session token.
    pub async fn signin(&self, email: &str, otp: u64) -> NotelyResult<AuthResponse> {
        let response = self
            .client
            .post("/auth/signin", &SignInRequest { email, otp })
            .await?;
        Self::verification_result(response)
    }

    /// Create an account and exchange a code for a session token.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        date_of_birth: Option<NaiveDate>,
        otp: u64,
    ) -> NotelyResult<AuthResponse> {
        let request = SignUpRequest {
            name,
            email,
            date_of_birth: date_of_birth.map(|d| d.format("%Y-%m-%d").to_string()),
            otp,
        };
        let response = self.client.post("/auth/signup", &request).await?;
        Self::verification_result(response)
    }

    fn verification_result(response: crate::traits::Response) -> NotelyResult<AuthResponse> {
        match response.status {
            200..=299 => decode(&response),
            400..=499 => Err(NotelyError::Verification {
                message: response.error_message(),
            }),
            _ => Err(transport_status(&response)),
        }
    }
}
