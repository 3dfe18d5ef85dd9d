//! The client facade.
//!
//! [`Notely`] wires one session store into the guard, the request
//! authorizer, the OTP challenges and the notes view, and exposes the entry
//! points a presentation layer drives.

use std::sync::Arc;
use tracing::{debug, info};

use crate::adapters::{FileSessionStorage, ReqwestHttpClient};
use crate::api::ApiClient;
use crate::auth::{AuthApi, AuthFlow, CodeDelivery, OtpChallenge, User};
use crate::config::ClientConfig;
use crate::error::NotelyResult;
use crate::notes::{Note, NotesApi, NotesSync, NotesViewStatus};
use crate::routing::{GuardDecision, Route, RouteGuard};
use crate::session::SessionStore;
use crate::traits::HttpClient;

/// An OTP-authenticated notes client.
pub struct Notely {
    config: ClientConfig,
    session: SessionStore,
    guard: RouteGuard,
    auth: AuthApi,
    notes: NotesSync,
}

impl Notely {
    /// Build the production client: reqwest transport and, when configured,
    /// a session restored from disk.
    pub async fn from_config(config: ClientConfig) -> Self {
        let http = Arc::new(ReqwestHttpClient::with_timeout(config.request_timeout));
        let session = match &config.session_path {
            Some(path) => {
                SessionStore::restore(Arc::new(FileSessionStorage::with_path(path.clone()))).await
            }
            None => SessionStore::new(),
        };
        Self::with_parts(config, http, session)
    }

    /// Build a client over explicit collaborators.
    pub fn with_parts(
        config: ClientConfig,
        http: Arc<dyn HttpClient>,
        session: SessionStore,
    ) -> Self {
        let client = ApiClient::new(config.api_base_url.clone(), http, session.clone());
        Self {
            guard: RouteGuard::new(session.clone()),
            auth: AuthApi::new(client.clone()),
            notes: NotesSync::new(NotesApi::new(client)),
            session,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn notes(&self) -> &NotesSync {
        &self.notes
    }

    /// True if a currently valid token is held.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Guard decision for a navigation.
    pub fn navigate(&self, route: Route) -> GuardDecision {
        self.guard.check(route)
    }

    /// Start a sign-in or sign-up challenge.
    pub fn challenge(&self, flow: AuthFlow) -> OtpChallenge {
        OtpChallenge::new(flow, self.auth.clone(), self.session.clone())
            .with_validity(self.config.otp_validity)
    }

    pub async fn request_code(
        &self,
        challenge: &mut OtpChallenge,
        email: &str,
    ) -> NotelyResult<CodeDelivery> {
        challenge.request_code(email).await
    }

    pub async fn resend_code(&self, challenge: &mut OtpChallenge) -> NotelyResult<CodeDelivery> {
        challenge.resend_code().await
    }

    /// Verify a code. A new session starts with a fresh notes view.
    pub async fn verify_code(
        &self,
        challenge: &mut OtpChallenge,
        email: &str,
        code: &str,
    ) -> NotelyResult<Option<User>> {
        let user = challenge.verify_code(email, code).await?;
        self.notes.attach();
        Ok(user)
    }

    /// Clear the session and stop applying notes results.
    pub async fn sign_out(&self) {
        self.notes.detach();
        self.session.clear().await;
        info!("Signed out");
    }

    /// Load the dashboard collection.
    pub async fn load(&self) -> NotelyResult<Vec<Note>> {
        self.guard.require(Route::Dashboard)?;
        if !self.notes.is_attached() {
            debug!("Attaching notes view");
            self.notes.attach();
        }
        self.notes.load().await
    }

    pub async fn create(&self, content: &str) -> NotelyResult<Note> {
        self.guard.require(Route::Dashboard)?;
        self.notes.create(content).await
    }

    pub async fn update(&self, id: &str, content: &str) -> NotelyResult<Note> {
        self.guard.require(Route::Dashboard)?;
        self.notes.update(id, content).await
    }

    pub async fn delete(&self, id: &str) -> NotelyResult<()> {
        self.guard.require(Route::Dashboard)?;
        self.notes.delete(id).await
    }

    pub fn view_status(&self) -> NotesViewStatus {
        self.notes.status()
    }
}
