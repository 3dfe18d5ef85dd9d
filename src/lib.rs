//! notely - an OTP-authenticated notes client
//!
//! The library holds the session store, the OTP challenge, the route guard
//! and the notes synchronization engine; the binary is a thin terminal front
//! end over [`app::Notely`].

pub mod adapters;
pub mod api;
pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod notes;
pub mod routing;
pub mod session;
pub mod traits;

pub use app::Notely;
pub use error::{NotelyError, NotelyResult};
