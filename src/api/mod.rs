//! Shared HTTP plumbing for the auth and notes services.

pub mod client;

pub use client::{ApiClient, BearerAuthorizer};
