//! Portal Fetch Core Library
//!
//! This library implements bulk file retrieval from upload portals that
//! gate plain-HTTP downloads behind a browser login: credential caching and
//! refresh, authenticated session construction, manifest retrieval, and a
//! concurrent download orchestrator with per-file retry.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`auth`] - Credential bundle model, persistence, the interactive login
//!   contract, and the coordinator state machine
//! - [`session`] - Authenticated HTTP session construction
//! - [`manifest`] - Batch manifest retrieval and failure classification
//! - [`download`] - Concurrent batch transfer with per-file retry
//! - [`config`] - Portal endpoint configuration
//! - [`progress`] - Progress UI for batch runs

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod config;
pub mod download;
pub mod manifest;
pub mod progress;
pub mod session;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use auth::{
    AuthBundle, AuthError, Authenticator, CaptureAuthenticator, CaptureError, CapturedBundle,
    Cookie, CredentialStore, EstablishError, NonInteractiveAuthenticator, StoreError,
    establish_session, parse_captured_bundle,
};
pub use config::PortalConfig;
pub use download::{
    DEFAULT_CONCURRENCY, DEFAULT_MAX_ATTEMPTS, DownloadOrchestrator, DownloadOutcome, FetchError,
    OrchestratorError, RETRY_DELAY, SkipReason, Summary, sanitize_group_name,
};
pub use manifest::{FileEntry, Manifest, ManifestError, fetch_manifest};
pub use session::{Session, SessionError};
