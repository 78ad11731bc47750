//! Interactive authenticator contract.
//!
//! The login mechanism itself (driving a browser, waiting for a human) lives
//! outside the core. The core only needs the capability expressed here:
//! produce a fresh [`AuthBundle`] given a portal entry URL, the ordered list
//! of session-initializing URLs, and a maximum wait.
//!
//! The trait uses type erasure (`&dyn Authenticator`) so the coordinator does
//! not propagate a generic parameter for what is a one-shot collaborator.

use std::time::Duration;

use async_trait::async_trait;

use super::bundle::AuthBundle;

/// Errors an interactive login attempt can surface.
///
/// All variants are fatal to the current attempt; the authenticator itself
/// never retries. The coordinator treats them as terminal for the run.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The human did not complete login within the allowed wait.
    #[error("login not completed within {:?}", waited)]
    Timeout {
        /// How long the authenticator waited before giving up.
        waited: Duration,
    },

    /// A navigation or capture step failed (entry URL, init URL, or the
    /// cookie capture itself).
    #[error("login flow failed at {url}: {reason}")]
    Navigation {
        /// The URL or step that failed.
        url: String,
        /// Description of what went wrong.
        reason: String,
    },

    /// No interactive channel exists (headless run).
    #[error("interactive login unavailable: {reason}")]
    Unavailable {
        /// Why no interactive login can happen.
        reason: String,
    },
}

impl AuthError {
    /// Creates a navigation failure with context.
    pub fn navigation(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Navigation {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Capability to produce a fresh set of authentication artifacts.
///
/// Implementations must be `Send + Sync`; the coordinator holds them behind a
/// `&dyn` reference for the duration of one run.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Runs one interactive login flow.
    ///
    /// Navigates `entry_url`, blocks up to `max_wait` for the human to finish
    /// logging in, then visits each `init_urls` entry in order so session
    /// cookies materialize on the dependent subdomains, and returns the
    /// captured bundle.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when the wait expires, a navigation step fails,
    /// or no interactive channel is available.
    async fn authenticate(
        &self,
        entry_url: &str,
        init_urls: &[String],
        max_wait: Duration,
    ) -> Result<AuthBundle, AuthError>;
}
