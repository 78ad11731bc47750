//! Authenticator implementations shipped with the CLI.
//!
//! [`CaptureAuthenticator`] is the human-in-the-loop path: it prints the
//! portal URLs the operator must visit in a real browser, then waits for a
//! pasted cookie export on stdin. [`NonInteractiveAuthenticator`] is the
//! headless stand-in that fails fast when cached credentials are the only
//! option.

use std::io::{self, Read};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use super::authenticator::{AuthError, Authenticator};
use super::bundle::AuthBundle;
use super::capture::parse_captured_bundle;

/// Interactive login via a manually driven browser plus cookie export paste.
#[derive(Debug, Default)]
pub struct CaptureAuthenticator;

impl CaptureAuthenticator {
    /// Creates the paste-capture authenticator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Authenticator for CaptureAuthenticator {
    async fn authenticate(
        &self,
        entry_url: &str,
        init_urls: &[String],
        max_wait: Duration,
    ) -> Result<AuthBundle, AuthError> {
        info!("Interactive login required");
        info!(url = %entry_url, "1. Open the portal entry page in your browser and log in.");
        for (index, url) in init_urls.iter().enumerate() {
            info!(
                url = %url,
                "{}. Visit this page so session cookies materialize on it.",
                index + 2
            );
        }
        info!(
            wait_secs = max_wait.as_secs(),
            "Then export cookies with a browser extension (JSON) and paste them here, ending with Ctrl-D."
        );

        let input = tokio::time::timeout(max_wait, read_stdin_to_end())
            .await
            .map_err(|_| AuthError::Timeout { waited: max_wait })?
            .map_err(|error| AuthError::navigation("stdin", error.to_string()))?;

        bundle_from_capture_input(&input, entry_url)
    }
}

/// Parses pasted capture input, logging dropped-entry warnings.
fn bundle_from_capture_input(input: &str, entry_url: &str) -> Result<AuthBundle, AuthError> {
    let captured = parse_captured_bundle(input)
        .map_err(|error| AuthError::navigation(entry_url, error.to_string()))?;
    for warning in &captured.warnings {
        warn!("{warning}");
    }
    info!(
        cookies = captured.bundle.cookies.len(),
        "Cookie capture complete"
    );
    Ok(captured.bundle)
}

async fn read_stdin_to_end() -> io::Result<String> {
    // Stdin reads are blocking; the surrounding timeout abandons the task
    // rather than interrupting it, which is fine for a one-shot login flow.
    tokio::task::spawn_blocking(|| {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    })
    .await
    .map_err(|error| io::Error::other(error.to_string()))?
}

/// Headless stand-in: re-authentication is not possible without a human.
#[derive(Debug, Default)]
pub struct NonInteractiveAuthenticator;

impl NonInteractiveAuthenticator {
    /// Creates the headless authenticator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Authenticator for NonInteractiveAuthenticator {
    async fn authenticate(
        &self,
        _entry_url: &str,
        _init_urls: &[String],
        _max_wait: Duration,
    ) -> Result<AuthBundle, AuthError> {
        Err(AuthError::Unavailable {
            reason: "running headless; re-run without --headless to log in".to_string(),
        })
    }
}
