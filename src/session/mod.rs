//! Authenticated HTTP session construction.
//!
//! A [`Session`] is an explicit value built from an [`AuthBundle`]: a
//! `reqwest::Client` whose cookie jar is pre-loaded with the bundle's cookies
//! and whose default headers carry the bundle's client identity. There is no
//! process-global client; every operation that talks to the portal receives a
//! session by reference. The client is internally reference-counted, so one
//! session is safely shared read-only across concurrent download workers.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::cookie::Jar;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::auth::{AuthBundle, Cookie};
use crate::user_agent;

/// Default connect timeout for portal requests.
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default read timeout; generous because file bodies stream through it.
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Errors that can occur while constructing a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The fallback origin used for domain-less cookie injection is not a URL.
    #[error("invalid fallback origin {origin}: {source}")]
    InvalidOrigin {
        /// The offending origin string.
        origin: String,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// The HTTP client builder rejected the configuration.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// An authenticated HTTP session for one batch run.
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    injected_cookies: usize,
    dropped_cookies: usize,
}

impl Session {
    /// Constructs a session from an authentication bundle with default
    /// timeouts.
    ///
    /// Cookies are scoped to their declared domains. A cookie whose domain
    /// cannot form an origin URL is still injected against
    /// `fallback_origin` without explicit domain scoping rather than
    /// dropped: the login portal and the upload subdomain must share session
    /// state, and over-sending a cookie is harmless while under-sending
    /// breaks the run. Entries missing name, value, or domain are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when `fallback_origin` is not a valid URL or
    /// the HTTP client cannot be built.
    #[instrument(level = "debug", skip(bundle))]
    pub fn new(bundle: &AuthBundle, fallback_origin: &str) -> Result<Self, SessionError> {
        Self::with_timeouts(
            bundle,
            fallback_origin,
            CONNECT_TIMEOUT_SECS,
            READ_TIMEOUT_SECS,
        )
    }

    /// Constructs a session with explicit timeout values.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`new`](Self::new).
    #[instrument(level = "debug", skip(bundle))]
    pub fn with_timeouts(
        bundle: &AuthBundle,
        fallback_origin: &str,
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, SessionError> {
        let fallback =
            Url::parse(fallback_origin).map_err(|source| SessionError::InvalidOrigin {
                origin: fallback_origin.to_string(),
                source,
            })?;

        let (jar, injected_cookies) = load_bundle_into_jar(bundle, &fallback);
        let dropped_cookies = bundle.dropped_cookie_count();
        if dropped_cookies > 0 {
            warn!(
                dropped = dropped_cookies,
                "dropped cookie entries missing name, value, or domain"
            );
        }

        let user_agent = if bundle.user_agent.is_empty() {
            user_agent::default_portal_user_agent()
        } else {
            bundle.user_agent.clone()
        };

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent)
            .default_headers(default_headers())
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(SessionError::ClientBuild)?;

        debug!(
            injected = injected_cookies,
            dropped = dropped_cookies,
            "session constructed"
        );

        Ok(Self {
            client,
            injected_cookies,
            dropped_cookies,
        })
    }

    /// Issues a GET request. No retry logic lives here; retry policy differs
    /// between the manifest fetch and per-file fetches and belongs to those
    /// callers. Stream the body via `bytes_stream()` on the response.
    ///
    /// # Errors
    ///
    /// Returns the transport error from the underlying client.
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, reqwest::Error> {
        self.client.get(url).send().await
    }

    /// Number of cookies that were injected into the jar.
    #[must_use]
    pub fn injected_cookie_count(&self) -> usize {
        self.injected_cookies
    }

    /// Number of bundle entries dropped for missing required fields.
    #[must_use]
    pub fn dropped_cookie_count(&self) -> usize {
        self.dropped_cookies
    }

    /// Returns a reference to the underlying reqwest client.
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

/// Loads the bundle's injectable cookies into a jar, returning the jar and
/// the number of cookies injected.
fn load_bundle_into_jar(bundle: &AuthBundle, fallback: &Url) -> (Arc<Jar>, usize) {
    let jar = Arc::new(Jar::default());
    let mut injected = 0;

    for cookie in bundle.injectable_cookies() {
        match build_origin_url(cookie) {
            Some(origin) => {
                jar.add_cookie_str(&build_set_cookie_string(cookie, true), &origin);
                debug!(domain = %cookie.domain, name = %cookie.name, "loaded cookie into jar");
            }
            None => {
                // Domain does not form a URL; inject host-only against the
                // portal root so the session still carries it.
                jar.add_cookie_str(&build_set_cookie_string(cookie, false), fallback);
                warn!(
                    domain = %cookie.domain,
                    name = %cookie.name,
                    "cookie domain unusable; injected against portal root without domain scoping"
                );
            }
        }
        injected += 1;
    }

    (jar, injected)
}

/// Builds a `Set-Cookie` header string, optionally with the Domain attribute.
fn build_set_cookie_string(cookie: &Cookie, with_domain: bool) -> String {
    let mut parts = vec![format!("{}={}", cookie.name, cookie.value())];
    if with_domain {
        parts.push(format!("Domain={}", cookie.domain));
    }
    parts.push(format!("Path={}", cookie.path));
    parts.join("; ")
}

/// Builds the origin URL for `Jar::add_cookie_str` from a cookie's declared
/// domain, stripping the leading dot.
fn build_origin_url(cookie: &Cookie) -> Option<Url> {
    let domain = cookie.domain.strip_prefix('.').unwrap_or(&cookie.domain);
    format!("https://{domain}{}", cookie.path).parse().ok()
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers
}
