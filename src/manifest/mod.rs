//! Batch manifest retrieval and failure classification.
//!
//! The manifest endpoint is the session's litmus test: an expired or rejected
//! cookie set yields HTTP 403 or an HTML login page where JSON was expected.
//! Both are classified as [`ManifestError::AuthenticationFailure`] so the
//! coordinator knows a re-login is warranted, while every other non-200
//! status stays a transient server problem that must not trigger a login.

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::session::Session;

/// The JSON description of one batch of files to download.
///
/// A missing or empty `files` key is a valid manifest with zero files.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    /// File entries in portal order.
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

/// One manifest entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileEntry {
    /// Portal metadata for the entry.
    #[serde(default)]
    pub meta: FileMeta,
    /// Server-reported size in bytes, when the portal knows it.
    #[serde(default)]
    pub size: Option<u64>,
}

/// Portal metadata carried by a manifest entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileMeta {
    /// The file's name as uploaded. Entries without it are skipped.
    #[serde(default)]
    pub original_name: Option<String>,
    /// The portal group the file was filed under.
    #[serde(default)]
    pub group: Option<String>,
}

impl FileEntry {
    /// The entry's original file name, when present.
    #[must_use]
    pub fn original_name(&self) -> Option<&str> {
        self.meta.original_name.as_deref()
    }

    /// The entry's group name, when present.
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.meta.group.as_deref()
    }

    /// The server-reported size, when present.
    #[must_use]
    pub fn expected_size(&self) -> Option<u64> {
        self.size
    }
}

/// Errors from the manifest fetch, classified for the coordinator.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// Cookies were rejected, or the body was not the expected JSON —
    /// the session is not (or no longer) authenticated.
    #[error("portal rejected the session at {url}: {reason}")]
    AuthenticationFailure {
        /// The manifest URL.
        url: String,
        /// What made the response look unauthenticated.
        reason: String,
    },

    /// A non-200, non-403 status; a server-side problem re-login cannot fix.
    #[error("manifest endpoint returned HTTP {status} at {url}")]
    Transient {
        /// The manifest URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Transport-level failure reaching the endpoint.
    #[error("network error fetching manifest from {url}: {source}")]
    Network {
        /// The manifest URL.
        url: String,
        /// The underlying error.
        #[source]
        source: reqwest::Error,
    },
}

impl ManifestError {
    /// Whether this failure means the session needs re-authentication.
    #[must_use]
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailure { .. })
    }
}

/// Fetches and parses the batch manifest.
///
/// Classification:
/// - HTTP 403, or HTTP 200 with a body that is not valid manifest JSON →
///   [`ManifestError::AuthenticationFailure`]
/// - any other non-200 status → [`ManifestError::Transient`]
/// - transport failure → [`ManifestError::Network`]
///
/// # Errors
///
/// Returns [`ManifestError`] as classified above.
#[instrument(level = "debug", skip(session))]
pub async fn fetch_manifest(session: &Session, url: &str) -> Result<Manifest, ManifestError> {
    let response = session.get(url).await.map_err(|source| ManifestError::Network {
        url: url.to_string(),
        source,
    })?;

    let status = response.status().as_u16();
    if status == 403 {
        return Err(ManifestError::AuthenticationFailure {
            url: url.to_string(),
            reason: "HTTP 403".to_string(),
        });
    }
    if status != 200 {
        return Err(ManifestError::Transient {
            url: url.to_string(),
            status,
        });
    }

    let body = response.text().await.map_err(|source| ManifestError::Network {
        url: url.to_string(),
        source,
    })?;

    match serde_json::from_str::<Manifest>(&body) {
        Ok(manifest) => {
            debug!(files = manifest.files.len(), "manifest fetched");
            Ok(manifest)
        }
        // A 200 that is not manifest JSON is the portal's login page.
        Err(error) => Err(ManifestError::AuthenticationFailure {
            url: url.to_string(),
            reason: format!("body is not manifest JSON: {error}"),
        }),
    }
}
