//! Credential persistence: the on-disk JSON bundle of cookies + user agent.
//!
//! Loading is deliberately infallible: any unreadable or unparseable file is
//! treated as "no cached credentials" so a corrupt file degrades into a fresh
//! interactive login instead of a hard failure. Saving is atomic
//! (write-temp-then-rename) so a crash never leaves a truncated bundle.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use super::bundle::AuthBundle;

/// Errors that can occur while persisting a credential bundle.
///
/// Load failures are not represented here — `load()` maps them to `None`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Bundle could not be serialized to JSON.
    #[error("failed to serialize credential bundle: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Filesystem error while writing or renaming the bundle file.
    #[error("failed to write credential file {path}: {source}")]
    Io {
        /// The path involved in the failed operation.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Persists and loads the serialized [`AuthBundle`].
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Creates a store backed by the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted bundle, or `None` when absent or unreadable.
    ///
    /// Deserialization failures are logged as warnings and mapped to `None`
    /// so stale or corrupt files fall back to re-authentication.
    #[must_use]
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Option<AuthBundle> {
        if !self.path.exists() {
            debug!("no credential file present");
            return None;
        }

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) => {
                warn!(error = %error, "failed to read credential file; ignoring it");
                return None;
            }
        };

        match serde_json::from_str::<AuthBundle>(&contents) {
            Ok(bundle) => {
                debug!(cookies = bundle.cookies.len(), "loaded credential bundle");
                Some(bundle)
            }
            Err(error) => {
                warn!(error = %error, "credential file is not valid JSON; ignoring it");
                None
            }
        }
    }

    /// Overwrites the persisted bundle atomically.
    ///
    /// The bundle is written to a temporary file in the same directory and
    /// renamed into place, so readers never observe a partial file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when serialization or any filesystem step fails.
    #[instrument(level = "debug", skip(self, bundle), fields(path = %self.path.display()))]
    pub fn save(&self, bundle: &AuthBundle) -> Result<(), StoreError> {
        let payload = serde_json::to_vec_pretty(bundle)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let tmp_path = self.path.with_extension("tmp");
        let mut tmp = fs::File::create(&tmp_path).map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        tmp.write_all(&payload).map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        tmp.sync_all().map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        drop(tmp);

        fs::rename(&tmp_path, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!(cookies = bundle.cookies.len(), "saved credential bundle");
        Ok(())
    }
}
