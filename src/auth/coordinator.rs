//! Authentication coordinator: cached credentials first, interactive login
//! once, then give up.
//!
//! The manifest fetch doubles as the session probe, so a successful
//! establishment returns the manifest alongside the session and no redundant
//! fetch happens. Transient manifest failures are terminal here by design:
//! re-authenticating cannot fix a server-side error, and a browser popup for
//! a 500 would be operator hostile.

use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::config::PortalConfig;
use crate::manifest::{self, Manifest, ManifestError};
use crate::session::{Session, SessionError};

use super::authenticator::{AuthError, Authenticator};
use super::store::CredentialStore;

/// Terminal failures of the establishment state machine.
#[derive(Debug, thiserror::Error)]
pub enum EstablishError {
    /// Both the cached bundle and a freshly captured one were rejected.
    #[error("authentication could not be established even after interactive login")]
    Abandoned,

    /// The manifest endpoint failed for a non-authentication reason;
    /// re-login would not help, the operator should re-run later.
    #[error("manifest fetch failed for a non-authentication reason: {0}")]
    Transient(#[source] ManifestError),

    /// The interactive login flow itself failed.
    #[error(transparent)]
    Authenticator(#[from] AuthError),

    /// A session could not be constructed from a bundle.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Establishes an authenticated session and fetches the batch manifest.
///
/// State machine:
/// 1. Load the cached bundle; if present, probe it with the manifest fetch.
///    Success is terminal. An authentication failure falls through to the
///    interactive flow; any other failure is terminal.
/// 2. Run the interactive authenticator once, persist the result
///    (best-effort), and retry the manifest fetch exactly once.
/// 3. A second authentication failure abandons the run — no login loops.
///
/// # Errors
///
/// Returns [`EstablishError`] when no authenticated session can be produced.
#[instrument(skip_all, fields(batch = %config.batch_code()))]
pub async fn establish_session(
    store: &CredentialStore,
    authenticator: &dyn Authenticator,
    config: &PortalConfig,
    max_wait: Duration,
) -> Result<(Session, Manifest), EstablishError> {
    let manifest_url = config.manifest_url();

    if let Some(bundle) = store.load() {
        info!(
            cookies = bundle.cookies.len(),
            "trying cached credentials"
        );
        let session = Session::new(&bundle, config.portal_root())?;
        match manifest::fetch_manifest(&session, &manifest_url).await {
            Ok(manifest) => {
                info!("cached credentials accepted");
                return Ok((session, manifest));
            }
            Err(error) if error.is_authentication_failure() => {
                warn!(error = %error, "cached credentials rejected; interactive login required");
            }
            Err(error) => return Err(EstablishError::Transient(error)),
        }
    } else {
        info!("no cached credentials; interactive login required");
    }

    let bundle = authenticator
        .authenticate(config.entry_url(), config.init_urls(), max_wait)
        .await?;

    // Persistence is best-effort: an unwritable credential file costs the
    // operator a future login, not this run.
    if let Err(error) = store.save(&bundle) {
        warn!(error = %error, "failed to persist refreshed credentials; continuing in-memory");
    }

    let session = Session::new(&bundle, config.portal_root())?;
    match manifest::fetch_manifest(&session, &manifest_url).await {
        Ok(manifest) => {
            info!("authenticated after interactive login");
            Ok((session, manifest))
        }
        Err(error) if error.is_authentication_failure() => {
            warn!(error = %error, "fresh credentials rejected");
            Err(EstablishError::Abandoned)
        }
        Err(error) => Err(EstablishError::Transient(error)),
    }
}
