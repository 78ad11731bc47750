//! Authentication: credential bundle model, persistence, the interactive
//! login contract, and the coordinator that ties them together.

mod authenticator;
mod bundle;
mod capture;
mod coordinator;
mod interactive;
mod store;

pub use authenticator::{AuthError, Authenticator};
pub use bundle::{AuthBundle, Cookie};
pub use capture::{CaptureError, CapturedBundle, parse_captured_bundle};
pub use coordinator::{EstablishError, establish_session};
pub use interactive::{CaptureAuthenticator, NonInteractiveAuthenticator};
pub use store::{CredentialStore, StoreError};
