//! Session bootstrap and app-lock sequencing
//!
//! Restores or establishes a session exactly once per process start and once
//! per explicit sign-in, reconciles local state with the backend and the
//! purchase provider, and decides whether the UI must be gated behind the
//! lock screen.

mod bootstrap;
mod lock;
mod state;

pub use bootstrap::{
    BOOTSTRAP_TIMEOUT, BootstrapOutcome, bootstrap, bootstrap_with_timeout, complete_sign_in,
    sign_out,
};
pub use lock::{biometric_opt_in, set_biometric_unlock, verify_pin};
pub use state::{AppState, Session};

use std::sync::Arc;

use crate::api::Api;
use crate::platform::{BiometricPrompt, PurchaseProvider, SecureStore};

/// The external collaborators consumed by the session flows.
///
/// Everything here is a narrow capability interface so the whole bootstrap
/// sequence can run against fakes.
#[derive(Clone)]
pub struct Services {
    pub api: Arc<dyn Api>,
    pub secure: Arc<dyn SecureStore>,
    pub purchases: Arc<dyn PurchaseProvider>,
    pub biometrics: Arc<dyn BiometricPrompt>,
}
