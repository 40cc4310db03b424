//! Explicit sign-in flows
//!
//! Each method obtains a backend-issued token pair out-of-band (credentials
//! exchange, OAuth code exchange, or platform identity-token exchange), then
//! runs the same post-login reconciliation as the startup bootstrap, without
//! the startup deadline since interactive flows are user-paced.

mod google;

pub use google::{AuthorizationCode, GoogleAuthFlow};

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::ApiClient;
use crate::session::{AppState, BootstrapOutcome, Services, complete_sign_in};

/// Sign in with email and password
pub fn sign_in_with_password(
    client: &ApiClient,
    state: &Arc<AppState>,
    services: &Services,
    email: &str,
    password: &str,
) -> Result<BootstrapOutcome> {
    let tokens = client
        .sign_in_with_password(email, password)
        .context("Password sign-in failed")?;
    complete_sign_in(state, services, tokens)
}

/// Sign in with Google: capture an OAuth authorization code locally, then
/// exchange it at the backend for a token pair
pub fn sign_in_with_google(
    client: &ApiClient,
    state: &Arc<AppState>,
    services: &Services,
    flow: &GoogleAuthFlow,
) -> Result<BootstrapOutcome> {
    let auth = flow.obtain_authorization_code()?;
    let tokens = client
        .exchange_google_code(&auth.code, &auth.redirect_uri)
        .context("Google code exchange failed")?;
    complete_sign_in(state, services, tokens)
}

/// Sign in with Apple: the platform shell supplies the identity token, the
/// backend exchanges it for a token pair
pub fn sign_in_with_apple(
    client: &ApiClient,
    state: &Arc<AppState>,
    services: &Services,
    identity_token: &str,
) -> Result<BootstrapOutcome> {
    let tokens = client
        .exchange_apple_identity(identity_token)
        .context("Apple identity-token exchange failed")?;
    complete_sign_in(state, services, tokens)
}
