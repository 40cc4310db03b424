//! Session bootstrap and sign-out sequencing
//!
//! The startup path restores a session from stored tokens; the sign-in paths
//! establish one from a fresh token pair. Both funnel into the same
//! reconciliation sequence: fetch user, purchase-provider login, entitlement
//! lookup, unread refresh, auto check-in, lock decision.
//!
//! Failure semantics:
//! - Critical path (token restore, user fetch, startup deadline): fatal.
//!   Full local sign-out, no user-facing error beyond landing on the
//!   signed-out entry screen.
//! - Everything else: best-effort. Logged, never surfaced, never blocks the
//!   user from reaching a usable app.
//!
//! There are no automatic retries anywhere in this sequence; the only
//! corrective action offered to the user is to sign in again.

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use super::lock::decide_lock;
use super::{AppState, Services};
use crate::api::TokenPair;
use crate::platform::{PREMIUM_ENTITLEMENT, keys};

/// Upper bound on the whole startup sequence. Exceeding it is treated
/// identically to a user-fetch failure: forced sign-out. This guards app
/// launch against an unreachable backend or a hung SDK call.
pub const BOOTSTRAP_TIMEOUT: Duration = Duration::from_secs(30);

/// Terminal state of a bootstrap or sign-in sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// No session; the signed-out entry screen is shown
    SignedOut,
    /// Session established. When `locked` is true the PIN prompt must be
    /// presented (any biometric attempt has already happened).
    Ready { locked: bool },
}

/// Run the startup bootstrap with the standard 30-second deadline
pub fn bootstrap(state: &Arc<AppState>, services: &Services) -> BootstrapOutcome {
    bootstrap_with_timeout(state, services, BOOTSTRAP_TIMEOUT)
}

/// Run the startup bootstrap with an explicit deadline.
///
/// The reconciliation sequence races the deadline on a worker thread. When
/// the deadline wins, the worker is abandoned: in-flight backend calls are
/// not cancelled and will complete against a cleared session. That leak is
/// accepted; the session state itself is already resolved to signed-out.
pub fn bootstrap_with_timeout(
    state: &Arc<AppState>,
    services: &Services,
    deadline: Duration,
) -> BootstrapOutcome {
    // Step 1: restore the stored token pair. No token means a clean
    // signed-out start, not an error.
    let access_token = match services.secure.get(keys::ACCESS_TOKEN) {
        Ok(Some(token)) => token,
        Ok(None) => {
            info!("No stored access token; starting signed out");
            state.mark_unauthenticated();
            return BootstrapOutcome::SignedOut;
        }
        Err(e) => {
            warn!("Secure storage unreadable at startup: {}", e);
            state.mark_unauthenticated();
            return BootstrapOutcome::SignedOut;
        }
    };
    let refresh_token = services.secure.get(keys::REFRESH_TOKEN).unwrap_or_default();

    // Step 2 (first half): authenticated optimistically, pending the
    // profile fetch.
    state.begin_session(access_token, refresh_token);

    let (tx, rx) = mpsc::channel();
    let worker_state = Arc::clone(state);
    let worker_services = services.clone();
    thread::spawn(move || {
        let _ = tx.send(reconcile(&worker_state, &worker_services));
    });

    match rx.recv_timeout(deadline) {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => {
            warn!("Bootstrap failed, signing out: {:#}", e);
            force_sign_out_local(state, services);
            BootstrapOutcome::SignedOut
        }
        Err(_) => {
            warn!(
                "Bootstrap exceeded {}s deadline, signing out",
                deadline.as_secs()
            );
            force_sign_out_local(state, services);
            BootstrapOutcome::SignedOut
        }
    }
}

/// Complete an explicit sign-in (password, Google, Apple) from a
/// backend-issued token pair.
///
/// Persists the tokens first, then runs the same reconciliation as the
/// startup path, without the deadline race since interactive flows are
/// user-paced. A critical-path failure reverts to signed-out and propagates
/// the error for the sign-in screen to translate.
pub fn complete_sign_in(
    state: &Arc<AppState>,
    services: &Services,
    tokens: TokenPair,
) -> Result<BootstrapOutcome> {
    services
        .secure
        .set(keys::ACCESS_TOKEN, &tokens.access_token)
        .context("Failed to persist access token")?;
    services
        .secure
        .set(keys::REFRESH_TOKEN, &tokens.refresh_token)
        .context("Failed to persist refresh token")?;

    state.begin_session(tokens.access_token, Some(tokens.refresh_token));

    match reconcile(state, services) {
        Ok(outcome) => Ok(outcome),
        Err(e) => {
            warn!("Post-sign-in reconciliation failed: {:#}", e);
            force_sign_out_local(state, services);
            Err(e)
        }
    }
}

/// Steps 2-7 of the bootstrap contract, shared by startup and sign-in.
///
/// Only the user fetch is critical; every other step is best-effort.
fn reconcile(state: &Arc<AppState>, services: &Services) -> Result<BootstrapOutcome> {
    // Step 2: fetch the authoritative user profile. This validates the
    // restored token; a 401 or any other failure here is fatal.
    let user = services
        .api
        .fetch_me()
        .context("Failed to fetch current user")?;
    state.replace_user(user.clone());
    info!("Session established for user {}", user.id.as_str());

    // Step 3: purchase-provider login under the backend user ID
    if let Err(e) = services.purchases.log_in(&user.id) {
        warn!("Purchase provider login failed: {}", e);
    }

    // Step 4: entitlement lookup
    match services.purchases.active_entitlements() {
        Ok(entitlements) => {
            state.set_premium(entitlements.iter().any(|e| e == PREMIUM_ENTITLEMENT));
        }
        Err(e) => warn!("Entitlement lookup failed: {}", e),
    }

    // Step 5: unread counter refresh, fire-and-forget. The store records
    // its own error state.
    state.refresh_unread(services.api.as_ref());

    // Step 6: auto check-in when the account requests it. Not retried.
    if user.auto_check_in {
        if let Err(e) = services.api.check_in() {
            warn!("Auto check-in failed: {}", e);
        }
    }

    // Step 7: lock decision, including any biometric attempt
    let locked = decide_lock(state, services, &user);
    Ok(BootstrapOutcome::Ready { locked })
}

/// Explicit sign-out: best-effort remote invalidation, then unconditional
/// local teardown.
pub fn sign_out(state: &AppState, services: &Services) {
    if let Err(e) = services.purchases.log_out() {
        warn!("Purchase provider logout failed: {}", e);
    }
    if let Err(e) = services.api.sign_out() {
        warn!("Backend sign-out failed: {}", e);
    }
    force_sign_out_local(state, services);
}

/// Clear tokens and all session-scoped state. Never fails; storage errors
/// are logged and the in-memory state is cleared regardless.
fn force_sign_out_local(state: &AppState, services: &Services) {
    if let Err(e) = services.secure.remove(keys::ACCESS_TOKEN) {
        warn!("Failed to clear access token: {}", e);
    }
    if let Err(e) = services.secure.remove(keys::REFRESH_TOKEN) {
        warn!("Failed to clear refresh token: {}", e);
    }
    state.clear_session();
    info!("Signed out");
}
