//! App-lock decision and PIN verification
//!
//! The app lock is a client-only gate: once a session is authenticated, a
//! user with a PIN configured must pass a biometric or PIN challenge before
//! the UI unlocks. The flag resets on every fresh sign-in or token restore.

use anyhow::Result;
use log::warn;

use super::{AppState, Services};
use crate::api::{Api, ApiError};
use crate::models::{User, UserId};
use crate::platform::{SecureStore, biometric_opt_in_key};

/// Reason string passed to the device biometric prompt
const UNLOCK_REASON: &str = "Unlock Pigeon";

/// Determine the lock requirement for a freshly established session and
/// attempt the biometric challenge where the user opted in.
///
/// Returns whether the app remains locked (i.e., the PIN prompt must be
/// presented). Biometric unlock is only attempted when the user previously
/// opted in on this device; a failed or unavailable challenge falls back to
/// the PIN prompt, never to an unlocked app.
pub(crate) fn decide_lock(state: &AppState, services: &Services, user: &User) -> bool {
    if !user.has_pin {
        state.set_locked(false);
        return false;
    }

    state.set_locked(true);

    if biometric_opt_in(services.secure.as_ref(), &user.id) && services.biometrics.is_available() {
        match services.biometrics.challenge(UNLOCK_REASON) {
            Ok(true) => {
                state.set_locked(false);
                return false;
            }
            Ok(false) => {}
            Err(e) => warn!("Biometric challenge failed: {}", e),
        }
    }

    true
}

/// Whether biometric unlock was opted into for this user ID on this device
pub fn biometric_opt_in(secure: &dyn SecureStore, user_id: &UserId) -> bool {
    match secure.get(&biometric_opt_in_key(user_id)) {
        Ok(value) => value.as_deref() == Some("true"),
        Err(e) => {
            warn!("Failed to read biometric opt-in flag: {}", e);
            false
        }
    }
}

/// Record the biometric unlock opt-in for this user ID
pub fn set_biometric_unlock(
    secure: &dyn SecureStore,
    user_id: &UserId,
    enabled: bool,
) -> Result<()> {
    secure.set(
        &biometric_opt_in_key(user_id),
        if enabled { "true" } else { "false" },
    )
}

/// Submit a PIN to the verification endpoint.
///
/// Success clears the app lock. Failure leaves the lock engaged; the caller
/// translates the error, resets the entered PIN, and re-prompts. No
/// retry-count lockout is enforced client-side.
pub fn verify_pin(state: &AppState, api: &dyn Api, pin: &str) -> Result<(), ApiError> {
    api.verify_pin(pin)?;
    state.set_locked(false);
    Ok(())
}
