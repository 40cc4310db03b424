//! Biometric prompt interface
//!
//! Wraps the device-level authentication challenge (Face ID, fingerprint).
//! The prompt either succeeds, fails, or is unavailable; the lock decision
//! in [`crate::session`] falls back to the PIN prompt for the latter two.

use anyhow::Result;

/// Device biometric challenge
pub trait BiometricPrompt: Send + Sync {
    /// Whether biometric authentication is available on this device
    fn is_available(&self) -> bool;

    /// Present the challenge; Ok(true) means the user passed it
    fn challenge(&self, reason: &str) -> Result<bool>;
}

/// Prompt stub that reports biometrics unavailable, for tests and headless
/// builds
#[derive(Default)]
pub struct NullBiometrics;

impl BiometricPrompt for NullBiometrics {
    fn is_available(&self) -> bool {
        false
    }

    fn challenge(&self, _reason: &str) -> Result<bool> {
        Ok(false)
    }
}
