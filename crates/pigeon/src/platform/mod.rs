//! Platform capability interfaces
//!
//! The real secure storage, purchase, and biometric SDKs live in the mobile
//! shells. The core consumes them through these narrow traits so the session
//! bootstrap can be driven by fakes in tests and by FFI bridges in
//! production.

mod biometrics;
mod purchases;
mod secure;

pub use biometrics::{BiometricPrompt, NullBiometrics};
pub use purchases::{NullPurchases, PREMIUM_ENTITLEMENT, PurchaseProvider};
pub use secure::{FileSecureStore, InMemorySecureStore, SecureStore, keys};

use crate::models::UserId;

/// Secure-store key recording whether biometric unlock was opted into for a
/// given user ID. Stored as the strings "true"/"false".
pub fn biometric_opt_in_key(user_id: &UserId) -> String {
    format!("biometric_opt_in_{}", user_id.as_str())
}
