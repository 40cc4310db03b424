//! Purchase/entitlement provider interface
//!
//! Wraps the in-app purchase SDK: a remote customer identity keyed by the
//! backend user ID, and a set of active entitlement identifiers.

use anyhow::Result;

use crate::models::UserId;

/// Entitlement identifier that grants premium access
pub const PREMIUM_ENTITLEMENT: &str = "premium";

/// Remote purchase/entitlement provider
pub trait PurchaseProvider: Send + Sync {
    /// Associate the provider's customer identity with the backend user ID
    fn log_in(&self, user_id: &UserId) -> Result<()>;

    /// Detach the provider's customer identity
    fn log_out(&self) -> Result<()>;

    /// Fetch the currently active entitlement identifiers
    fn active_entitlements(&self) -> Result<Vec<String>>;
}

/// Provider stub with no entitlements, for tests and headless builds
#[derive(Default)]
pub struct NullPurchases;

impl PurchaseProvider for NullPurchases {
    fn log_in(&self, _user_id: &UserId) -> Result<()> {
        Ok(())
    }

    fn log_out(&self) -> Result<()> {
        Ok(())
    }

    fn active_entitlements(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}
