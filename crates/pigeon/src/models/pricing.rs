//! Public pricing-tier metadata
//!
//! Served from an unauthenticated endpoint so the pricing screen can render
//! before sign-in.

use serde::{Deserialize, Serialize};

/// A purchasable subscription tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingTier {
    /// Tier identifier, matches [`crate::models::MembershipTier::id`]
    pub id: String,
    /// Display name of the tier
    pub name: String,
    /// Price in the smallest currency unit (e.g., cents)
    pub price_cents: u32,
    /// ISO 4217 currency code
    pub currency: String,
    /// Billing interval ("month" or "year")
    pub interval: String,
    /// Marketing feature bullet points
    pub features: Vec<String>,
}
