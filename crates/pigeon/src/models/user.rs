//! User profile model
//!
//! The user is a server-owned snapshot. The client keeps it as a read-mostly
//! cache and always replaces it wholesale from the backend after mutations,
//! never patches individual fields locally.

use serde::{Deserialize, Serialize};

/// Unique identifier for a user (backend-assigned)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Membership tier attached to a user, with per-tier limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipTier {
    /// Tier identifier (e.g., "free", "premium")
    pub id: String,
    /// Display name of the tier
    pub name: String,
    /// Maximum messages the user may send per day (None = unlimited)
    pub daily_message_limit: Option<u32>,
    /// How far back thread history is available, in days (None = unlimited)
    pub thread_history_days: Option<u32>,
}

/// Server-owned user profile snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Backend user ID
    pub id: UserId,
    /// Account email address
    pub email: String,
    /// Display name shown in the UI
    pub display_name: Option<String>,
    /// Whether push notifications are enabled for this account
    pub notifications_enabled: bool,
    /// IANA timezone name (e.g., "America/New_York")
    pub timezone: String,
    /// Whether the user has a PIN configured (gates the app lock)
    pub has_pin: bool,
    /// Whether the account requests an automatic check-in on launch
    pub auto_check_in: bool,
    /// Current membership tier
    pub tier: MembershipTier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_round_trips_through_json() {
        let json = r#"{
            "id": "u_123",
            "email": "pat@example.com",
            "display_name": "Pat",
            "notifications_enabled": true,
            "timezone": "America/New_York",
            "has_pin": true,
            "auto_check_in": false,
            "tier": {
                "id": "premium",
                "name": "Premium",
                "daily_message_limit": null,
                "thread_history_days": 365
            }
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id.as_str(), "u_123");
        assert!(user.has_pin);
        assert_eq!(user.tier.id, "premium");
        assert_eq!(user.tier.daily_message_limit, None);
        assert_eq!(user.tier.thread_history_days, Some(365));
    }
}
