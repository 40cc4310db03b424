//! Backend REST API integration
//!
//! This module provides:
//! - A synchronous HTTP client for the Pigeon backend (executor-agnostic)
//! - Typed API errors with 401 detection
//! - Translation of backend error codes to user-facing text

mod client;
mod error;

pub use client::{ApiClient, ProfileUpdate, TokenPair};
pub use error::{ApiError, user_message};

use crate::models::{MessageId, User};

/// The narrow backend surface consumed by the session bootstrap, the unread
/// store, and the optimistic inbox actions.
///
/// [`ApiClient`] is the production implementation; tests substitute fakes so
/// the bootstrap sequence can be exercised without a network.
pub trait Api: Send + Sync {
    /// Fetch the current user's profile
    fn fetch_me(&self) -> Result<User, ApiError>;

    /// Invalidate the current session server-side
    fn sign_out(&self) -> Result<(), ApiError>;

    /// Verify the user's PIN against the backend
    fn verify_pin(&self, pin: &str) -> Result<(), ApiError>;

    /// Record an automatic check-in for the current user
    fn check_in(&self) -> Result<(), ApiError>;

    /// Fetch the authoritative unread-message count
    fn unread_count(&self) -> Result<u32, ApiError>;

    /// Delete a single message
    fn delete_message(&self, id: &MessageId) -> Result<(), ApiError>;

    /// Confirm a single message as read
    fn mark_read(&self, id: &MessageId) -> Result<(), ApiError>;

    /// Register a push-notification token for this device
    fn register_push_token(&self, token: &str) -> Result<(), ApiError>;

    /// Unregister this device's push-notification token
    fn unregister_push_token(&self) -> Result<(), ApiError>;
}

/// Backend wire types
pub mod wire {
    use serde::Deserialize;

    use crate::models::Message;

    /// Response from the message list endpoints
    #[derive(Debug, Deserialize)]
    pub struct ListMessagesResponse {
        pub messages: Vec<Message>,
    }

    /// Response from the unread-count endpoint
    #[derive(Debug, Deserialize)]
    pub struct UnreadCountResponse {
        pub count: u32,
    }

    /// Error envelope returned by the backend on non-2xx statuses
    #[derive(Debug, Default, Deserialize)]
    pub struct ErrorBody {
        #[serde(default)]
        pub error: ErrorDetail,
    }

    /// Error detail within the envelope
    #[derive(Debug, Default, Deserialize)]
    pub struct ErrorDetail {
        pub code: Option<String>,
        pub message: Option<String>,
    }
}
