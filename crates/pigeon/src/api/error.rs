//! Typed API errors and user-facing message translation
//!
//! Every error that reaches a screen goes through [`user_message`] first, so
//! the shells never display a raw transport or backend error. Unmapped
//! backend codes fall back to a generic message.

/// Error from a backend API call
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend rejected the bearer token (HTTP 401)
    #[error("Authentication required")]
    Unauthorized,

    /// The backend returned a non-2xx status with an error envelope
    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The request never produced an HTTP response
    #[error("Network error: {message}")]
    Network { message: String },

    /// The response body could not be parsed
    #[error("Failed to decode response: {message}")]
    Decode { message: String },
}

impl ApiError {
    /// Whether this error should force a sign-out when hit on the critical
    /// session path (token restore, profile refresh).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// Generic fallback shown when no specific translation exists
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

/// Translate an API error into user-facing text.
///
/// Known backend error codes map to specific copy; everything else falls
/// back to [`GENERIC_ERROR`].
pub fn user_message(err: &ApiError) -> String {
    match err {
        ApiError::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
        ApiError::Network { .. } => {
            "Couldn't reach the server. Check your connection and try again.".to_string()
        }
        ApiError::Api { code: Some(code), .. } => match code.as_str() {
            "invalid_credentials" => "Incorrect email or password.".to_string(),
            "invalid_pin" => "That PIN is incorrect. Please try again.".to_string(),
            "message_not_found" => "That message is no longer available.".to_string(),
            "tier_limit_reached" => "You've reached your plan's daily message limit.".to_string(),
            "rate_limited" => "You're doing that too quickly. Please wait a moment.".to_string(),
            "email_taken" => "That email address is already in use.".to_string(),
            _ => GENERIC_ERROR.to_string(),
        },
        _ => GENERIC_ERROR.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_code_translates() {
        let err = ApiError::Api {
            status: 422,
            code: Some("invalid_pin".to_string()),
            message: "pin mismatch".to_string(),
        };
        assert_eq!(user_message(&err), "That PIN is incorrect. Please try again.");
    }

    #[test]
    fn test_unknown_code_falls_back() {
        let err = ApiError::Api {
            status: 500,
            code: Some("wat".to_string()),
            message: "internal".to_string(),
        };
        assert_eq!(user_message(&err), GENERIC_ERROR);
    }

    #[test]
    fn test_missing_code_falls_back() {
        let err = ApiError::Api {
            status: 500,
            code: None,
            message: "internal".to_string(),
        };
        assert_eq!(user_message(&err), GENERIC_ERROR);
    }

}
