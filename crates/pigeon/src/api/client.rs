//! HTTP client for the Pigeon backend
//!
//! Uses synchronous HTTP (ureq) to be executor-agnostic. Every authenticated
//! call reads the bearer token from the secure store at request time, so a
//! token refresh never requires rebuilding the client.

use std::sync::Arc;
use std::time::Duration;

use log::warn;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::wire::{ErrorBody, ListMessagesResponse, UnreadCountResponse};
use super::{Api, ApiError};
use crate::models::{Message, MessageId, PricingTier, Thread, ThreadId, User};
use crate::platform::{SecureStore, keys};

/// Backend-issued token pair returned by every sign-in exchange
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Partial profile update sent to the backend.
///
/// The response is always the full replacement profile; the client never
/// patches its cached user locally.
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// HTTP client for the Pigeon backend
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
    secure: Arc<dyn SecureStore>,
}

impl ApiClient {
    /// Per-request timeout. Distinct from the bootstrap deadline, which
    /// bounds the whole startup sequence.
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

    /// Create a new client against the given base URL (no trailing slash)
    pub fn new(base_url: impl Into<String>, secure: Arc<dyn SecureStore>) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(Self::REQUEST_TIMEOUT))
            .build()
            .into();

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            agent,
            base_url,
            secure,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Read the bearer header value from the secure store.
    ///
    /// A missing or unreadable token is reported as `Unauthorized`: the call
    /// could not have been authenticated either way.
    fn bearer(&self) -> Result<String, ApiError> {
        let token = match self.secure.get(keys::ACCESS_TOKEN) {
            Ok(token) => token,
            Err(e) => {
                warn!("Failed to read access token from secure storage: {}", e);
                None
            }
        };
        token
            .map(|t| format!("Bearer {}", t))
            .ok_or(ApiError::Unauthorized)
    }

    fn transport(e: ureq::Error) -> ApiError {
        ApiError::Network {
            message: e.to_string(),
        }
    }

    fn decode(e: ureq::Error) -> ApiError {
        ApiError::Decode {
            message: e.to_string(),
        }
    }

    /// Convert a non-2xx response into an `ApiError`, reading the backend
    /// error envelope where one is present.
    fn read_error(resp: &mut ureq::http::Response<ureq::Body>) -> ApiError {
        let status = resp.status().as_u16();
        if status == 401 {
            return ApiError::Unauthorized;
        }
        let body: ErrorBody = resp.body_mut().read_json().unwrap_or_default();
        ApiError::Api {
            status,
            code: body.error.code,
            message: body
                .error
                .message
                .unwrap_or_else(|| "unknown error".to_string()),
        }
    }

    fn read_json<T: DeserializeOwned>(
        mut resp: ureq::http::Response<ureq::Body>,
    ) -> Result<T, ApiError> {
        if !resp.status().is_success() {
            return Err(Self::read_error(&mut resp));
        }
        resp.body_mut().read_json().map_err(Self::decode)
    }

    fn discard_body(mut resp: ureq::http::Response<ureq::Body>) -> Result<(), ApiError> {
        if !resp.status().is_success() {
            return Err(Self::read_error(&mut resp));
        }
        Ok(())
    }

    fn get_authed<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self
            .agent
            .get(&self.url(path))
            .header("Authorization", &self.bearer()?)
            .call()
            .map_err(Self::transport)?;
        Self::read_json(resp)
    }

    fn post_authed_empty(&self, path: &str) -> Result<(), ApiError> {
        let resp = self
            .agent
            .post(&self.url(path))
            .header("Authorization", &self.bearer()?)
            .send_empty()
            .map_err(Self::transport)?;
        Self::discard_body(resp)
    }

    // === Authentication ===

    /// Exchange email/password credentials for a token pair
    pub fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<TokenPair, ApiError> {
        let resp = self
            .agent
            .post(&self.url("/auth/sign_in"))
            .send_json(serde_json::json!({
                "email": email,
                "password": password,
            }))
            .map_err(Self::transport)?;
        Self::read_json(resp)
    }

    /// Exchange a Google OAuth authorization code for a token pair
    pub fn exchange_google_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenPair, ApiError> {
        let resp = self
            .agent
            .post(&self.url("/auth/google"))
            .send_json(serde_json::json!({
                "code": code,
                "redirect_uri": redirect_uri,
            }))
            .map_err(Self::transport)?;
        Self::read_json(resp)
    }

    /// Exchange an Apple identity token for a token pair
    pub fn exchange_apple_identity(&self, identity_token: &str) -> Result<TokenPair, ApiError> {
        let resp = self
            .agent
            .post(&self.url("/auth/apple"))
            .send_json(serde_json::json!({
                "identity_token": identity_token,
            }))
            .map_err(Self::transport)?;
        Self::read_json(resp)
    }

    // === Profile ===

    /// Replace the user profile wholesale and return the new snapshot
    pub fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let resp = self
            .agent
            .put(&self.url("/users/me"))
            .header("Authorization", &self.bearer()?)
            .send_json(update)
            .map_err(Self::transport)?;
        Self::read_json(resp)
    }

    // === Messaging ===

    /// List the user's inbox messages, newest first
    pub fn list_inbox(&self) -> Result<Vec<Message>, ApiError> {
        let list: ListMessagesResponse = self.get_authed("/messages?mailbox=inbox")?;
        Ok(list.messages)
    }

    /// List the user's sent messages, newest first.
    ///
    /// Multi-recipient sends appear as one message per recipient; the sent
    /// view groups them client-side.
    pub fn list_sent(&self) -> Result<Vec<Message>, ApiError> {
        let list: ListMessagesResponse = self.get_authed("/messages?mailbox=sent")?;
        Ok(list.messages)
    }

    /// Fetch a full thread with its messages
    pub fn get_thread(&self, id: &ThreadId) -> Result<Thread, ApiError> {
        self.get_authed(&format!("/threads/{}", id.as_str()))
    }

    /// Fetch a single message
    pub fn get_message(&self, id: &MessageId) -> Result<Message, ApiError> {
        self.get_authed(&format!("/messages/{}", id.as_str()))
    }

    // === Pricing ===

    /// Fetch public pricing-tier metadata (no authentication)
    pub fn pricing_tiers(&self) -> Result<Vec<PricingTier>, ApiError> {
        let resp = self
            .agent
            .get(&self.url("/pricing/tiers"))
            .call()
            .map_err(Self::transport)?;
        Self::read_json(resp)
    }
}

impl Api for ApiClient {
    fn fetch_me(&self) -> Result<User, ApiError> {
        self.get_authed("/users/me")
    }

    fn sign_out(&self) -> Result<(), ApiError> {
        self.post_authed_empty("/auth/sign_out")
    }

    fn verify_pin(&self, pin: &str) -> Result<(), ApiError> {
        let resp = self
            .agent
            .post(&self.url("/users/me/pin/verify"))
            .header("Authorization", &self.bearer()?)
            .send_json(serde_json::json!({ "pin": pin }))
            .map_err(Self::transport)?;
        Self::discard_body(resp)
    }

    fn check_in(&self) -> Result<(), ApiError> {
        self.post_authed_empty("/users/me/check_in")
    }

    fn unread_count(&self) -> Result<u32, ApiError> {
        let resp: UnreadCountResponse = self.get_authed("/messages/unread_count")?;
        Ok(resp.count)
    }

    fn delete_message(&self, id: &MessageId) -> Result<(), ApiError> {
        let resp = self
            .agent
            .delete(&self.url(&format!("/messages/{}", id.as_str())))
            .header("Authorization", &self.bearer()?)
            .call()
            .map_err(Self::transport)?;
        Self::discard_body(resp)
    }

    fn mark_read(&self, id: &MessageId) -> Result<(), ApiError> {
        self.post_authed_empty(&format!("/messages/{}/read", id.as_str()))
    }

    fn register_push_token(&self, token: &str) -> Result<(), ApiError> {
        let resp = self
            .agent
            .post(&self.url("/push/tokens"))
            .header("Authorization", &self.bearer()?)
            .send_json(serde_json::json!({ "token": token }))
            .map_err(Self::transport)?;
        Self::discard_body(resp)
    }

    fn unregister_push_token(&self) -> Result<(), ApiError> {
        let resp = self
            .agent
            .delete(&self.url("/push/tokens"))
            .header("Authorization", &self.bearer()?)
            .call()
            .map_err(Self::transport)?;
        Self::discard_body(resp)
    }
}
