//! AppService facade for UniFFI export
//!
//! The single entry point for Swift/Kotlin shells. Wraps session bootstrap,
//! sign-in flows, the message screens, and push routing behind an
//! FFI-friendly API, and adapts the platform callback interfaces into the
//! internal capability traits.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::api::{Api, ApiClient, ApiError, ProfileUpdate};
use crate::auth::GoogleAuthFlow;
use crate::config::{ApiConfig, GoogleOauthConfig};
use crate::ffi::types::*;
use crate::inbox;
use crate::models::{Message, MessageId, ThreadId, UserId};
use crate::platform::{BiometricPrompt, FileSecureStore, PREMIUM_ENTITLEMENT, PurchaseProvider};
use crate::push;
use crate::session::{self, AppState, Services};

/// Adapts the platform purchase callback into [`PurchaseProvider`]
struct BridgedPurchases(Box<dyn PurchaseBridge>);

impl PurchaseProvider for BridgedPurchases {
    fn log_in(&self, user_id: &UserId) -> anyhow::Result<()> {
        if self.0.log_in(user_id.as_str().to_string()) {
            Ok(())
        } else {
            anyhow::bail!("Purchase provider rejected log-in")
        }
    }

    fn log_out(&self) -> anyhow::Result<()> {
        if self.0.log_out() {
            Ok(())
        } else {
            anyhow::bail!("Purchase provider rejected log-out")
        }
    }

    fn active_entitlements(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.0.active_entitlements())
    }
}

/// Adapts the platform biometric callback into [`BiometricPrompt`]
struct BridgedBiometrics(Box<dyn BiometricBridge>);

impl BiometricPrompt for BridgedBiometrics {
    fn is_available(&self) -> bool {
        self.0.is_available()
    }

    fn challenge(&self, reason: &str) -> anyhow::Result<bool> {
        Ok(self.0.challenge(reason.to_string()))
    }
}

/// Main service object for the Pigeon client core
///
/// This is the primary entry point for Swift/Kotlin code. One instance lives
/// for the whole process; all methods are thread-safe.
#[derive(uniffi::Object)]
pub struct AppService {
    client: Arc<ApiClient>,
    services: Services,
    state: Arc<AppState>,
    google: Option<GoogleAuthFlow>,
    inbox_cache: RwLock<Vec<Message>>,
    sent_cache: RwLock<Vec<Message>>,
}

#[uniffi::export]
impl AppService {
    /// Create the service, wiring in the platform purchase and biometric
    /// bridges.
    ///
    /// Loads endpoint and OAuth configuration from the config directory and
    /// opens the secure credential store.
    #[uniffi::constructor]
    pub fn new(
        purchases: Box<dyn PurchaseBridge>,
        biometrics: Box<dyn BiometricBridge>,
    ) -> Result<Arc<Self>, ClientError> {
        config::init().map_err(|e| ClientError::Storage {
            message: format!("Failed to initialize config directory: {}", e),
        })?;

        let secure = Arc::new(FileSecureStore::open_default().map_err(|e| ClientError::Storage {
            message: format!("Failed to open credential store: {}", e),
        })?);

        let api_config = ApiConfig::load();
        let client = Arc::new(ApiClient::new(api_config.base_url, secure.clone()));
        let google = GoogleOauthConfig::load().map(|c| GoogleAuthFlow::new(c.client_id));

        let services = Services {
            api: client.clone(),
            secure,
            purchases: Arc::new(BridgedPurchases(purchases)),
            biometrics: Arc::new(BridgedBiometrics(biometrics)),
        };

        Ok(Arc::new(Self {
            client,
            services,
            state: Arc::new(AppState::new()),
            google,
            inbox_cache: RwLock::new(Vec::new()),
            sent_cache: RwLock::new(Vec::new()),
        }))
    }

    // ========================================================================
    // Session
    // ========================================================================

    /// Run the startup bootstrap.
    ///
    /// Restores a stored session if one exists and reconciles it with the
    /// backend, bounded by the startup deadline. Never fails: any
    /// critical-path problem resolves to a signed-out result.
    pub fn bootstrap(&self) -> FfiBootstrapResult {
        session::bootstrap(&self.state, &self.services).into()
    }

    /// Sign in with email and password
    pub fn sign_in_with_password(
        &self,
        email: String,
        password: String,
    ) -> Result<FfiBootstrapResult, ClientError> {
        let outcome = crate::auth::sign_in_with_password(
            &self.client,
            &self.state,
            &self.services,
            &email,
            &password,
        )?;
        Ok(outcome.into())
    }

    /// Sign in with Google via the browser OAuth flow.
    ///
    /// Blocks until the browser leg completes. Fails with `InvalidArgument`
    /// when no Google client ID is configured.
    pub fn sign_in_with_google(&self) -> Result<FfiBootstrapResult, ClientError> {
        let flow = self.google.as_ref().ok_or_else(|| ClientError::InvalidArgument {
            message: "Google sign-in is not configured".to_string(),
        })?;
        let outcome =
            crate::auth::sign_in_with_google(&self.client, &self.state, &self.services, flow)?;
        Ok(outcome.into())
    }

    /// Sign in with an Apple identity token obtained by the platform shell
    pub fn sign_in_with_apple(
        &self,
        identity_token: String,
    ) -> Result<FfiBootstrapResult, ClientError> {
        let outcome = crate::auth::sign_in_with_apple(
            &self.client,
            &self.state,
            &self.services,
            &identity_token,
        )?;
        Ok(outcome.into())
    }

    /// Sign out: best-effort backend and purchase-provider cleanup, then
    /// local teardown. Never fails.
    pub fn sign_out(&self) {
        session::sign_out(&self.state, &self.services);
        self.clear_caches();
    }

    /// Tri-state authentication flag: `None` only while [`Self::bootstrap`]
    /// has not yet resolved
    pub fn is_authenticated(&self) -> Option<bool> {
        self.state.is_authenticated()
    }

    /// Whether the app-lock overlay must be shown
    pub fn is_locked(&self) -> bool {
        self.state.is_locked()
    }

    /// Whether the premium entitlement is active
    pub fn is_premium(&self) -> bool {
        self.state.is_premium()
    }

    // ========================================================================
    // App Lock
    // ========================================================================

    /// Verify a PIN against the backend; success releases the app lock
    pub fn verify_pin(&self, pin: String) -> Result<(), ClientError> {
        session::verify_pin(&self.state, self.services.api.as_ref(), &pin)
            .map_err(ClientError::from)
    }

    /// Enable or disable biometric unlock for the signed-in user
    pub fn set_biometric_unlock(&self, enabled: bool) -> Result<(), ClientError> {
        let user = self.state.current_user().ok_or(ClientError::Unauthorized)?;
        session::set_biometric_unlock(self.services.secure.as_ref(), &user.id, enabled)
            .map_err(ClientError::from)
    }

    /// Whether the signed-in user has opted in to biometric unlock
    pub fn is_biometric_unlock_enabled(&self) -> bool {
        self.state
            .current_user()
            .map(|u| session::biometric_opt_in(self.services.secure.as_ref(), &u.id))
            .unwrap_or(false)
    }

    // ========================================================================
    // Profile
    // ========================================================================

    /// Clone of the cached user profile
    pub fn current_user(&self) -> Option<FfiUser> {
        self.state.current_user().map(FfiUser::from)
    }

    /// Refetch the profile from the backend and replace the cache.
    ///
    /// A rejected session triggers an automatic sign-out.
    pub fn refresh_profile(&self) -> Result<FfiUser, ClientError> {
        let user = self.auth_guarded(self.client.fetch_me())?;
        self.state.replace_user(user.clone());
        Ok(user.into())
    }

    /// Update profile fields; the backend returns the full replacement
    /// profile, which becomes the new cache
    pub fn update_profile(
        &self,
        display_name: Option<String>,
        notifications_enabled: Option<bool>,
        timezone: Option<String>,
    ) -> Result<FfiUser, ClientError> {
        let update = ProfileUpdate {
            display_name,
            notifications_enabled,
            timezone,
        };
        let user = self.auth_guarded(self.client.update_profile(&update))?;
        self.state.replace_user(user.clone());
        Ok(user.into())
    }

    // ========================================================================
    // Inbox / Sent
    // ========================================================================

    /// Refetch the inbox and return it with the local read overlay applied
    pub fn refresh_inbox(&self) -> Result<Vec<FfiMessage>, ClientError> {
        let messages = self.auth_guarded(self.client.list_inbox())?;
        if let Ok(mut cache) = self.inbox_cache.write() {
            *cache = messages;
        }
        Ok(self.inbox_snapshot())
    }

    /// Filter the cached inbox by a case-insensitive substring query.
    ///
    /// An empty or whitespace-only query returns the full inbox.
    pub fn filter_inbox(&self, query: String) -> Vec<FfiMessage> {
        let cache = match self.inbox_cache.read() {
            Ok(cache) => cache,
            Err(_) => return Vec::new(),
        };
        inbox::filter_messages(&cache, &query)
            .into_iter()
            .cloned()
            .map(|m| self.with_overlay(m))
            .collect()
    }

    /// Refetch sent messages and return them grouped into sent-view rows
    pub fn refresh_sent(&self) -> Result<Vec<FfiGroupedMessage>, ClientError> {
        let messages = self.auth_guarded(self.client.list_sent())?;
        let groups = inbox::group_sent_messages(&messages);
        if let Ok(mut cache) = self.sent_cache.write() {
            *cache = messages;
        }
        Ok(groups.into_iter().map(FfiGroupedMessage::from).collect())
    }

    /// Filter cached sent messages, then group the matches into rows
    pub fn filter_sent(&self, query: String) -> Vec<FfiGroupedMessage> {
        let cache = match self.sent_cache.read() {
            Ok(cache) => cache,
            Err(_) => return Vec::new(),
        };
        let matches: Vec<Message> = inbox::filter_messages(&cache, &query)
            .into_iter()
            .cloned()
            .collect();
        inbox::group_sent_messages(&matches)
            .into_iter()
            .map(FfiGroupedMessage::from)
            .collect()
    }

    /// Fetch a full thread by ID
    pub fn get_thread(&self, thread_id: String) -> Result<FfiThread, ClientError> {
        let thread = self.auth_guarded(self.client.get_thread(&ThreadId::new(thread_id)))?;
        Ok(thread.into())
    }

    /// Fetch a single message by ID
    pub fn get_message(&self, message_id: String) -> Result<FfiMessage, ClientError> {
        let message = self.auth_guarded(self.client.get_message(&MessageId::new(message_id)))?;
        Ok(self.with_overlay(message))
    }

    /// Optimistically delete messages from the inbox.
    ///
    /// Returns the updated inbox. On failure the inbox is unchanged and the
    /// error carries user-presentable text.
    pub fn delete_messages(&self, ids: Vec<String>) -> Result<Vec<FfiMessage>, ClientError> {
        let ids: Vec<MessageId> = ids.into_iter().map(MessageId::new).collect();
        if let Ok(mut cache) = self.inbox_cache.write() {
            inbox::delete_messages(self.services.api.as_ref(), &mut cache, &ids)?;
        }
        Ok(self.inbox_snapshot())
    }

    /// Optimistically mark inbox messages as read.
    ///
    /// Returns the updated inbox. On failure the inbox is unchanged.
    pub fn mark_messages_read(&self, ids: Vec<String>) -> Result<Vec<FfiMessage>, ClientError> {
        let ids: Vec<MessageId> = ids.into_iter().map(MessageId::new).collect();
        if let Ok(mut cache) = self.inbox_cache.write() {
            inbox::mark_messages_read(
                self.services.api.as_ref(),
                &mut cache,
                self.state.unread(),
                &ids,
            )?;
        }
        Ok(self.inbox_snapshot())
    }

    // ========================================================================
    // Unread Count
    // ========================================================================

    /// Last known unread count; advisory, may be stale
    pub fn unread_count(&self) -> u32 {
        self.state.unread().count()
    }

    /// Refetch the unread count from the backend
    pub fn refresh_unread(&self) -> Result<u32, ClientError> {
        self.state
            .unread()
            .refresh(self.services.api.as_ref())
            .map_err(ClientError::from)
    }

    /// User-presentable text for the last unread refresh failure, if any
    pub fn unread_error(&self) -> Option<String> {
        self.state.unread().last_error()
    }

    // ========================================================================
    // Purchases
    // ========================================================================

    /// Entry point for the purchase provider's entitlement listener.
    ///
    /// The shell calls this whenever the provider reports a change; the
    /// premium flag follows the latest report.
    pub fn apply_entitlements(&self, entitlements: Vec<String>) {
        let is_premium = entitlements.iter().any(|e| e == PREMIUM_ENTITLEMENT);
        self.state.set_premium(is_premium);
    }

    /// Public pricing tiers; available before sign-in
    pub fn pricing_tiers(&self) -> Result<Vec<FfiPricingTier>, ClientError> {
        let tiers = self.client.pricing_tiers().map_err(ClientError::from)?;
        Ok(tiers.into_iter().map(FfiPricingTier::from).collect())
    }

    // ========================================================================
    // Push
    // ========================================================================

    /// Derive the navigation route for a notification data payload.
    ///
    /// Returns `None` for display-only payloads.
    pub fn handle_push_payload(&self, data: HashMap<String, String>) -> Option<FfiPushRoute> {
        push::route_for_payload(&data).map(FfiPushRoute::from)
    }

    /// Register this device's push token with the backend (best-effort)
    pub fn register_push_token(&self, token: String) {
        push::register_push_token(self.services.api.as_ref(), &token);
    }

    /// Unregister this device's push token (best-effort)
    pub fn unregister_push_token(&self) {
        push::unregister_push_token(self.services.api.as_ref());
    }
}

impl AppService {
    /// Map a backend result into a ClientError, signing out on a rejected
    /// session: a 401 on an authenticated screen means the session is dead.
    fn auth_guarded<T>(&self, result: Result<T, ApiError>) -> Result<T, ClientError> {
        match result {
            Err(e) if e.is_unauthorized() => {
                session::sign_out(&self.state, &self.services);
                self.clear_caches();
                Err(ClientError::Unauthorized)
            }
            other => other.map_err(ClientError::from),
        }
    }

    /// Apply the local read overlay to a message
    fn with_overlay(&self, mut message: Message) -> FfiMessage {
        if self.state.unread().is_read_locally(&message.id) {
            message.is_read = true;
        }
        message.into()
    }

    /// Current inbox cache with the read overlay applied
    fn inbox_snapshot(&self) -> Vec<FfiMessage> {
        let cache = match self.inbox_cache.read() {
            Ok(cache) => cache,
            Err(_) => return Vec::new(),
        };
        cache
            .iter()
            .cloned()
            .map(|m| self.with_overlay(m))
            .collect()
    }

    fn clear_caches(&self) {
        if let Ok(mut cache) = self.inbox_cache.write() {
            cache.clear();
        }
        if let Ok(mut cache) = self.sent_cache.write() {
            cache.clear();
        }
    }
}

// ============================================================================
// Free Functions
// ============================================================================

/// Install the forwarding logger and register the platform callback.
///
/// Call once at startup, before constructing [`AppService`].
#[uniffi::export]
pub fn initialize_logging(callback: Box<dyn LogCallback>, max_level: FfiLogLevel) {
    let level = log::Level::from(max_level);
    if super::logging::init_ffi_logger(level).is_err() {
        // A logger is already installed; still wire up the callback
        super::logging::set_log_level(level);
    }
    super::logging::set_log_callback(Some(Arc::from(callback)));
}

/// Update the maximum forwarded log level
#[uniffi::export]
pub fn set_logging_level(max_level: FfiLogLevel) {
    super::logging::set_log_level(log::Level::from(max_level));
}
