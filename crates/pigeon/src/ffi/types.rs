//! FFI-friendly type wrappers for UniFFI export
//!
//! These types convert internal Rust types to FFI-compatible versions:
//! - `DateTime<Utc>` → `i64` (Unix timestamp)
//! - `UserId`/`MessageId`/`ThreadId` → `String`
//! - Internal errors → user-presentable error variants

use crate::api::{ApiError, user_message};
use crate::models::{Address, GroupedMessage, MembershipTier, Message, PricingTier, Thread, User};
use crate::push::PushRoute;
use crate::session::BootstrapOutcome;

// ============================================================================
// Error Types
// ============================================================================

/// FFI-friendly error type.
///
/// Every `message` carries user-presentable text, never raw transport or
/// backend detail. The shell can display it verbatim.
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ClientError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Authentication required")]
    Unauthorized,

    #[error("{message}")]
    Api { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl From<ApiError> for ClientError {
    fn from(e: ApiError) -> Self {
        let message = user_message(&e);
        match e {
            ApiError::Unauthorized => ClientError::Unauthorized,
            ApiError::Network { .. } => ClientError::Network { message },
            ApiError::Api { .. } | ApiError::Decode { .. } => ClientError::Api { message },
        }
    }
}

impl From<anyhow::Error> for ClientError {
    fn from(e: anyhow::Error) -> Self {
        // Typed backend errors keep their user-facing translation; anything
        // else is local storage or platform trouble.
        match e.downcast::<ApiError>() {
            Ok(api) => api.into(),
            Err(other) => ClientError::Storage {
                message: other.to_string(),
            },
        }
    }
}

// ============================================================================
// User Types
// ============================================================================

/// FFI-friendly membership tier
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMembershipTier {
    pub id: String,
    pub name: String,
    pub daily_message_limit: Option<u32>,
    pub thread_history_days: Option<u32>,
}

impl From<MembershipTier> for FfiMembershipTier {
    fn from(t: MembershipTier) -> Self {
        Self {
            id: t.id,
            name: t.name,
            daily_message_limit: t.daily_message_limit,
            thread_history_days: t.thread_history_days,
        }
    }
}

/// FFI-friendly user profile
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiUser {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub notifications_enabled: bool,
    pub timezone: String,
    pub has_pin: bool,
    pub auto_check_in: bool,
    pub tier: FfiMembershipTier,
}

impl From<User> for FfiUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id.0,
            email: u.email,
            display_name: u.display_name,
            notifications_enabled: u.notifications_enabled,
            timezone: u.timezone,
            has_pin: u.has_pin,
            auto_check_in: u.auto_check_in,
            tier: u.tier.into(),
        }
    }
}

// ============================================================================
// Message Types
// ============================================================================

/// FFI-friendly message participant
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAddress {
    pub name: Option<String>,
    pub email: String,
}

impl From<Address> for FfiAddress {
    fn from(a: Address) -> Self {
        Self {
            name: a.name,
            email: a.email,
        }
    }
}

/// FFI-friendly message representation
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMessage {
    pub id: String,
    pub thread_id: String,
    pub sender: FfiAddress,
    pub recipients: Vec<FfiAddress>,
    pub subject: String,
    pub body: String,
    /// Unix timestamp (seconds since epoch)
    pub sent_at: i64,
    pub is_read: bool,
}

impl From<Message> for FfiMessage {
    fn from(m: Message) -> Self {
        Self {
            id: m.id.0,
            thread_id: m.thread_id.0,
            sender: m.sender.into(),
            recipients: m.recipients.into_iter().map(FfiAddress::from).collect(),
            subject: m.subject,
            body: m.body,
            sent_at: m.sent_at.timestamp(),
            is_read: m.is_read,
        }
    }
}

/// FFI-friendly thread with its messages
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiThread {
    pub id: String,
    pub subject: String,
    pub messages: Vec<FfiMessage>,
}

impl From<Thread> for FfiThread {
    fn from(t: Thread) -> Self {
        Self {
            id: t.id.0,
            subject: t.subject,
            messages: t.messages.into_iter().map(FfiMessage::from).collect(),
        }
    }
}

/// FFI-friendly sent-view row: one row per (sent_at, subject) group
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiGroupedMessage {
    pub subject: String,
    /// Unix timestamp (seconds since epoch)
    pub sent_at: i64,
    pub recipients: Vec<FfiAddress>,
    pub all_message_ids: Vec<String>,
    pub body: String,
}

impl From<GroupedMessage> for FfiGroupedMessage {
    fn from(g: GroupedMessage) -> Self {
        Self {
            subject: g.subject,
            sent_at: g.sent_at.timestamp(),
            recipients: g.recipients.into_iter().map(FfiAddress::from).collect(),
            all_message_ids: g.all_message_ids.into_iter().map(|id| id.0).collect(),
            body: g.body,
        }
    }
}

// ============================================================================
// Pricing Types
// ============================================================================

/// FFI-friendly pricing tier
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPricingTier {
    pub id: String,
    pub name: String,
    pub price_cents: u32,
    pub currency: String,
    pub interval: String,
    pub features: Vec<String>,
}

impl From<PricingTier> for FfiPricingTier {
    fn from(t: PricingTier) -> Self {
        Self {
            id: t.id,
            name: t.name,
            price_cents: t.price_cents,
            currency: t.currency,
            interval: t.interval,
            features: t.features,
        }
    }
}

// ============================================================================
// Session Types
// ============================================================================

/// Outcome of a bootstrap or sign-in, telling the shell which screen to show.
///
/// `authenticated == false` means the sign-in screen. `locked == true` means
/// the PIN prompt; any biometric challenge has already run by the time this
/// value is produced.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBootstrapResult {
    pub authenticated: bool,
    pub locked: bool,
}

impl From<BootstrapOutcome> for FfiBootstrapResult {
    fn from(o: BootstrapOutcome) -> Self {
        match o {
            BootstrapOutcome::SignedOut => Self {
                authenticated: false,
                locked: false,
            },
            BootstrapOutcome::Ready { locked } => Self {
                authenticated: true,
                locked,
            },
        }
    }
}

// ============================================================================
// Push Types
// ============================================================================

/// FFI-friendly push navigation route
#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiPushRoute {
    Thread { thread_id: String, message_id: String },
    Screen { name: String },
}

impl From<PushRoute> for FfiPushRoute {
    fn from(r: PushRoute) -> Self {
        match r {
            PushRoute::Thread {
                thread_id,
                message_id,
            } => FfiPushRoute::Thread {
                thread_id: thread_id.0,
                message_id: message_id.0,
            },
            PushRoute::Screen(name) => FfiPushRoute::Screen { name },
        }
    }
}

// ============================================================================
// Platform Bridges
// ============================================================================

/// Callback interface backed by the platform purchase SDK
///
/// Boolean returns report success; the Rust side treats `false` as a
/// best-effort failure and logs it.
#[uniffi::export(callback_interface)]
pub trait PurchaseBridge: Send + Sync {
    /// Identify the purchase SDK session with the backend user ID
    fn log_in(&self, user_id: String) -> bool;
    /// Clear the purchase SDK session
    fn log_out(&self) -> bool;
    /// Currently active entitlement identifiers
    fn active_entitlements(&self) -> Vec<String>;
}

/// Callback interface backed by the platform biometric APIs
#[uniffi::export(callback_interface)]
pub trait BiometricBridge: Send + Sync {
    /// Whether biometric authentication is available on this device
    fn is_available(&self) -> bool;
    /// Present the biometric challenge; returns whether the user passed
    fn challenge(&self, reason: String) -> bool;
}

// ============================================================================
// Log Callback
// ============================================================================

/// Log level for FFI callback
#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<log::Level> for FfiLogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => FfiLogLevel::Error,
            log::Level::Warn => FfiLogLevel::Warn,
            log::Level::Info => FfiLogLevel::Info,
            log::Level::Debug => FfiLogLevel::Debug,
            log::Level::Trace => FfiLogLevel::Trace,
        }
    }
}

impl From<FfiLogLevel> for log::Level {
    fn from(level: FfiLogLevel) -> Self {
        match level {
            FfiLogLevel::Error => log::Level::Error,
            FfiLogLevel::Warn => log::Level::Warn,
            FfiLogLevel::Info => log::Level::Info,
            FfiLogLevel::Debug => log::Level::Debug,
            FfiLogLevel::Trace => log::Level::Trace,
        }
    }
}

/// Callback interface for receiving log messages from Rust
///
/// Swift should implement this using os_log/Logger for unified logging.
#[uniffi::export(callback_interface)]
pub trait LogCallback: Send + Sync {
    /// Called when a log message is emitted
    fn on_log(&self, level: FfiLogLevel, target: String, message: String);
}
