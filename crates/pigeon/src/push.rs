//! Push-notification payload routing and token registration
//!
//! Consumes the data payload contract: `thread_id` + `message_id` routes to
//! a specific thread, `screen` routes to a named top-level destination, and
//! malformed or absent payloads are ignored.

use std::collections::HashMap;

use log::warn;

use crate::api::Api;
use crate::models::{MessageId, ThreadId};

/// Navigation target derived from a push payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushRoute {
    /// Open a specific message within a thread
    Thread {
        thread_id: ThreadId,
        message_id: MessageId,
    },
    /// Open a named top-level destination
    Screen(String),
}

/// Derive the navigation route for a notification data payload.
///
/// Returns None for payloads that carry neither a complete thread reference
/// nor a screen name; those notifications are display-only.
pub fn route_for_payload(data: &HashMap<String, String>) -> Option<PushRoute> {
    if let (Some(thread_id), Some(message_id)) = (data.get("thread_id"), data.get("message_id"))
        && !thread_id.is_empty()
        && !message_id.is_empty()
    {
        return Some(PushRoute::Thread {
            thread_id: ThreadId::new(thread_id.clone()),
            message_id: MessageId::new(message_id.clone()),
        });
    }

    if let Some(screen) = data.get("screen")
        && !screen.is_empty()
    {
        return Some(PushRoute::Screen(screen.clone()));
    }

    None
}

/// Register this device's push token with the backend. Best-effort: a
/// failure is logged and never surfaced.
pub fn register_push_token(api: &dyn Api, token: &str) {
    if let Err(e) = api.register_push_token(token) {
        warn!("Push token registration failed: {}", e);
    }
}

/// Unregister this device's push token. Best-effort, like registration.
pub fn unregister_push_token(api: &dyn Api) {
    if let Err(e) = api.unregister_push_token() {
        warn!("Push token unregistration failed: {}", e);
    }
}
