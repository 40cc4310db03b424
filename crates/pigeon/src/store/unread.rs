//! Unread-count cache
//!
//! A small process-wide cache of the unread-message counter plus the set of
//! message IDs optimistically marked read client-side. The overlay papers
//! over backend read-state propagation latency; it is advisory only, and the
//! authoritative count always comes from a refetch.

use std::collections::HashSet;
use std::sync::RwLock;

use log::warn;

use crate::api::{Api, ApiError, user_message};
use crate::models::MessageId;

#[derive(Default)]
struct Inner {
    count: u32,
    locally_read: HashSet<MessageId>,
    last_error: Option<String>,
}

/// Cache of {unread counter, optimistically-read message IDs}
///
/// Concurrent refreshes are not deduplicated; the last response to land
/// wins, with no ordering guarantee enforced.
#[derive(Default)]
pub struct UnreadStore {
    inner: RwLock<Inner>,
}

impl UnreadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last counter value fetched from the backend
    pub fn count(&self) -> u32 {
        self.inner.read().map(|i| i.count).unwrap_or(0)
    }

    /// The translated error from the most recent failed refresh, if the
    /// counter currently shown is stale
    pub fn last_error(&self) -> Option<String> {
        self.inner.read().ok().and_then(|i| i.last_error.clone())
    }

    /// Refetch the counter from the backend.
    ///
    /// On success the counter is replaced; on failure the previous value is
    /// kept and a translated error string is recorded.
    pub fn refresh(&self, api: &dyn Api) -> Result<u32, ApiError> {
        match api.unread_count() {
            Ok(count) => {
                if let Ok(mut inner) = self.inner.write() {
                    inner.count = count;
                    inner.last_error = None;
                }
                Ok(count)
            }
            Err(e) => {
                warn!("Unread count refresh failed: {}", e);
                if let Ok(mut inner) = self.inner.write() {
                    inner.last_error = Some(user_message(&e));
                }
                Err(e)
            }
        }
    }

    /// Record a message as read locally, before/without server confirmation.
    ///
    /// Used to suppress unread styling while the read-receipt call is in
    /// flight.
    pub fn mark_read_local(&self, id: &MessageId) {
        if let Ok(mut inner) = self.inner.write() {
            inner.locally_read.insert(id.clone());
        }
    }

    /// Whether a message has been optimistically marked read this process
    pub fn is_read_locally(&self, id: &MessageId) -> bool {
        self.inner
            .read()
            .map(|i| i.locally_read.contains(id))
            .unwrap_or(false)
    }

    /// Drop all cached state (on sign-out)
    pub fn reset(&self) {
        if let Ok(mut inner) = self.inner.write() {
            *inner = Inner::default();
        }
    }
}
