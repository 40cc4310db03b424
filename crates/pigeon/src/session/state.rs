//! Shared application state
//!
//! Session, user, entitlement flag, and the unread cache are process-wide
//! mutable state. Rather than hidden globals, they live in one explicit
//! container injected into every consumer, with mutation funneled through
//! the named action methods below. Any component may read; only the session
//! flows and explicit mutation actions write.

use std::sync::RwLock;

use crate::api::Api;
use crate::models::User;
use crate::store::UnreadStore;

/// The process-wide session.
///
/// `authenticated` is `None` only during initial bootstrap; it is
/// `Some(true)`/`Some(false)` thereafter.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub authenticated: Option<bool>,
}

#[derive(Default)]
struct Inner {
    session: Session,
    user: Option<User>,
    is_premium: bool,
    locked: bool,
}

/// Explicit application-state container shared by all screens
#[derive(Default)]
pub struct AppState {
    inner: RwLock<Inner>,
    unread: UnreadStore,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    // === Reads ===

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        self.inner
            .read()
            .map(|i| i.session.clone())
            .unwrap_or_default()
    }

    /// Tri-state authentication flag; `None` only during initial bootstrap
    pub fn is_authenticated(&self) -> Option<bool> {
        self.inner.read().ok().and_then(|i| i.session.authenticated)
    }

    /// Clone of the cached user profile
    pub fn current_user(&self) -> Option<User> {
        self.inner.read().ok().and_then(|i| i.user.clone())
    }

    /// Whether the premium entitlement is currently active
    pub fn is_premium(&self) -> bool {
        self.inner.read().map(|i| i.is_premium).unwrap_or(false)
    }

    /// Whether the app-lock overlay must be shown
    pub fn is_locked(&self) -> bool {
        self.inner.read().map(|i| i.locked).unwrap_or(false)
    }

    /// The unread-count cache
    pub fn unread(&self) -> &UnreadStore {
        &self.unread
    }

    // === Actions ===

    /// Start a session optimistically from a token pair.
    ///
    /// Marks the session authenticated before the profile fetch confirms it;
    /// a critical-path failure later reverts via [`Self::clear_session`].
    pub(crate) fn begin_session(&self, access_token: String, refresh_token: Option<String>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.session = Session {
                access_token: Some(access_token),
                refresh_token,
                authenticated: Some(true),
            };
        }
    }

    /// Resolve the bootstrap tri-state to signed-out without ever having had
    /// a session (no stored token on startup)
    pub(crate) fn mark_unauthenticated(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.session = Session {
                access_token: None,
                refresh_token: None,
                authenticated: Some(false),
            };
            inner.locked = false;
        }
    }

    /// Replace the cached user wholesale from a backend snapshot.
    ///
    /// Session-scoped: a write landing after the session was cleared (an
    /// abandoned bootstrap worker finishing late) is dropped.
    pub(crate) fn replace_user(&self, user: User) {
        if let Ok(mut inner) = self.inner.write()
            && inner.session.authenticated == Some(true)
        {
            inner.user = Some(user);
        }
    }

    /// Record the entitlement lookup result. Two writers race (post-login
    /// fetch and provider listener); last write wins. Session-scoped like
    /// [`Self::replace_user`].
    pub(crate) fn set_premium(&self, is_premium: bool) {
        if let Ok(mut inner) = self.inner.write()
            && inner.session.authenticated == Some(true)
        {
            inner.is_premium = is_premium;
        }
    }

    /// Refresh the unread cache from the backend.
    ///
    /// Session-scoped: if the session died while the fetch was in flight,
    /// the cache is reset rather than left repopulated.
    pub(crate) fn refresh_unread(&self, api: &dyn Api) {
        let _ = self.unread.refresh(api);
        if self.is_authenticated() != Some(true) {
            self.unread.reset();
        }
    }

    /// Set the app-lock flag. The lock can only be engaged while a session
    /// is authenticated.
    pub(crate) fn set_locked(&self, locked: bool) {
        if let Ok(mut inner) = self.inner.write() {
            inner.locked = locked && inner.session.authenticated == Some(true);
        }
    }

    /// Drop the session, user, entitlement, lock, and unread cache
    pub(crate) fn clear_session(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.session = Session {
                access_token: None,
                refresh_token: None,
                authenticated: Some(false),
            };
            inner.user = None;
            inner.is_premium = false;
            inner.locked = false;
        }
        self.unread.reset();
    }
}
