//! Pigeon crate - Client core for the Pigeon messaging service
//!
//! This crate provides platform-independent client functionality including:
//! - Domain models (User, Message, Thread, pricing tiers)
//! - Backend API client and sign-in flows (password, Google, Apple)
//! - Session bootstrap with a hard startup deadline
//! - App lock (PIN + biometric) sequencing
//! - Inbox/sent list logic with optimistic mutations
//! - Push payload routing
//!
//! This crate has zero UI dependencies; the Swift/Kotlin shells consume it
//! through the UniFFI bindings in [`ffi`].

pub mod api;
pub mod auth;
pub mod config;
pub mod ffi;
pub mod inbox;
pub mod models;
pub mod platform;
pub mod push;
pub mod session;
pub mod store;

pub use api::{Api, ApiClient, ApiError, ProfileUpdate, TokenPair, user_message};
pub use auth::{AuthorizationCode, GoogleAuthFlow};
pub use inbox::{
    OptimisticBatch, delete_messages, filter_messages, group_sent_messages, mark_messages_read,
};
pub use models::{
    Address, GroupedMessage, MembershipTier, Message, MessageId, PricingTier, Thread, ThreadId,
    User, UserId,
};
pub use push::{PushRoute, route_for_payload};
pub use session::{
    AppState, BootstrapOutcome, Services, Session, bootstrap, complete_sign_in, sign_out,
    verify_pin,
};
pub use store::UnreadStore;

uniffi::setup_scaffolding!();
