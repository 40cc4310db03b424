//! Inbox and sent-view logic
//!
//! List filtering, sent-message grouping, and optimistic mutations shared by
//! the inbox and thread screens. No rendering here; the shells consume these
//! through the service facade.

mod actions;
mod filter;
mod grouping;

pub use actions::{OptimisticBatch, delete_messages, mark_messages_read};
pub use filter::filter_messages;
pub use grouping::group_sent_messages;
