//! Domain models for the Pigeon client

mod message;
mod pricing;
mod user;

pub use message::{Address, GroupedMessage, Message, MessageId, Thread, ThreadId};
pub use pricing::PricingTier;
pub use user::{MembershipTier, User, UserId};
