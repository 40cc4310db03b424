//! Process-wide client-side caches

mod unread;

pub use unread::UnreadStore;
