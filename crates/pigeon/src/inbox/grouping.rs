//! Sent-view message grouping
//!
//! The backend stores one message per recipient for multi-recipient sends.
//! The sent view collapses messages sharing the same (sent_at, subject) key
//! into one row. The key is an equality heuristic carried over from the
//! backend's data model: genuinely distinct messages sent in the same
//! instant with the same subject will merge, and that approximation is
//! accepted rather than corrected server-side.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::{Address, GroupedMessage, Message};

/// Group sent messages by their (sent_at, subject) key, preserving
/// first-seen order.
///
/// Each underlying message contributes one recipient and one message ID to
/// its group, so `recipients.len() == all_message_ids.len()` always holds.
pub fn group_sent_messages(messages: &[Message]) -> Vec<GroupedMessage> {
    let mut groups: Vec<GroupedMessage> = Vec::new();
    let mut index: HashMap<(DateTime<Utc>, &str), usize> = HashMap::new();

    for message in messages {
        let recipient = message
            .recipients
            .first()
            .cloned()
            .unwrap_or_else(|| Address::new("unknown@unknown.com"));

        match index.get(&(message.sent_at, message.subject.as_str())) {
            Some(&i) => {
                let group = &mut groups[i];
                group.recipients.push(recipient);
                group.all_message_ids.push(message.id.clone());
            }
            None => {
                index.insert((message.sent_at, message.subject.as_str()), groups.len());
                groups.push(GroupedMessage {
                    subject: message.subject.clone(),
                    sent_at: message.sent_at,
                    recipients: vec![recipient],
                    all_message_ids: vec![message.id.clone()],
                    body: message.body.clone(),
                });
            }
        }
    }

    groups
}
