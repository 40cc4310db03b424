//! Client-side message filtering
//!
//! A case-insensitive substring filter over subject, body, and the
//! participants' names and emails. Recomputed on every keystroke against the
//! full fetched list; there is no server-side search.

use crate::models::{Address, Message};

/// Filter a message list by a substring query.
///
/// An empty or whitespace-only query returns the full list.
pub fn filter_messages<'a>(messages: &'a [Message], query: &str) -> Vec<&'a Message> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return messages.iter().collect();
    }
    messages
        .iter()
        .filter(|m| matches_query(m, &query))
        .collect()
}

fn matches_query(message: &Message, query_lower: &str) -> bool {
    message.subject.to_lowercase().contains(query_lower)
        || message.body.to_lowercase().contains(query_lower)
        || address_matches(&message.sender, query_lower)
        || message
            .recipients
            .iter()
            .any(|r| address_matches(r, query_lower))
}

fn address_matches(address: &Address, query_lower: &str) -> bool {
    address.email.to_lowercase().contains(query_lower)
        || address
            .name
            .as_ref()
            .is_some_and(|n| n.to_lowercase().contains(query_lower))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MessageId, ThreadId};
    use chrono::Utc;

    fn make_message(id: &str, subject: &str, body: &str, sender: Address) -> Message {
        Message::builder(MessageId::new(id), ThreadId::new("t1"))
            .sender(sender)
            .recipients(vec![Address::new("me@example.com")])
            .subject(subject)
            .body(body)
            .sent_at(Utc::now())
            .build()
    }

    fn sample() -> Vec<Message> {
        vec![
            make_message(
                "m1",
                "Quarterly review",
                "Numbers attached",
                Address::with_name("Dana Hall", "dana@acme.com"),
            ),
            make_message(
                "m2",
                "Lunch?",
                "Thinking tacos",
                Address::with_name("Riley Fox", "riley@beta.io"),
            ),
            make_message(
                "m3",
                "Re: Quarterly review",
                "Looks good to me",
                Address::new("sam@acme.com"),
            ),
        ]
    }

    #[test]
    fn test_empty_query_returns_all() {
        let messages = sample();
        assert_eq!(filter_messages(&messages, "").len(), 3);
        assert_eq!(filter_messages(&messages, "   ").len(), 3);
    }

    #[test]
    fn test_filter_by_subject_is_case_insensitive() {
        let messages = sample();
        let hits = filter_messages(&messages, "quarterly");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_filter_by_body() {
        let messages = sample();
        let hits = filter_messages(&messages, "tacos");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_str(), "m2");
    }

    #[test]
    fn test_filter_by_party_email_returns_exactly_their_messages() {
        let messages = sample();
        // Substring present only in the other party's email
        let hits = filter_messages(&messages, "ACME.COM");
        let ids: Vec<&str> = hits.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m3"]);
    }

    #[test]
    fn test_filter_by_party_name() {
        let messages = sample();
        let hits = filter_messages(&messages, "riley f");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_str(), "m2");
    }

    #[test]
    fn test_no_matches() {
        let messages = sample();
        assert!(filter_messages(&messages, "zzz").is_empty());
    }
}
