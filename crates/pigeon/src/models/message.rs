//! Message, thread, and sent-view grouping models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a message (backend message ID)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Unique identifier for a thread (backend thread ID)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadId(pub String);

impl ThreadId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ThreadId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ThreadId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A message participant with optional display name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Display name (e.g., "Jordan Reyes")
    pub name: Option<String>,
    /// Email address (e.g., "jordan@example.com")
    pub email: String,
}

impl Address {
    /// Create a new address with just the email
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            name: None,
            email: email.into(),
        }
    }

    /// Create a new address with a display name
    pub fn with_name(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: email.into(),
        }
    }

    /// Parse an address from a string like "Jordan Reyes <jordan@example.com>"
    pub fn parse(s: &str) -> Self {
        let s = s.trim();

        // Try to parse "Name <email>" format
        if let Some(angle_start) = s.rfind('<')
            && let Some(angle_end) = s.rfind('>')
            && angle_start < angle_end
        {
            let name = s[..angle_start].trim();
            let email = s[angle_start + 1..angle_end].trim();
            return Self {
                name: if name.is_empty() {
                    None
                } else {
                    Some(name.to_string())
                },
                email: email.to_string(),
            };
        }

        // Otherwise, treat the whole string as an email
        Self {
            name: None,
            email: s.to_string(),
        }
    }

    /// Format the address for display
    pub fn display(&self) -> String {
        match &self.name {
            Some(name) => format!("{} <{}>", name, self.email),
            None => self.email.clone(),
        }
    }
}

/// A single message as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Backend message ID
    pub id: MessageId,
    /// ID of the thread this message belongs to
    pub thread_id: ThreadId,
    /// Sender of the message
    pub sender: Address,
    /// Recipients of the message
    pub recipients: Vec<Address>,
    /// Subject line
    pub subject: String,
    /// Full message body
    pub body: String,
    /// When the message was sent
    pub sent_at: DateTime<Utc>,
    /// Server-side read flag
    pub is_read: bool,
}

impl Message {
    /// Create a new message builder
    pub fn builder(id: MessageId, thread_id: ThreadId) -> MessageBuilder {
        MessageBuilder::new(id, thread_id)
    }
}

/// Builder for creating Message instances
pub struct MessageBuilder {
    id: MessageId,
    thread_id: ThreadId,
    sender: Option<Address>,
    recipients: Vec<Address>,
    subject: String,
    body: String,
    sent_at: Option<DateTime<Utc>>,
    is_read: bool,
}

impl MessageBuilder {
    fn new(id: MessageId, thread_id: ThreadId) -> Self {
        Self {
            id,
            thread_id,
            sender: None,
            recipients: Vec::new(),
            subject: String::new(),
            body: String::new(),
            sent_at: None,
            is_read: false,
        }
    }

    pub fn sender(mut self, sender: Address) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn recipients(mut self, recipients: Vec<Address>) -> Self {
        self.recipients = recipients;
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn sent_at(mut self, sent_at: DateTime<Utc>) -> Self {
        self.sent_at = Some(sent_at);
        self
    }

    pub fn is_read(mut self, is_read: bool) -> Self {
        self.is_read = is_read;
        self
    }

    pub fn build(self) -> Message {
        Message {
            id: self.id,
            thread_id: self.thread_id,
            sender: self
                .sender
                .unwrap_or_else(|| Address::new("unknown@unknown.com")),
            recipients: self.recipients,
            subject: self.subject,
            body: self.body,
            sent_at: self.sent_at.unwrap_or_else(Utc::now),
            is_read: self.is_read,
        }
    }
}

/// A conversation thread with its messages, ordered chronologically
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    /// Backend thread ID
    pub id: ThreadId,
    /// Subject line of the thread
    pub subject: String,
    /// Messages in the thread
    pub messages: Vec<Message>,
}

/// A client-side aggregation of sent messages sharing the same
/// (sent_at, subject) key.
///
/// The backend stores one message per recipient for multi-recipient sends.
/// The sent view collapses those into one row. The key is an equality
/// heuristic: distinct messages sent in the same instant with the same
/// subject will merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupedMessage {
    /// Subject shared by all grouped messages
    pub subject: String,
    /// Timestamp shared by all grouped messages
    pub sent_at: DateTime<Utc>,
    /// One recipient per underlying message
    pub recipients: Vec<Address>,
    /// IDs of every underlying message, in first-seen order
    pub all_message_ids: Vec<MessageId>,
    /// Body of the first message in the group
    pub body: String,
}
