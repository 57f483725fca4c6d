//! Message views returned by mailbox operations

use serde::{Deserialize, Serialize};

/// Unique identifier for a message (Gmail message ID)
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

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only summary of a remote message
///
/// `body` never holds the real body; it carries a placeholder with the
/// thread ID. Use `Mailbox::get_body` for the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub msg_id: String,
    pub subject: String,
    pub sender: String,
    /// Raw `To` header
    pub recipients: String,
    pub body: String,
    pub snippet: String,
    /// Only top-level MIME parts are inspected
    pub has_attachments: bool,
    pub date: String,
    pub star: bool,
    /// Label IDs joined with ", "
    pub label: String,
}

/// A page of messages plus the cursor for the next page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailCollection {
    count: usize,
    messages: Vec<EmailMessage>,
    next_page_token: Option<String>,
}

impl EmailCollection {
    pub fn new(messages: Vec<EmailMessage>, next_page_token: Option<String>) -> Self {
        Self {
            count: messages.len(),
            messages,
            next_page_token,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), None)
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn messages(&self) -> &[EmailMessage] {
        &self.messages
    }

    pub fn next_page_token(&self) -> Option<&str> {
        self.next_page_token.as_deref()
    }
}
