//! Gmail API integration
//!
//! This module provides:
//! - The `MailApi` seam and its HTTP implementation
//! - A typed MIME tree and body extraction
//! - Response normalization to message views
//! - Reply message construction

mod client;
pub mod mime;
mod normalize;
pub mod reply;
mod transport;

pub use client::GmailClient;
pub use normalize::{extract_header, normalize_message};
pub use transport::{ListParams, MailApi};

/// Gmail API response types
pub mod api {
    use serde::{Deserialize, Serialize};

    /// Response from listing messages
    #[derive(Debug, Default, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ListMessagesResponse {
        pub messages: Option<Vec<MessageRef>>,
        pub next_page_token: Option<String>,
        pub result_size_estimate: Option<u32>,
    }

    /// Reference to a message (just ID and thread ID)
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MessageRef {
        pub id: String,
        pub thread_id: Option<String>,
    }

    /// Full message from Gmail API
    #[derive(Debug, Default, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GmailMessage {
        pub id: String,
        pub thread_id: Option<String>,
        pub label_ids: Option<Vec<String>>,
        pub snippet: Option<String>,
        pub internal_date: Option<String>,
        pub payload: Option<MessagePart>,
    }

    /// Thread with its messages, oldest first
    #[derive(Debug, Default, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GmailThread {
        pub id: String,
        pub messages: Option<Vec<GmailMessage>>,
    }

    /// Email header (name-value pair)
    #[derive(Debug, Clone, Deserialize, Serialize)]
    pub struct Header {
        pub name: String,
        pub value: String,
    }

    /// Part body: inline base64url data or a reference to an attachment
    #[derive(Debug, Default, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MessageBody {
        pub size: Option<u32>,
        pub data: Option<String>,
        pub attachment_id: Option<String>,
    }

    /// MIME part; the message payload is the root part
    #[derive(Debug, Default, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MessagePart {
        pub part_id: Option<String>,
        pub mime_type: Option<String>,
        pub filename: Option<String>,
        pub headers: Option<Vec<Header>>,
        pub body: Option<MessageBody>,
        pub parts: Option<Vec<MessagePart>>,
    }

    /// Request body for creating a draft
    #[derive(Debug, Clone, Serialize)]
    pub struct CreateDraftRequest {
        pub message: DraftMessageRequest,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DraftMessageRequest {
        /// Entire RFC 2822 message, base64url encoded
        pub raw: String,
        pub thread_id: String,
    }

    /// Draft as returned by the API
    #[derive(Debug, Clone, Deserialize)]
    pub struct Draft {
        pub id: String,
        pub message: DraftMessage,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DraftMessage {
        pub id: String,
        pub thread_id: String,
    }
}
