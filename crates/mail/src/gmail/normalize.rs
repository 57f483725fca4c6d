//! Gmail API response normalization
//!
//! Converts Gmail API messages into [`EmailMessage`] views. Missing
//! fields never fail; they are replaced with fixed fallback strings.

use super::api::{GmailMessage, Header, MessagePart};
use super::mime::MimeNode;
use crate::models::{EmailMessage, Label};

const NO_SUBJECT: &str = "No subject";
const NO_SENDER: &str = "No sender";
const NO_RECIPIENTS: &str = "No recipients";
const NO_DATE: &str = "No date";
const NO_SNIPPET: &str = "No snippet";
const NO_THREAD_ID: &str = "No thread ID";

/// Normalize a Gmail API message to an [`EmailMessage`]
///
/// The subject header is matched case-insensitively; `From`, `To` and
/// `Date` must match exactly.
pub fn normalize_message(gmail_msg: GmailMessage) -> EmailMessage {
    let payload = gmail_msg.payload.as_ref();
    let headers = payload.map(headers_of).unwrap_or_default();

    let subject = extract_header(headers, "Subject")
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_SUBJECT)
        .to_string();
    let sender = exact_header(headers, "From").unwrap_or(NO_SENDER).to_string();
    let recipients = exact_header(headers, "To")
        .unwrap_or(NO_RECIPIENTS)
        .to_string();
    let date = exact_header(headers, "Date").unwrap_or(NO_DATE).to_string();

    let has_attachments = payload
        .map(|p| MimeNode::from(p).has_top_level_attachment())
        .unwrap_or(false);

    let label_ids = gmail_msg.label_ids.unwrap_or_default();
    let star = label_ids.iter().any(|l| l == Label::STARRED);

    let thread_id = gmail_msg.thread_id.as_deref().unwrap_or(NO_THREAD_ID);

    EmailMessage {
        body: format!("<not included> | Thread ID: {}", thread_id),
        msg_id: gmail_msg.id,
        subject,
        sender,
        recipients,
        snippet: gmail_msg.snippet.unwrap_or_else(|| NO_SNIPPET.to_string()),
        has_attachments,
        date,
        star,
        label: label_ids.join(", "),
    }
}

fn headers_of(part: &MessagePart) -> &[Header] {
    part.headers.as_deref().unwrap_or_default()
}

/// Extract a header value by name (case-insensitive)
pub fn extract_header<'a>(headers: &'a [Header], name: &str) -> Option<&'a str> {
    headers.iter().find_map(|h| {
        if h.name.eq_ignore_ascii_case(name) {
            Some(h.value.as_str())
        } else {
            None
        }
    })
}

/// Extract a header value whose name matches exactly
fn exact_header<'a>(headers: &'a [Header], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.name == name)
        .map(|h| h.value.as_str())
}
