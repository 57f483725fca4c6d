//! Reply message construction
//!
//! Builds the RFC 2822 / MIME message for a reply draft with lettre. The
//! layout is a `multipart/mixed` container holding a single UTF-8 text part,
//! with the threading headers pointing at the message being answered.

use base64::prelude::*;
use lettre::message::header::{self, ContentType, HeaderName, HeaderValue, Headers};
use lettre::message::{Mailboxes, MultiPart, SinglePart};

use super::api::Header;
use super::normalize::extract_header;
use crate::models::BodyFormat;

/// Headers of the message being replied to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyContext {
    pub subject: String,
    pub from: String,
    pub to: String,
    pub message_id: String,
}

impl ReplyContext {
    /// Read Subject/From/To/Message-ID (case-insensitive, empty when missing)
    pub fn from_headers(headers: &[Header]) -> Self {
        let get = |name: &str| extract_header(headers, name).unwrap_or_default().to_string();
        Self {
            subject: get("Subject"),
            from: get("From"),
            to: get("To"),
            message_id: get("Message-ID"),
        }
    }
}

/// Prefix "Re: " unless the subject already starts with "re:" in any case
pub fn reply_subject(subject: &str) -> String {
    let already_reply = subject
        .get(..3)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("re:"));
    if already_reply {
        subject.to_string()
    } else {
        format!("Re: {}", subject)
    }
}

/// Build the full MIME message addressed to the original sender
///
/// No `From` header is written; Gmail fills it in from the account that
/// owns the draft. Non-ASCII header text is RFC 2047 encoded and folded by
/// lettre.
pub fn build_reply_message(original: &ReplyContext, body: &str, format: BodyFormat) -> Vec<u8> {
    let mut headers = Headers::new();
    headers.set(header::MIME_VERSION_1_0);

    let to = header_value(&original.from);
    match to.parse::<Mailboxes>() {
        Ok(mailboxes) => headers.set(header::To::from(mailboxes)),
        // Keep unparseable senders verbatim (still encoded if non-ASCII)
        Err(_) => headers.insert_raw(HeaderValue::new(
            HeaderName::new_from_ascii_str("To"),
            to,
        )),
    }

    headers.set(header::Subject::from(header_value(&reply_subject(
        &original.subject,
    ))));
    let message_id = header_value(&original.message_id);
    headers.set(header::InReplyTo::from(message_id.clone()));
    headers.set(header::References::from(message_id));

    let content_type = match format {
        BodyFormat::Plain => ContentType::TEXT_PLAIN,
        BodyFormat::Html => ContentType::TEXT_HTML,
    };
    let text = SinglePart::builder()
        .header(content_type)
        .header(header::ContentTransferEncoding::Base64)
        .body(body.to_string());

    let mut message = headers.to_string().into_bytes();
    message.extend(MultiPart::mixed().singlepart(text).formatted());
    message
}

/// Encode a complete message for the `raw` field of the Gmail API
pub fn encode_raw(message: &[u8]) -> String {
    BASE64_URL_SAFE.encode(message)
}

/// Strip line breaks so a value cannot inject extra headers
fn header_value(value: &str) -> String {
    value
        .chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect()
}
