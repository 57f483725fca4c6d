//! Typed MIME payload tree
//!
//! Converts the Gmail payload into a tree of [`MimeNode`]s so body
//! selection and attachment detection are pure functions over typed data.

use base64::prelude::*;

use super::api::{MessageBody, MessagePart};

/// Returned by [`extract_text_body`] when no plain-text part carries data
pub const BODY_NOT_AVAILABLE: &str = "<Text body not available>";

/// Content of a leaf part
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafBody {
    /// base64url data included in the response
    Inline(String),
    /// Data stored separately, fetched by attachment ID
    Attachment(String),
    Empty,
}

/// One node of a MIME tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MimeNode {
    Leaf {
        mime_type: String,
        filename: Option<String>,
        body: LeafBody,
    },
    Multipart {
        mime_type: String,
        filename: Option<String>,
        parts: Vec<MimeNode>,
    },
}

/// Failure decoding a selected body part
#[derive(Debug, thiserror::Error)]
pub enum BodyDecodeError {
    #[error("body data is not valid base64url")]
    Base64,
    #[error("body text is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl From<&MessagePart> for MimeNode {
    fn from(part: &MessagePart) -> Self {
        let mime_type = part.mime_type.clone().unwrap_or_default();
        let filename = part.filename.clone().filter(|f| !f.is_empty());

        // A `parts` key makes this a container, even when the list is empty
        if let Some(children) = &part.parts {
            return MimeNode::Multipart {
                mime_type,
                filename,
                parts: children.iter().map(MimeNode::from).collect(),
            };
        }

        let body = match part.body.as_ref() {
            Some(MessageBody {
                data: Some(data), ..
            }) => LeafBody::Inline(data.clone()),
            Some(MessageBody {
                attachment_id: Some(id),
                ..
            }) => LeafBody::Attachment(id.clone()),
            _ => LeafBody::Empty,
        };

        MimeNode::Leaf {
            mime_type,
            filename,
            body,
        }
    }
}

impl MimeNode {
    pub fn mime_type(&self) -> &str {
        match self {
            MimeNode::Leaf { mime_type, .. } | MimeNode::Multipart { mime_type, .. } => mime_type,
        }
    }

    pub fn filename(&self) -> Option<&str> {
        match self {
            MimeNode::Leaf { filename, .. } | MimeNode::Multipart { filename, .. } => {
                filename.as_deref()
            }
        }
    }

    /// Immediate children (empty for leaves)
    pub fn children(&self) -> &[MimeNode] {
        match self {
            MimeNode::Leaf { .. } => &[],
            MimeNode::Multipart { parts, .. } => parts,
        }
    }

    fn is_type(&self, expected: &str) -> bool {
        self.mime_type().eq_ignore_ascii_case(expected)
    }

    /// Inline data if this is a `text/plain` leaf that carries some
    fn inline_plain_text(&self) -> Option<&str> {
        match self {
            MimeNode::Leaf {
                body: LeafBody::Inline(data),
                ..
            } if self.is_type("text/plain") => Some(data.as_str()),
            _ => None,
        }
    }

    /// Whether any immediate child names a file
    ///
    /// Nested parts are not inspected, so an attachment inside a deeper
    /// multipart container is not reported.
    pub fn has_top_level_attachment(&self) -> bool {
        self.children().iter().any(|part| part.filename().is_some())
    }
}

/// Select the base64url data of the readable body, if any.
///
/// Order, first match wins:
/// 1. `text/plain` child of an immediate `multipart/alternative` part
/// 2. immediate `text/plain` part
/// 3. the root itself, when it is a `text/plain` leaf
pub fn select_text_body(root: &MimeNode) -> Option<&str> {
    match root {
        MimeNode::Multipart { parts, .. } => parts
            .iter()
            .filter(|part| part.is_type("multipart/alternative"))
            .find_map(|alt| alt.children().iter().find_map(MimeNode::inline_plain_text))
            .or_else(|| parts.iter().find_map(MimeNode::inline_plain_text)),
        MimeNode::Leaf { .. } => root.inline_plain_text(),
    }
}

/// Extract and decode the readable body, or [`BODY_NOT_AVAILABLE`]
pub fn extract_text_body(root: &MimeNode) -> Result<String, BodyDecodeError> {
    match select_text_body(root) {
        Some(data) => decode_body_data(data),
        None => Ok(BODY_NOT_AVAILABLE.to_string()),
    }
}

/// Decode base64url body data to text
///
/// Gmail uses URL-safe base64 but padding can vary, so we try multiple decoders.
pub fn decode_body_data(data: &str) -> Result<String, BodyDecodeError> {
    let decoders: [&base64::engine::GeneralPurpose; 2] = [&BASE64_URL_SAFE, &BASE64_URL_SAFE_NO_PAD];

    let bytes = decoders
        .iter()
        .find_map(|decoder| decoder.decode(data.trim()).ok())
        .ok_or(BodyDecodeError::Base64)?;

    Ok(String::from_utf8(bytes)?)
}
