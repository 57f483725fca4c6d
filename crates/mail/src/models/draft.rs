//! Reply draft models

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Content type of a reply body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyFormat {
    #[default]
    Plain,
    Html,
}

impl BodyFormat {
    /// MIME subtype for the text part
    pub fn subtype(self) -> &'static str {
        match self {
            BodyFormat::Plain => "plain",
            BodyFormat::Html => "html",
        }
    }
}

impl FromStr for BodyFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" => Ok(BodyFormat::Plain),
            "html" => Ok(BodyFormat::Html),
            _ => Err(r#"body_type must be either "plain" or "html""#.to_string()),
        }
    }
}

/// Outcome of creating a reply draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum DraftReplyResult {
    #[serde(rename = "success")]
    Created {
        draft_id: String,
        message_id: String,
        thread_id: String,
    },
    #[serde(rename = "failed")]
    Failed { error: String },
}

impl DraftReplyResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}
