//! Mailbox label filter for searches

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// System label a search is restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    /// No label filter
    All,
    #[default]
    Inbox,
    Sent,
    Draft,
    Spam,
    Trash,
}

impl Label {
    // Well-known Gmail system label IDs
    pub const INBOX: &'static str = "INBOX";
    pub const SENT: &'static str = "SENT";
    pub const DRAFT: &'static str = "DRAFT";
    pub const SPAM: &'static str = "SPAM";
    pub const TRASH: &'static str = "TRASH";
    pub const STARRED: &'static str = "STARRED";

    /// Gmail label ID to filter on, `None` for [`Label::All`]
    pub fn label_id(self) -> Option<&'static str> {
        match self {
            Label::All => None,
            Label::Inbox => Some(Self::INBOX),
            Label::Sent => Some(Self::SENT),
            Label::Draft => Some(Self::DRAFT),
            Label::Spam => Some(Self::SPAM),
            Label::Trash => Some(Self::TRASH),
        }
    }

    pub fn as_str(self) -> &'static str {
        self.label_id().unwrap_or("ALL")
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL" => Ok(Label::All),
            "INBOX" => Ok(Label::Inbox),
            "SENT" => Ok(Label::Sent),
            "DRAFT" => Ok(Label::Draft),
            "SPAM" => Ok(Label::Spam),
            "TRASH" => Ok(Label::Trash),
            other => Err(format!(
                "unknown label '{}': expected one of ALL, INBOX, SENT, DRAFT, SPAM, TRASH",
                other
            )),
        }
    }
}
