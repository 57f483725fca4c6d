//! Remote mailbox API abstraction

use anyhow::Result;

use super::api::{CreateDraftRequest, Draft, GmailMessage, GmailThread, ListMessagesResponse};
use crate::models::{MessageId, ThreadId};

/// Parameters for one page of a message listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    /// Gmail search query (same syntax as the search box)
    pub query: Option<String>,
    /// Label IDs every returned message must carry; empty means no filter
    pub label_ids: Vec<String>,
    /// Page size (1-500)
    pub max_results: usize,
    pub page_token: Option<String>,
}

/// Trait for the remote mailbox operations the client needs
///
/// [`super::GmailClient`] talks to the Gmail REST API; tests provide
/// in-memory implementations.
pub trait MailApi: Send + Sync {
    /// List one page of message references
    fn list_messages(&self, params: &ListParams) -> Result<ListMessagesResponse>;

    /// Get a message in `full` format
    fn get_message(&self, id: &MessageId) -> Result<GmailMessage>;

    /// Get a thread with all of its messages
    fn get_thread(&self, id: &ThreadId) -> Result<GmailThread>;

    /// Create a draft
    fn create_draft(&self, request: &CreateDraftRequest) -> Result<Draft>;
}
