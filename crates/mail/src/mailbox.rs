//! Mailbox client
//!
//! High-level mailbox operations (search, read, reply drafts) over a
//! [`MailApi`] implementation. Each operation is a short sequence of
//! blocking API calls.

use anyhow::{Context, Result};
use log::{info, warn};

use crate::auth::{ApiTarget, CredentialManager};
use crate::config::AuthConfig;
use crate::gmail::api::{CreateDraftRequest, DraftMessageRequest, MessageRef};
use crate::gmail::mime::{self, BODY_NOT_AVAILABLE, MimeNode};
use crate::gmail::reply::{self, ReplyContext};
use crate::gmail::{GmailClient, ListParams, MailApi, normalize_message};
use crate::models::{BodyFormat, DraftReplyResult, EmailCollection, EmailMessage, Label, MessageId, ThreadId};

/// Default number of messages returned by searches and unread listings
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Query used to find unread mail
const UNREAD_QUERY: &str = "is:unread";

/// Parameters for [`Mailbox::search`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Gmail search query; `None` matches everything
    pub query: Option<String>,
    pub label: Label,
    /// Upper bound on returned messages; `None` follows every page
    pub max_results: Option<usize>,
    /// Continuation token from a previous search
    pub page_token: Option<String>,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: None,
            label: Label::Inbox,
            max_results: Some(DEFAULT_MAX_RESULTS),
            page_token: None,
        }
    }
}

/// Mailbox operations against one authenticated account
pub struct Mailbox<A: MailApi = GmailClient> {
    api: A,
}

impl Mailbox<GmailClient> {
    /// Authenticate and build a Gmail-backed mailbox
    ///
    /// Fails if no session can be obtained (see [`CredentialManager::obtain_session`]).
    pub fn connect(config: AuthConfig) -> Result<Self> {
        let manager = CredentialManager::new(config);
        let session = manager
            .obtain_session(&ApiTarget::gmail())
            .context("Failed to obtain Gmail session")?;
        info!("Gmail session ready ({})", session.token_path().display());
        Ok(Self::new(GmailClient::new(session)))
    }
}

impl<A: MailApi> Mailbox<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Search messages, following continuation tokens up to `max_results`
    ///
    /// Each page asks only for the messages still missing, so the returned
    /// continuation token resumes right after the last returned message.
    pub fn search(&self, request: &SearchRequest) -> Result<EmailCollection> {
        if request.max_results == Some(0) {
            return Ok(EmailCollection::new(Vec::new(), request.page_token.clone()));
        }

        let label_ids: Vec<String> = request
            .label
            .label_id()
            .map(str::to_string)
            .into_iter()
            .collect();

        let mut refs: Vec<MessageRef> = Vec::new();
        let mut page_token = request.page_token.clone();

        loop {
            let page_size = match request.max_results {
                Some(max) => (max - refs.len()).min(GmailClient::MAX_PAGE_SIZE),
                None => GmailClient::MAX_PAGE_SIZE,
            };

            let page = self.api.list_messages(&ListParams {
                query: request.query.clone(),
                label_ids: label_ids.clone(),
                max_results: page_size,
                page_token: page_token.clone(),
            })?;

            refs.extend(page.messages.unwrap_or_default());
            page_token = page.next_page_token;

            let reached_max = request.max_results.is_some_and(|max| refs.len() >= max);
            if page_token.is_none() || reached_max {
                break;
            }
        }

        if let Some(max) = request.max_results {
            refs.truncate(max);
        }

        let messages = self.details_for(&refs)?;
        Ok(EmailCollection::new(messages, page_token))
    }

    /// Fetch a message and summarise it
    pub fn get_details(&self, id: &MessageId) -> Result<EmailMessage> {
        let message = self.api.get_message(id)?;
        Ok(normalize_message(message))
    }

    /// Fetch a message and extract its readable plain-text body
    pub fn get_body(&self, id: &MessageId) -> Result<String> {
        let message = self.api.get_message(id)?;
        let Some(payload) = message.payload.as_ref() else {
            return Ok(BODY_NOT_AVAILABLE.to_string());
        };
        let body = mime::extract_text_body(&MimeNode::from(payload))
            .with_context(|| format!("Failed to decode body of message {}", id))?;
        Ok(body)
    }

    /// First page of unread inbox messages
    ///
    /// Never fails: any error yields an empty collection and is logged.
    pub fn get_unread(&self, max_results: Option<usize>) -> EmailCollection {
        self.try_get_unread(max_results).unwrap_or_else(|e| {
            warn!("Failed to fetch unread messages: {:#}", e);
            EmailCollection::empty()
        })
    }

    /// Same as [`Mailbox::get_unread`] but reports the failure
    pub fn try_get_unread(&self, max_results: Option<usize>) -> Result<EmailCollection> {
        let page_size = max_results
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_MAX_RESULTS);

        let page = self.api.list_messages(&ListParams {
            query: Some(UNREAD_QUERY.to_string()),
            label_ids: vec![Label::INBOX.to_string()],
            max_results: page_size,
            page_token: None,
        })?;

        let refs = page.messages.unwrap_or_default();
        let messages = self.details_for(&refs)?;
        Ok(EmailCollection::new(messages, page.next_page_token))
    }

    /// Create a draft replying to the latest message of a thread
    ///
    /// Never fails: errors are reported as [`DraftReplyResult::Failed`].
    pub fn create_draft_reply(
        &self,
        thread_id: &ThreadId,
        reply_body: &str,
        body_format: &str,
    ) -> DraftReplyResult {
        self.try_create_draft_reply(thread_id, reply_body, body_format)
            .unwrap_or_else(|e| {
                warn!("Draft reply for thread {} failed: {:#}", thread_id, e);
                DraftReplyResult::failed(format!("An error occurred: {:#}", e))
            })
    }

    fn try_create_draft_reply(
        &self,
        thread_id: &ThreadId,
        reply_body: &str,
        body_format: &str,
    ) -> Result<DraftReplyResult> {
        let thread = self.api.get_thread(thread_id)?;
        let messages = thread.messages.unwrap_or_default();

        let Some(original) = messages.last() else {
            return Ok(DraftReplyResult::failed("No messages found in thread"));
        };

        let headers = original
            .payload
            .as_ref()
            .and_then(|p| p.headers.as_deref())
            .unwrap_or_default();
        let context = ReplyContext::from_headers(headers);

        let format = match body_format.parse::<BodyFormat>() {
            Ok(format) => format,
            Err(reason) => return Ok(DraftReplyResult::failed(reason)),
        };

        let message = reply::build_reply_message(&context, reply_body, format);
        let request = CreateDraftRequest {
            message: DraftMessageRequest {
                raw: reply::encode_raw(&message),
                thread_id: thread_id.as_str().to_string(),
            },
        };

        let draft = self.api.create_draft(&request)?;
        info!("Created draft {} in thread {}", draft.id, draft.message.thread_id);

        Ok(DraftReplyResult::Created {
            draft_id: draft.id,
            message_id: draft.message.id,
            thread_id: draft.message.thread_id,
        })
    }

    fn details_for(&self, refs: &[MessageRef]) -> Result<Vec<EmailMessage>> {
        refs.iter()
            .map(|r| self.get_details(&MessageId::new(r.id.as_str())))
            .collect()
    }
}
