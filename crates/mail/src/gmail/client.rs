//! Gmail API HTTP client
//!
//! Implements [`MailApi`] against the Gmail REST API.
//! Uses synchronous HTTP (ureq) to be executor-agnostic.

use anyhow::{Context, Result};
use log::debug;

use super::api::{CreateDraftRequest, Draft, GmailMessage, GmailThread, ListMessagesResponse};
use super::transport::{ListParams, MailApi};
use crate::auth::Session;
use crate::error::ApiError;
use crate::models::{MessageId, ThreadId};

/// Gmail API client bound to one authenticated session
pub struct GmailClient {
    session: Session,
}

impl GmailClient {
    /// Gmail API base URL
    const BASE_URL: &'static str = "https://gmail.googleapis.com/gmail/v1";

    /// Largest page the list endpoint accepts
    pub const MAX_PAGE_SIZE: usize = 500;

    pub fn new(session: Session) -> Self {
        Self { session }
    }

    fn bearer(&self) -> Result<String> {
        Ok(format!("Bearer {}", self.session.access_token()?))
    }
}

impl MailApi for GmailClient {
    fn list_messages(&self, params: &ListParams) -> Result<ListMessagesResponse> {
        let url = format!("{}/users/me/messages", Self::BASE_URL);
        let page_size = params.max_results.clamp(1, Self::MAX_PAGE_SIZE);
        debug!(
            "Listing messages (q={:?}, labels={:?}, max={})",
            params.query, params.label_ids, page_size
        );

        let mut request = ureq::get(&url)
            .header("Authorization", &self.bearer()?)
            .query("maxResults", page_size.to_string());

        if let Some(query) = &params.query {
            request = request.query("q", query);
        }
        for label in &params.label_ids {
            request = request.query("labelIds", label);
        }
        if let Some(token) = &params.page_token {
            request = request.query("pageToken", token);
        }

        let mut response = request
            .call()
            .map_err(|e| ApiError::from_ureq("list messages", e))?;

        response
            .body_mut()
            .read_json()
            .context("Failed to parse list messages response")
    }

    fn get_message(&self, id: &MessageId) -> Result<GmailMessage> {
        let url = format!(
            "{}/users/me/messages/{}",
            Self::BASE_URL,
            urlencoding::encode(id.as_str())
        );
        debug!("Fetching message {}", id);

        let mut response = ureq::get(&url)
            .header("Authorization", &self.bearer()?)
            .query("format", "full")
            .call()
            .map_err(|e| ApiError::from_ureq("get message", e))?;

        response
            .body_mut()
            .read_json()
            .context("Failed to parse message response")
    }

    fn get_thread(&self, id: &ThreadId) -> Result<GmailThread> {
        let url = format!(
            "{}/users/me/threads/{}",
            Self::BASE_URL,
            urlencoding::encode(id.as_str())
        );
        debug!("Fetching thread {}", id);

        let mut response = ureq::get(&url)
            .header("Authorization", &self.bearer()?)
            .query("format", "full")
            .call()
            .map_err(|e| ApiError::from_ureq("get thread", e))?;

        response
            .body_mut()
            .read_json()
            .context("Failed to parse thread response")
    }

    fn create_draft(&self, request: &CreateDraftRequest) -> Result<Draft> {
        let url = format!("{}/users/me/drafts", Self::BASE_URL);
        debug!("Creating draft in thread {}", request.message.thread_id);

        let mut response = ureq::post(&url)
            .header("Authorization", &self.bearer()?)
            .send_json(request)
            .map_err(|e| ApiError::from_ureq("create draft", e))?;

        response
            .body_mut()
            .read_json()
            .context("Failed to parse draft response")
    }
}
