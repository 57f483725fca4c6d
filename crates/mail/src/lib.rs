//! Mail crate - Gmail integration for scripts and assistants
//!
//! This crate provides:
//! - OAuth2 credential management with a persistent token store
//! - A synchronous Gmail API client behind the `MailApi` seam
//! - Message normalization and plain-text body extraction
//! - Reply drafts threaded onto existing conversations
//!
//! All operations are blocking; wrap calls in a worker thread if you need
//! them off an event loop.

pub mod auth;
pub mod config;
pub mod error;
pub mod gmail;
pub mod mailbox;
pub mod models;

pub use auth::{ApiTarget, CredentialManager, InstalledAppFlow, OAuthFlow, Session};
pub use config::{AuthConfig, ClientSecret};
pub use error::{ApiError, ConfigError, is_config_error};
pub use gmail::{GmailClient, ListParams, MailApi};
pub use mailbox::{DEFAULT_MAX_RESULTS, Mailbox, SearchRequest};
pub use models::{
    BodyFormat, DraftReplyResult, EmailCollection, EmailMessage, Label, MessageId, ThreadId,
};
