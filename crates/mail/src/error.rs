//! Typed error markers
//!
//! Fallible functions in this crate return `anyhow::Result`. The types here
//! travel inside those errors so callers can tell configuration problems
//! (re-run consent, fix the secret file) from remote failures (retry).

use std::path::PathBuf;

/// Problems the user has to fix before anything can work
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("OAuth client secret file not found: {}", path.display())]
    MissingClientSecret { path: PathBuf },

    #[error("Invalid OAuth client secret file {}: {reason}", path.display())]
    InvalidClientSecret { path: PathBuf, reason: String },

    #[error(
        "No valid token at {}. Run interactive auth once locally to create it.",
        token_path.display()
    )]
    InteractiveDisabled { token_path: PathBuf },
}

/// Failure talking to a remote endpoint
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{operation} failed with HTTP status {status}")]
    Status { operation: &'static str, status: u16 },

    #[error("{operation} failed: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },
}

impl ApiError {
    /// Classify a ureq error for the named operation
    pub(crate) fn from_ureq(operation: &'static str, err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(status) => Self::Status { operation, status },
            other => Self::Transport {
                operation,
                message: other.to_string(),
            },
        }
    }
}

/// Check whether an error (or anything in its chain) is a [`ConfigError`]
pub fn is_config_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| cause.is::<ConfigError>())
}
