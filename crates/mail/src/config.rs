//! OAuth client configuration
//!
//! Loads the OAuth client identity from a Google Cloud Console credential
//! file and describes where tokens live and whether interactive consent is
//! allowed.

use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Google's default consent page
pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
/// Google's default token endpoint
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Environment flag that enables the interactive consent flow
pub const ALLOW_INTERACTIVE_ENV: &str = "ALLOW_INTERACTIVE_OAUTH";

/// OAuth client identity read from the secret descriptor file
#[derive(Debug, Clone)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    pub auth_uri: String,
    pub token_uri: String,
}

/// Google Cloud Console credential file format
#[derive(Deserialize)]
struct GoogleCredentialFile {
    installed: Option<InstalledCredentials>,
    web: Option<InstalledCredentials>,
}

#[derive(Deserialize)]
struct InstalledCredentials {
    client_id: String,
    client_secret: String,
    auth_uri: Option<String>,
    token_uri: Option<String>,
}

impl ClientSecret {
    /// Load the client secret from a JSON file
    ///
    /// A missing or malformed file is reported as a [`ConfigError`].
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::MissingClientSecret {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidClientSecret {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::from_json(&content).map_err(|reason| {
            ConfigError::InvalidClientSecret {
                path: path.to_path_buf(),
                reason,
            }
            .into()
        })
    }

    /// Parse the client secret from JSON (Google Cloud Console format)
    pub fn from_json(json: &str) -> Result<Self, String> {
        let creds: GoogleCredentialFile =
            serde_json::from_str(json).map_err(|e| format!("not valid JSON: {}", e))?;

        // Support both "installed" (desktop) and "web" credential types
        let installed = creds
            .installed
            .or(creds.web)
            .ok_or_else(|| "missing 'installed' or 'web' section".to_string())?;

        if installed.client_id.is_empty() {
            return Err("client_id is empty".to_string());
        }

        Ok(Self {
            client_id: installed.client_id,
            client_secret: installed.client_secret,
            auth_uri: installed
                .auth_uri
                .unwrap_or_else(|| DEFAULT_AUTH_URI.to_string()),
            token_uri: installed
                .token_uri
                .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
        })
    }
}

/// Settings for obtaining a session
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Path to the OAuth client secret file
    pub client_secret_path: PathBuf,
    /// Token directory override (default: `token-files` next to the secret file)
    pub token_dir: Option<PathBuf>,
    /// Disambiguating suffix appended to token file names
    pub token_suffix: String,
    /// Whether the browser consent flow may run
    pub allow_interactive: bool,
}

impl AuthConfig {
    /// Create a config with default token location and interactive consent disabled
    pub fn new(client_secret_path: impl Into<PathBuf>) -> Self {
        Self {
            client_secret_path: client_secret_path.into(),
            token_dir: None,
            token_suffix: String::new(),
            allow_interactive: false,
        }
    }

    pub fn with_token_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.token_dir = Some(dir.into());
        self
    }

    pub fn with_token_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.token_suffix = suffix.into();
        self
    }

    pub fn allow_interactive(mut self, allow: bool) -> Self {
        self.allow_interactive = allow;
        self
    }

    /// Take the interactive flag from [`ALLOW_INTERACTIVE_ENV`]
    pub fn interactive_from_env(self) -> Self {
        self.allow_interactive(config::env_flag(ALLOW_INTERACTIVE_ENV))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_installed_credentials() {
        let json = r#"{
            "installed": {
                "client_id": "test-client-id.apps.googleusercontent.com",
                "client_secret": "test-secret",
                "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                "token_uri": "https://oauth2.googleapis.com/token"
            }
        }"#;

        let creds = ClientSecret::from_json(json).unwrap();
        assert_eq!(creds.client_id, "test-client-id.apps.googleusercontent.com");
        assert_eq!(creds.client_secret, "test-secret");
        assert_eq!(creds.token_uri, DEFAULT_TOKEN_URI);
    }

    #[test]
    fn test_parse_web_credentials_uses_default_endpoints() {
        let json = r#"{
            "web": {
                "client_id": "web-client-id.apps.googleusercontent.com",
                "client_secret": "web-secret"
            }
        }"#;

        let creds = ClientSecret::from_json(json).unwrap();
        assert_eq!(creds.client_id, "web-client-id.apps.googleusercontent.com");
        assert_eq!(creds.auth_uri, DEFAULT_AUTH_URI);
        assert_eq!(creds.token_uri, DEFAULT_TOKEN_URI);
    }

    #[test]
    fn test_invalid_json() {
        assert!(ClientSecret::from_json(r#"{ "other": {} }"#).is_err());
        assert!(ClientSecret::from_json("not json").is_err());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientSecret::from_file(&dir.path().join("client_secret.json")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::MissingClientSecret { .. })
        ));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client_secret.json");
        std::fs::write(&path, "{ \"installed\": 42 }").unwrap();

        let err = ClientSecret::from_file(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::InvalidClientSecret { .. })
        ));
    }
}
