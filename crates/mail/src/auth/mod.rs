//! OAuth2 credential management
//!
//! Loads a stored credential for an API surface, refreshes it silently when
//! it has expired, and falls back to the interactive consent flow only when
//! allowed. Every newly obtained or refreshed credential is written back to
//! the token store before a [`Session`] is handed out.

mod credential;
mod flow;
mod store;

pub use credential::{Credential, TokenResponse};
pub use flow::{InstalledAppFlow, OAuthFlow};
pub use store::{DEFAULT_TOKEN_DIR, TokenKey, TokenStore};

use anyhow::{Context, Result};
use chrono::Utc;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::config::{AuthConfig, ClientSecret};
use crate::error::ConfigError;

/// An API surface a credential is issued for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiTarget {
    pub name: String,
    pub version: String,
    pub scopes: Vec<String>,
}

impl ApiTarget {
    pub fn new(name: impl Into<String>, version: impl Into<String>, scopes: &[&str]) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Gmail v1 with read and compose access
    pub fn gmail() -> Self {
        Self::new(
            "gmail",
            "v1",
            &[
                "https://www.googleapis.com/auth/gmail.readonly",
                "https://www.googleapis.com/auth/gmail.compose",
            ],
        )
    }
}

/// Produces sessions from stored, refreshed, or freshly consented credentials
pub struct CredentialManager {
    config: AuthConfig,
    flow: Arc<dyn OAuthFlow>,
}

impl CredentialManager {
    /// Create a manager using the browser-based installed-app flow
    pub fn new(config: AuthConfig) -> Self {
        Self::with_flow(config, Arc::new(InstalledAppFlow::new()))
    }

    /// Create a manager with a custom OAuth flow implementation
    pub fn with_flow(config: AuthConfig, flow: Arc<dyn OAuthFlow>) -> Self {
        Self { config, flow }
    }

    /// Get an authenticated session for the given API surface
    ///
    /// Uses the stored credential when it is still valid, refreshes it when
    /// it has a refresh token, and otherwise runs interactive consent if
    /// [`AuthConfig::allow_interactive`] is set. Refresh failures are
    /// returned as errors; they never fall through to the interactive flow.
    pub fn obtain_session(&self, target: &ApiTarget) -> Result<Session> {
        let store = TokenStore::resolve(
            &self.config.client_secret_path,
            self.config.token_dir.as_deref(),
        )?;
        store.ensure_dir()?;

        let key = TokenKey::new(&target.name, &target.version, &self.config.token_suffix);
        let token_path = store.path_for(&key);
        let now = Utc::now();

        let stored = store.load(&key)?;
        if let Some(cred) = &stored
            && !cred.scopes.is_empty()
            && !cred.covers_scopes(&target.scopes)
        {
            warn!(
                "Stored token {} was granted fewer scopes than requested",
                token_path.display()
            );
        }

        let credential = match stored {
            Some(mut cred) if cred.is_valid(now) => {
                // Needed later if the token expires while the session is alive
                if cred.can_refresh() && !cred.has_client() {
                    match self.client_secret() {
                        Ok(secret) => cred.fill_client(&secret),
                        Err(e) => warn!("Session will not be able to refresh: {:#}", e),
                    }
                }
                info!("Using stored token {}", token_path.display());
                return Ok(Session::new(cred, token_path, self.flow.clone()));
            }
            Some(mut cred) if cred.can_refresh() => {
                if !cred.has_client() {
                    cred.fill_client(&self.client_secret()?);
                }
                info!("Stored token expired, refreshing {}", token_path.display());
                let response = self
                    .flow
                    .refresh(&cred)
                    .context("Failed to refresh stored token")?;
                cred.apply_refresh(response, Utc::now());
                cred
            }
            _ => {
                if !self.config.allow_interactive {
                    return Err(ConfigError::InteractiveDisabled { token_path }.into());
                }
                let secret = self.client_secret()?;
                info!("Starting interactive consent for {} {}", target.name, target.version);
                let response = self
                    .flow
                    .authorize(&secret, &target.scopes)
                    .context("Interactive authorization failed")?;
                Credential::from_token_response(response, &secret, &target.scopes, Utc::now())
            }
        };

        store::save_credential(&token_path, &credential)?;
        info!("Saved token to {}", token_path.display());
        Ok(Session::new(credential, token_path, self.flow.clone()))
    }

    fn client_secret(&self) -> Result<ClientSecret> {
        let path = std::path::absolute(&self.config.client_secret_path)
            .unwrap_or_else(|_| self.config.client_secret_path.clone());
        ClientSecret::from_file(&path)
    }
}

/// Authenticated handle used to issue API calls
///
/// Keeps the credential current: if it expires while the session is alive
/// and a refresh token exists, the next [`Session::access_token`] call
/// refreshes it and rewrites the token file.
pub struct Session {
    credential: Mutex<Credential>,
    token_path: PathBuf,
    flow: Arc<dyn OAuthFlow>,
}

impl Session {
    fn new(credential: Credential, token_path: PathBuf, flow: Arc<dyn OAuthFlow>) -> Self {
        Self {
            credential: Mutex::new(credential),
            token_path,
            flow,
        }
    }

    /// Path of the token file backing this session
    pub fn token_path(&self) -> &Path {
        &self.token_path
    }

    /// Get a usable access token, refreshing if needed
    pub fn access_token(&self) -> Result<String> {
        let mut cred = self.lock();
        let now = Utc::now();

        if !cred.is_valid(now) {
            if !(cred.can_refresh() && cred.has_client()) {
                return Err(ConfigError::InteractiveDisabled {
                    token_path: self.token_path.clone(),
                }
                .into());
            }
            info!("Access token expired mid-session, refreshing");
            let response = self
                .flow
                .refresh(&cred)
                .context("Failed to refresh access token")?;
            cred.apply_refresh(response, Utc::now());
            store::save_credential(&self.token_path, &cred)?;
        }

        cred.token
            .clone()
            .filter(|t| !t.is_empty())
            .context("Session has no access token")
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Credential> {
        // A poisoned lock still holds a consistent credential
        self.credential
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingFlow {
        refreshes: AtomicUsize,
    }

    impl OAuthFlow for CountingFlow {
        fn authorize(&self, _secret: &ClientSecret, _scopes: &[String]) -> Result<TokenResponse> {
            anyhow::bail!("consent is not available here")
        }

        fn refresh(&self, _credential: &Credential) -> Result<TokenResponse> {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            Ok(TokenResponse {
                access_token: "fresh".to_string(),
                refresh_token: None,
                expires_in: Some(3600),
                scope: None,
                token_type: None,
            })
        }
    }

    fn credential(expires_in_secs: i64, with_client: bool) -> Credential {
        let client = |value: &str| with_client.then(|| value.to_string());
        Credential {
            token: Some("stale".to_string()),
            refresh_token: Some("1//refresh".to_string()),
            token_uri: client("https://oauth2.googleapis.com/token"),
            client_id: client("id-1"),
            client_secret: client("shh"),
            scopes: Vec::new(),
            expiry: Some(Utc::now() + Duration::seconds(expires_in_secs)),
        }
    }

    #[test]
    fn test_access_token_refreshes_mid_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token_gmail_v1.json");
        let flow = Arc::new(CountingFlow::default());
        let session = Session::new(credential(-10, true), path.clone(), flow.clone());

        assert_eq!(session.access_token().unwrap(), "fresh");
        // Second call reuses the refreshed token
        assert_eq!(session.access_token().unwrap(), "fresh");
        assert_eq!(flow.refreshes.load(Ordering::SeqCst), 1);

        let saved = store::load_credential(&path).unwrap();
        assert_eq!(saved.token.as_deref(), Some("fresh"));
        assert_eq!(saved.refresh_token.as_deref(), Some("1//refresh"));
    }

    #[test]
    fn test_expired_token_without_client_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let flow = Arc::new(CountingFlow::default());
        let session = Session::new(
            credential(-10, false),
            dir.path().join("token_gmail_v1.json"),
            flow.clone(),
        );

        let err = session.access_token().unwrap_err();
        assert!(crate::error::is_config_error(&err));
        assert_eq!(flow.refreshes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_valid_stored_token_gets_client_fields() {
        let dir = tempfile::tempdir().unwrap();
        let secret = dir.path().join("client_secret.json");
        std::fs::write(
            &secret,
            r#"{"installed":{"client_id":"id-1","client_secret":"shh"}}"#,
        )
        .unwrap();
        let store = TokenStore::resolve(&secret, None).unwrap();
        store.ensure_dir().unwrap();
        store
            .save(&TokenKey::new("gmail", "v1", ""), &credential(3600, false))
            .unwrap();

        let flow = Arc::new(CountingFlow::default());
        let manager = CredentialManager::with_flow(AuthConfig::new(&secret), flow.clone());
        let session = manager.obtain_session(&ApiTarget::gmail()).unwrap();

        assert!(session.lock().has_client());
        assert_eq!(session.access_token().unwrap(), "stale");
        assert_eq!(flow.refreshes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_gmail_target() {
        let target = ApiTarget::gmail();
        assert_eq!(target.name, "gmail");
        assert_eq!(target.version, "v1");
        assert_eq!(target.scopes.len(), 2);
        assert!(target.scopes.iter().all(|s| s.contains("auth/gmail.")));
    }
}
