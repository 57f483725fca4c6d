//! OAuth2 credential model
//!
//! Serialized in Google's "authorized user" layout so token files can be
//! shared with Google's own client libraries.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ClientSecret;

/// Tokens are treated as expired this many seconds before their real expiry
const EXPIRY_SKEW_SECS: i64 = 300;

/// Access/refresh token bundle for one API surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    /// Access token
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// Granted scopes
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

/// Token response from the OAuth token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
    /// Space-separated granted scopes
    pub scope: Option<String>,
    #[allow(dead_code)]
    pub token_type: Option<String>,
}

impl Credential {
    /// Build a credential from a fresh authorization-code exchange
    pub fn from_token_response(
        response: TokenResponse,
        secret: &ClientSecret,
        requested_scopes: &[String],
        now: DateTime<Utc>,
    ) -> Self {
        let scopes = granted_scopes(response.scope.as_deref(), requested_scopes);
        Self {
            token: Some(response.access_token),
            refresh_token: response.refresh_token,
            token_uri: Some(secret.token_uri.clone()),
            client_id: Some(secret.client_id.clone()),
            client_secret: Some(secret.client_secret.clone()),
            scopes,
            expiry: response
                .expires_in
                .map(|secs| now + Duration::seconds(secs as i64)),
        }
    }

    /// Apply a refresh response in place
    ///
    /// Google usually omits the refresh token on refresh; the existing one is kept.
    pub fn apply_refresh(&mut self, response: TokenResponse, now: DateTime<Utc>) {
        self.token = Some(response.access_token);
        if response.refresh_token.is_some() {
            self.refresh_token = response.refresh_token;
        }
        if let Some(scope) = response.scope.as_deref() {
            self.scopes = granted_scopes(Some(scope), &self.scopes);
        }
        self.expiry = response
            .expires_in
            .map(|secs| now + Duration::seconds(secs as i64));
    }

    /// Fill in client identity fields the stored credential lacks
    pub fn fill_client(&mut self, secret: &ClientSecret) {
        self.client_id.get_or_insert_with(|| secret.client_id.clone());
        self.client_secret
            .get_or_insert_with(|| secret.client_secret.clone());
        self.token_uri.get_or_insert_with(|| secret.token_uri.clone());
    }

    /// Whether the credential carries everything needed for a refresh call
    pub fn has_client(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some() && self.token_uri.is_some()
    }

    /// Expired means an expiry is set and falls within the skew window
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry
            .is_some_and(|expiry| expiry <= now + Duration::seconds(EXPIRY_SKEW_SECS))
    }

    /// Usable as-is: has an access token and is not expired
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty()) && !self.is_expired(now)
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Whether every requested scope was granted
    pub fn covers_scopes(&self, requested: &[String]) -> bool {
        requested.iter().all(|s| self.scopes.contains(s))
    }
}

fn granted_scopes(scope: Option<&str>, fallback: &[String]) -> Vec<String> {
    match scope {
        Some(s) if !s.trim().is_empty() => s.split_whitespace().map(str::to_string).collect(),
        _ => fallback.to_vec(),
    }
}
