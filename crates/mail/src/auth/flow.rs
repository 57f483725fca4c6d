//! OAuth2 installed-app flow
//!
//! Implements the authorization code flow with a loopback redirect and the
//! refresh-token grant. Uses synchronous HTTP (ureq) to be executor-agnostic.

use anyhow::{Context, Result};
use log::{debug, info};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::{TcpListener, TcpStream};
use std::time::{Duration, Instant};

use super::credential::{Credential, TokenResponse};
use crate::config::ClientSecret;
use crate::error::ApiError;

/// Network side of the credential lifecycle
///
/// Split out so the credential manager can be exercised without a browser
/// or a token endpoint.
pub trait OAuthFlow: Send + Sync {
    /// Run the interactive consent flow and exchange the code for tokens.
    ///
    /// Blocks until the user finishes in the browser or the flow times out.
    fn authorize(&self, secret: &ClientSecret, scopes: &[String]) -> Result<TokenResponse>;

    /// Exchange the credential's refresh token for a new access token
    fn refresh(&self, credential: &Credential) -> Result<TokenResponse>;
}

/// Browser-based flow against Google's OAuth endpoints
pub struct InstalledAppFlow {
    timeout: Duration,
}

impl Default for InstalledAppFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl InstalledAppFlow {
    /// How long to wait for the browser redirect
    const CONSENT_TIMEOUT: Duration = Duration::from_secs(300);

    /// Poll interval while waiting for the redirect
    const ACCEPT_POLL: Duration = Duration::from_millis(100);

    pub fn new() -> Self {
        Self {
            timeout: Self::CONSENT_TIMEOUT,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Exchange an authorization code for tokens
    fn exchange_code(
        &self,
        secret: &ClientSecret,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse> {
        let mut response = ureq::post(&secret.token_uri)
            .send_form([
                ("client_id", secret.client_id.as_str()),
                ("client_secret", secret.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", redirect_uri),
            ])
            .map_err(|e| ApiError::from_ureq("authorization code exchange", e))?;

        response
            .body_mut()
            .read_json()
            .context("Failed to parse token response")
    }

    /// Accept connections until one carries the OAuth redirect
    fn wait_for_callback(&self, listener: &TcpListener, state: &str) -> Result<String> {
        listener
            .set_nonblocking(true)
            .context("Failed to configure callback listener")?;
        let deadline = Instant::now() + self.timeout;

        loop {
            match listener.accept() {
                Ok((stream, _)) => {
                    if let Some(code) = handle_callback(stream, state)? {
                        return Ok(code);
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    if Instant::now() >= deadline {
                        anyhow::bail!(
                            "Timed out after {}s waiting for browser authorization",
                            self.timeout.as_secs()
                        );
                    }
                    std::thread::sleep(Self::ACCEPT_POLL);
                }
                Err(e) => return Err(e).context("Failed to accept connection"),
            }
        }
    }
}

impl OAuthFlow for InstalledAppFlow {
    fn authorize(&self, secret: &ClientSecret, scopes: &[String]) -> Result<TokenResponse> {
        // Let the OS pick a free loopback port
        let listener =
            TcpListener::bind("127.0.0.1:0").context("Failed to bind OAuth callback server")?;
        let port = listener.local_addr()?.port();
        let redirect_uri = format!("http://localhost:{}/", port);
        let state = random_state();

        let auth_url = url::Url::parse_with_params(
            &secret.auth_uri,
            &[
                ("client_id", secret.client_id.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", scopes.join(" ").as_str()),
                ("state", state.as_str()),
                ("access_type", "offline"),
                ("prompt", "consent"),
            ],
        )
        .context("Invalid auth_uri in client secret")?;

        println!("\n=== Gmail Authentication Required ===");
        println!("Opening browser for authentication...");
        println!("If the browser doesn't open, visit: {}", auth_url);

        if let Err(e) = open::that(auth_url.as_str()) {
            eprintln!("Failed to open browser: {}. Please open the URL manually.", e);
        }

        println!("Waiting for authorization...");
        let code = self.wait_for_callback(&listener, &state)?;

        println!("Exchanging authorization code for tokens...");
        let token = self.exchange_code(secret, &code, &redirect_uri)?;
        info!("Interactive authorization completed");
        Ok(token)
    }

    fn refresh(&self, credential: &Credential) -> Result<TokenResponse> {
        let refresh_token = credential
            .refresh_token
            .as_deref()
            .context("Credential has no refresh token")?;
        let token_uri = credential
            .token_uri
            .as_deref()
            .context("Credential has no token_uri")?;
        let client_id = credential
            .client_id
            .as_deref()
            .context("Credential has no client_id")?;
        let client_secret = credential
            .client_secret
            .as_deref()
            .context("Credential has no client_secret")?;

        debug!("Refreshing access token via {}", token_uri);
        let response = ureq::post(token_uri)
            .send_form([
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .map_err(|e| ApiError::from_ureq("token refresh", e))?;

        response
            .into_body()
            .read_json()
            .context("Failed to parse refresh token response")
    }
}

/// Outcome of parsing one redirect request
#[derive(Debug, PartialEq)]
enum Callback {
    Code(String),
    Denied(String),
    /// Not an OAuth redirect (favicon and similar)
    Unrelated,
}

/// Read one request, answer the browser, and extract the code if present
fn handle_callback(mut stream: TcpStream, state: &str) -> Result<Option<String>> {
    stream
        .set_nonblocking(false)
        .context("Failed to configure callback connection")?;

    let mut reader = BufReader::new(&stream);
    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .context("Failed to read request")?;

    let callback = parse_callback(&request_line, state);

    let (status, body) = match &callback {
        Callback::Code(_) => ("200 OK", "Authentication successful! You can close this window."),
        Callback::Denied(_) => ("400 Bad Request", "Authentication failed. Please try again."),
        Callback::Unrelated => ("404 Not Found", "Not found."),
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n<html><body><h1>{}</h1></body></html>",
        status, body
    );
    stream.write_all(response.as_bytes()).ok();

    match callback {
        Callback::Code(code) => Ok(Some(code)),
        Callback::Denied(reason) => anyhow::bail!("OAuth error: {}", reason),
        Callback::Unrelated => Ok(None),
    }
}

/// Parse a request line like `GET /?code=AUTH_CODE&state=... HTTP/1.1`
fn parse_callback(request_line: &str, expected_state: &str) -> Callback {
    let Some(target) = request_line.split_whitespace().nth(1) else {
        return Callback::Unrelated;
    };
    let Ok(url) = url::Url::parse(&format!("http://localhost{}", target)) else {
        return Callback::Unrelated;
    };

    let mut code = None;
    let mut error = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(err) = error {
        return Callback::Denied(err);
    }
    match code {
        Some(_) if state.as_deref() != Some(expected_state) => {
            Callback::Denied("state mismatch".to_string())
        }
        Some(code) => Callback::Code(code),
        None => Callback::Unrelated,
    }
}

/// Generate an unguessable-enough anti-CSRF state value
fn random_state() -> String {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u128(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default(),
    );
    let high = hasher.finish();
    let low = RandomState::new().build_hasher().finish();
    format!("{:016x}{:016x}", high, low)
}
