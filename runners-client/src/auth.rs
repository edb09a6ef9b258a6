//! OAuth2 client-credentials authentication
//!
//! Exchanges a client id and secret for an access token at the token endpoint
//! and caches the token until shortly before it expires.

use std::fmt;
use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::TransportError;

/// Tokens are refreshed this long before their reported expiry
const EXPIRY_DELTA: Duration = Duration::from_secs(10);

/// Client-credentials grant against a token endpoint
pub struct ClientCredentials {
    token_url: String,
    client_id: String,
    client_secret: String,
    scopes: Vec<String>,
    cached: Mutex<Option<CachedToken>>,
}

impl ClientCredentials {
    pub fn new(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scopes: Vec::new(),
            cached: Mutex::new(None),
        }
    }

    /// Request the given scopes with every token
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Return a valid access token, fetching a new one if needed
    ///
    /// The cache lock is held while fetching so concurrent callers share a
    /// single refresh.
    pub async fn access_token(&self, client: &Client) -> Result<String, TransportError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref().filter(|t| t.is_valid_at(Instant::now())) {
            return Ok(token.access_token.clone());
        }

        debug!(token_url = %self.token_url, "requesting access token");
        let token = self.fetch(client).await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);

        Ok(access_token)
    }

    async fn fetch(&self, client: &Client) -> Result<CachedToken, TransportError> {
        let mut form = vec![("grant_type", "client_credentials".to_string())];
        if !self.scopes.is_empty() {
            form.push(("scope", self.scopes.join(" ")));
        }

        let response = client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Token {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response.json().await?;
        CachedToken::from_response(token, Instant::now())
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("scopes", &self.scopes)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    /// `None` means the server did not report an expiry
    expires_at: Option<Instant>,
}

impl CachedToken {
    fn from_response(response: TokenResponse, now: Instant) -> Result<Self, TransportError> {
        if response.access_token.is_empty() {
            return Err(TransportError::other(
                "token response missing access_token",
            ));
        }

        Ok(Self {
            access_token: response.access_token,
            expires_at: response
                .expires_in
                .and_then(|secs| now.checked_add(Duration::from_secs(secs))),
        })
    }

    fn is_valid_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires_at) => now + EXPIRY_DELTA < expires_at,
            None => true,
        }
    }
}
