//! Client configuration
//!
//! Connection and credential settings for building an authenticated
//! [`RunnerClient`](crate::RunnerClient).

use std::time::Duration;

/// Default API base URL; runner paths are appended to it verbatim
pub const DEFAULT_BASE_URL: &str = "https://api.bitbucket.org/internal";

/// Default OAuth2 token endpoint
pub const DEFAULT_TOKEN_URL: &str = "https://bitbucket.org/site/oauth2/access_token";

/// Client configuration
#[derive(Clone)]
pub struct ClientConfig {
    /// API base URL, used as given (no trailing-slash normalization)
    pub base_url: String,

    /// Workspace the runners belong to
    pub workspace: String,

    /// OAuth2 token endpoint
    pub token_url: String,

    /// OAuth2 client id
    pub client_id: String,

    /// OAuth2 client secret
    pub client_secret: String,

    /// Timeout applied to every HTTP request, token requests included
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Creates a new configuration with defaults
    pub fn new(
        workspace: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            workspace: workspace.into(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - BITBUCKET_WORKSPACE (required)
    /// - BITBUCKET_CLIENT_ID (required)
    /// - BITBUCKET_CLIENT_SECRET (required)
    /// - BITBUCKET_BASE_URL (optional)
    /// - BITBUCKET_TOKEN_URL (optional)
    /// - BITBUCKET_REQUEST_TIMEOUT (optional, seconds, default: 30)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| anyhow::anyhow!("{} environment variable not set", key))
        };

        let mut config = Self::new(
            required("BITBUCKET_WORKSPACE")?,
            required("BITBUCKET_CLIENT_ID")?,
            required("BITBUCKET_CLIENT_SECRET")?,
        );

        if let Some(base_url) = lookup("BITBUCKET_BASE_URL") {
            config.base_url = base_url;
        }

        if let Some(token_url) = lookup("BITBUCKET_TOKEN_URL") {
            config.token_url = token_url;
        }

        if let Some(timeout) = lookup("BITBUCKET_REQUEST_TIMEOUT") {
            let secs = timeout
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("BITBUCKET_REQUEST_TIMEOUT must be a number of seconds"))?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Overrides the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.workspace.is_empty() {
            anyhow::bail!("workspace cannot be empty");
        }

        if self.client_id.is_empty() || self.client_secret.is_empty() {
            anyhow::bail!("client_id and client_secret cannot be empty");
        }

        for (name, url) in [("base_url", &self.base_url), ("token_url", &self.token_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with http:// or https://", name);
            }
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("workspace", &self.workspace)
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
