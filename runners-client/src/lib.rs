//! Runners HTTP Client
//!
//! A typed client for the workspace runners API: list, fetch, create and
//! delete runners, and move them between statuses.
//!
//! The client translates each operation into an HTTP request issued through
//! an [`HttpTransport`], and the response back into a typed value or a
//! [`ClientError`]. It keeps no state between calls.
//!
//! # Example
//!
//! ```no_run
//! use runners_client::RunnerClient;
//! use runners_client::config::ClientConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::from_env()?;
//!     config.validate()?;
//!
//!     let client = RunnerClient::from_config(&config)?;
//!     let runner = client
//!         .create_runner("autoscaled-1", vec!["self.hosted".to_string(), "linux".to_string()])
//!         .await?;
//!
//!     println!("Created runner: {}", runner.uuid);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod error;
mod runners;
pub mod transport;

// Re-export commonly used types
pub use error::{ClientError, Operation, Result, TransportError};
pub use runners_core::domain::runner::{OauthClient, Runner, State};
pub use runners_core::dto::runner::RunnerList;
pub use transport::{HttpRequest, HttpTransport, RawResponse, ReqwestTransport};

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::ClientCredentials;
use crate::config::ClientConfig;

/// HTTP client for the runners of one workspace
///
/// Safe to share between concurrent callers as long as the transport is.
#[derive(Clone)]
pub struct RunnerClient {
    /// Base URL of the API (e.g., "https://api.bitbucket.org/internal")
    base_url: String,
    /// Workspace identifier embedded in every path
    workspace: String,
    /// Transport used for every request
    transport: Arc<dyn HttpTransport>,
}

impl RunnerClient {
    /// Page length requested when listing runners
    pub const PAGE_LEN: u32 = 100;

    /// Create a new runner client
    ///
    /// # Arguments
    /// * `transport` - The transport requests are issued through
    /// * `base_url` - The API base URL, used verbatim
    /// * `workspace` - The workspace identifier
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use runners_client::{ReqwestTransport, RunnerClient};
    ///
    /// let client = RunnerClient::new(
    ///     Arc::new(ReqwestTransport::default()),
    ///     "http://localhost:8080",
    ///     "my-workspace",
    /// );
    /// assert_eq!(client.workspace(), "my-workspace");
    /// ```
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        base_url: impl Into<String>,
        workspace: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            workspace: workspace.into(),
            transport,
        }
    }

    /// Create a client that authenticates with OAuth2 client credentials
    ///
    /// The configuration is used as given; call
    /// [`ClientConfig::validate`] first to reject obviously bad settings.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Transport(e.into()))?;

        let credentials = ClientCredentials::new(
            config.token_url.clone(),
            config.client_id.clone(),
            config.client_secret.clone(),
        );

        let transport = ReqwestTransport::with_credentials(http, credentials);

        Ok(Self::new(
            Arc::new(transport),
            config.base_url.clone(),
            config.workspace.clone(),
        ))
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the workspace identifier
    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    fn runners_url(&self) -> String {
        format!(
            "{}/workspaces/{}/pipelines-config/runners",
            self.base_url, self.workspace
        )
    }

    fn runner_url(&self, runner_id: &str) -> String {
        format!("{}/{}", self.runners_url(), runner_id)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Read the body, check the status and deserialize JSON
    ///
    /// The body is read before the status is checked so a rejected status can
    /// report it; a failure to read it is returned as is.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        operation: Operation,
        response: RawResponse,
        accept: impl Fn(u16) -> bool,
    ) -> Result<T> {
        let status = response.status();
        debug!(%operation, status, "received response");

        let body = response.bytes().await.map_err(ClientError::BodyRead)?;

        if !accept(status) {
            return Err(ClientError::status_error(
                operation,
                status,
                String::from_utf8_lossy(&body),
            ));
        }

        serde_json::from_slice(&body).map_err(|source| ClientError::Decode { operation, source })
    }

    /// Check the status of a response that carries no payload
    ///
    /// The body is only read when the status is rejected.
    async fn handle_empty_response(
        &self,
        operation: Operation,
        response: RawResponse,
        accept: impl Fn(u16) -> bool,
    ) -> Result<()> {
        let status = response.status();
        debug!(%operation, status, "received response");

        if accept(status) {
            return Ok(());
        }

        let body = response.text().await.map_err(ClientError::BodyRead)?;
        Err(ClientError::status_error(operation, status, body))
    }
}

impl std::fmt::Debug for RunnerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunnerClient")
            .field("base_url", &self.base_url)
            .field("workspace", &self.workspace)
            .finish_non_exhaustive()
    }
}
