//! Runner-related API endpoints

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use runners_core::domain::runner::{Runner, status};
use runners_core::dto::runner::{PostRunnerRequest, RunnerList, StatusUpdateRequest};
use tracing::debug;

use crate::RunnerClient;
use crate::error::{ClientError, Operation, Result};
use crate::transport::{CONTENT_TYPE_JSON, HttpRequest};

impl RunnerClient {
    // =============================================================================
    // Runner Query
    // =============================================================================

    /// List the first page of runners in the workspace
    ///
    /// At most [`RunnerClient::PAGE_LEN`] runners are returned; further pages
    /// are not fetched.
    pub async fn list_runners(&self) -> Result<RunnerList> {
        let url = format!("{}?pagelen={}", self.runners_url(), Self::PAGE_LEN);
        debug!(%url, "listing runners");

        let response = self
            .transport
            .get(&url)
            .await
            .map_err(ClientError::Transport)?;

        self.handle_response(Operation::ListRunners, response, |status| status == 200)
            .await
    }

    /// Get a runner by ID
    ///
    /// # Arguments
    /// * `runner_id` - The runner UUID, embedded in the path as given
    pub async fn get_runner(&self, runner_id: &str) -> Result<Runner> {
        let url = self.runner_url(runner_id);
        debug!(%url, "fetching runner");

        let response = self
            .transport
            .get(&url)
            .await
            .map_err(ClientError::Transport)?;

        self.handle_response(Operation::GetRunner, response, |status| status == 200)
            .await
    }

    // =============================================================================
    // Runner Lifecycle
    // =============================================================================

    /// Create a runner
    ///
    /// # Arguments
    /// * `name` - Name of the new runner
    /// * `labels` - Labels used to route steps to the runner
    ///
    /// # Returns
    /// The created runner, including the OAuth client it authenticates with
    ///
    /// # Example
    /// ```no_run
    /// # use std::sync::Arc;
    /// # use runners_client::{ReqwestTransport, RunnerClient};
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = RunnerClient::new(
    ///     Arc::new(ReqwestTransport::default()),
    ///     "http://localhost:8080",
    ///     "my-workspace",
    /// );
    /// let runner = client
    ///     .create_runner("autoscaled-1", vec!["self.hosted".to_string(), "linux".to_string()])
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_runner(
        &self,
        name: impl Into<String>,
        labels: Vec<String>,
    ) -> Result<Runner> {
        let url = self.runners_url();
        let request = PostRunnerRequest {
            name: name.into(),
            labels,
        };
        let body = serde_json::to_vec(&request)
            .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;

        debug!(%url, name = %request.name, "creating runner");

        let response = self
            .transport
            .post(&url, CONTENT_TYPE_JSON, body)
            .await
            .map_err(ClientError::Transport)?;

        // The API answers 200 or 201 depending on the deployment
        self.handle_response(Operation::CreateRunner, response, |status| {
            matches!(status, 200 | 201)
        })
        .await
    }

    /// Delete a runner
    ///
    /// # Arguments
    /// * `runner_id` - The runner UUID to delete
    pub async fn delete_runner(&self, runner_id: &str) -> Result<()> {
        let request = HttpRequest::new(Method::DELETE, self.runner_url(runner_id));
        debug!(url = %request.url, "deleting runner");

        let response = self
            .transport
            .execute(request)
            .await
            .map_err(ClientError::Transport)?;

        let status = response.status();
        debug!(operation = %Operation::DeleteRunner, status, "received response");

        if status == 204 {
            return Ok(());
        }

        // Best effort: an unreadable body must not hide the status
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::status_error(
            Operation::DeleteRunner,
            status,
            body,
        ))
    }

    /// Change the status of a runner
    ///
    /// Any 2xx answer counts as success.
    ///
    /// # Arguments
    /// * `runner_id` - The runner UUID
    /// * `new_status` - The status to move to, e.g. `ENABLED` or `DISABLED`
    pub async fn set_runner_status(&self, runner_id: &str, new_status: &str) -> Result<()> {
        let body = serde_json::to_vec(&StatusUpdateRequest {
            status: new_status.to_string(),
        })
        .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;

        let request = HttpRequest::new(Method::PUT, format!("{}/state", self.runner_url(runner_id)))
            .header(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON))
            .body(body);
        debug!(url = %request.url, status = new_status, "updating runner status");

        let response = self
            .transport
            .execute(request)
            .await
            .map_err(ClientError::Transport)?;

        self.handle_empty_response(Operation::SetRunnerStatus, response, |status| {
            (200..300).contains(&status)
        })
        .await
    }

    /// Enable a runner so it accepts steps again
    pub async fn enable_runner(&self, runner_id: &str) -> Result<()> {
        self.set_runner_status(runner_id, status::ENABLED).await
    }

    /// Disable a runner so it stops accepting steps
    pub async fn disable_runner(&self, runner_id: &str) -> Result<()> {
        self.set_runner_status(runner_id, status::DISABLED).await
    }
}
