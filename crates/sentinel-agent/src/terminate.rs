//! Instance self-termination
//!
//! Deletes this VM through the Compute Engine REST API:
//!
//! ```text
//! DELETE https://compute.googleapis.com/compute/v1/projects/{project}/zones/{zone}/instances/{name}
//! ```
//!
//! The call is authorized with the instance's own service account, which must
//! hold `compute.instances.delete` on itself. One attempt only; the caller logs
//! a failure and stops.

use async_trait::async_trait;
use sentinel_core::{CredentialProvider, SentinelError, Terminator};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::Result;

/// Upper bound on the delete round trip
pub const TERMINATE_TIMEOUT: Duration = Duration::from_secs(30);

/// Compute Engine client that can delete a single instance
pub struct ComputeTerminator {
    client: reqwest::Client,
    api_base: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl ComputeTerminator {
    /// Terminator against `api_base`, normally
    /// [`crate::config::DEFAULT_COMPUTE_API_BASE_URL`]
    pub fn with_api_base(
        api_base: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(TERMINATE_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.into(),
            credentials,
        })
    }

    fn instance_url(&self, project_id: &str, zone: &str, instance_name: &str) -> String {
        format!(
            "{}/compute/v1/projects/{}/zones/{}/instances/{}",
            self.api_base.trim_end_matches('/'),
            project_id,
            zone,
            instance_name
        )
    }
}

#[async_trait]
impl Terminator for ComputeTerminator {
    async fn terminate(
        &self,
        project_id: &str,
        zone: &str,
        instance_name: &str,
    ) -> sentinel_core::Result<()> {
        let token = self.credentials.access_token().await?;
        let url = self.instance_url(project_id, zone, instance_name);

        info!(instance = %instance_name, zone = %zone, project = %project_id, "Deleting instance");

        let response = self
            .client
            .delete(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| SentinelError::termination(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Compute API rejected delete");
            return Err(SentinelError::termination(format!(
                "compute API returned {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        info!(instance = %instance_name, "Delete operation accepted");
        Ok(())
    }
}
