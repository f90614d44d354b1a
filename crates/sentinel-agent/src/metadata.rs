//! GCE instance metadata client
//!
//! Reads identity and preemption facts from the local metadata server:
//!
//! ```text
//! http://metadata.google.internal/computeMetadata/v1/instance/preempted
//! ```
//!
//! Every request must carry `Metadata-Flavor: Google`, otherwise the server
//! answers 403. Bodies are plain text; paths such as `instance/zone` come back
//! fully qualified (`projects/123/zones/us-central1-a`).
//!
//! ## Preemption
//!
//! GCE flips `instance/preempted` to `TRUE` roughly 30 seconds before it
//! reclaims a spot/preemptible VM. Optionally `instance/maintenance-event`
//! reporting `TERMINATE_ON_HOST_MAINTENANCE` is treated the same way.

use async_trait::async_trait;
use sentinel_core::{
    MetadataProvider, SentinelError, is_preempted_flag, is_terminating_maintenance,
};
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

use crate::error::{AgentError, Result};

/// Header the metadata server requires on every request
pub const METADATA_FLAVOR_HEADER: &str = "Metadata-Flavor";
pub const METADATA_FLAVOR_VALUE: &str = "Google";

pub const KEY_INSTANCE_ID: &str = "instance/id";
pub const KEY_INSTANCE_NAME: &str = "instance/name";
pub const KEY_ZONE: &str = "instance/zone";
pub const KEY_MACHINE_TYPE: &str = "instance/machine-type";
pub const KEY_PROJECT_ID: &str = "project/project-id";
pub const KEY_PREEMPTED: &str = "instance/preempted";
pub const KEY_MAINTENANCE_EVENT: &str = "instance/maintenance-event";
pub const KEY_DEFAULT_TOKEN: &str = "instance/service-accounts/default/token";

/// HTTP client for the metadata server
pub struct HttpMetadataClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMetadataClient {
    /// Client for the metadata server at `base_url`
    ///
    /// In production this is [`crate::config::DEFAULT_METADATA_BASE_URL`].
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(sentinel_core::METADATA_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn url_for(&self, key: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            key.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl MetadataProvider for HttpMetadataClient {
    async fn get(&self, key: &str) -> sentinel_core::Result<String> {
        let url = self.url_for(key);
        debug!(key = %key, "Fetching metadata from {}", url);

        let response = self
            .client
            .get(&url)
            .header(METADATA_FLAVOR_HEADER, METADATA_FLAVOR_VALUE)
            .send()
            .await
            .map_err(AgentError::from)?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(SentinelError::MetadataNotOk {
                key: key.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await.map_err(AgentError::from)?)
    }
}

/// One metadata read bounded by `limit`, independent of the provider's own timeout
pub async fn get_within(
    metadata: &dyn MetadataProvider,
    key: &str,
    limit: Duration,
) -> sentinel_core::Result<String> {
    timeout(limit, metadata.get(key))
        .await
        .map_err(|_| SentinelError::Timeout(limit))?
}

/// Ask the metadata server whether the platform is reclaiming this instance.
///
/// The `instance/preempted` flag is authoritative. When `watch_maintenance` is
/// set and the flag is clear, a terminating maintenance event also counts; a
/// failure on that secondary read is treated as "no". Each read gets its own
/// `per_call` budget.
pub async fn probe_preemption(
    metadata: &dyn MetadataProvider,
    watch_maintenance: bool,
    per_call: Duration,
) -> sentinel_core::Result<bool> {
    let flag = get_within(metadata, KEY_PREEMPTED, per_call).await?;
    if is_preempted_flag(&flag) {
        return Ok(true);
    }

    if !watch_maintenance {
        return Ok(false);
    }

    match get_within(metadata, KEY_MAINTENANCE_EVENT, per_call).await {
        Ok(event) => Ok(is_terminating_maintenance(&event)),
        Err(e) => {
            debug!(error = %e, "Maintenance event probe failed, ignoring");
            Ok(false)
        }
    }
}
