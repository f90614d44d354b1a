//! Startup identity bootstrap
//!
//! Fetches the static facts the monitor needs once, before the loop starts.
//! Everything except the display name is required for self-termination, so a
//! failure there aborts startup.

use sentinel_core::{InstanceIdentity, MetadataProvider, UNKNOWN_NAME, short_name};
use tracing::{info, warn};

use crate::error::{AgentError, Result};
use crate::metadata::{
    KEY_INSTANCE_ID, KEY_INSTANCE_NAME, KEY_MACHINE_TYPE, KEY_PROJECT_ID, KEY_ZONE,
};

/// Fetch a required key, turning any failure into a fatal startup error
async fn required(metadata: &dyn MetadataProvider, key: &str, what: &str) -> Result<String> {
    metadata
        .get(key)
        .await
        .map(|value| value.trim().to_string())
        .map_err(|e| AgentError::startup(format!("failed to get {what}: {e}")))
}

/// Resolve this instance's identity from the metadata server.
pub async fn fetch_identity(metadata: &dyn MetadataProvider) -> Result<InstanceIdentity> {
    let id = required(metadata, KEY_INSTANCE_ID, "instance ID").await?;

    let name = match metadata.get(KEY_INSTANCE_NAME).await {
        Ok(name) => name.trim().to_string(),
        Err(e) => {
            warn!(error = %e, "Failed to get instance name, using placeholder");
            UNKNOWN_NAME.to_string()
        }
    };

    let full_zone = required(metadata, KEY_ZONE, "zone").await?;
    let full_type = required(metadata, KEY_MACHINE_TYPE, "machine type").await?;
    let project_id = required(metadata, KEY_PROJECT_ID, "project ID").await?;

    let identity = InstanceIdentity {
        id,
        name,
        zone: short_name(&full_zone).to_string(),
        machine_type: short_name(&full_type).to_string(),
        project_id,
    };

    info!(
        instance = %identity.name,
        id = %identity.id,
        zone = %identity.zone,
        machine_type = %identity.machine_type,
        project = %identity.project_id,
        "Resolved instance identity"
    );

    Ok(identity)
}
