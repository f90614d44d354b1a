//! Collaborator traits for Sentinel
//!
//! The lifecycle monitor works through these interfaces ONLY - never the
//! HTTP-backed types - so every decision path can be driven by fakes.

use async_trait::async_trait;

use crate::error::Result;

/// Read-only access to the local instance metadata endpoint.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Raw body for a metadata key such as `instance/zone`.
    ///
    /// Implementations bound their own round trip; callers still wrap calls
    /// on the hot path in their own timeout.
    async fn get(&self, key: &str) -> Result<String>;
}

/// Best-effort operator channel.
///
/// Delivery failures are logged by the implementation and never surface to
/// the caller.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str);
}

/// Issues the one-shot delete for an instance.
#[async_trait]
pub trait Terminator: Send + Sync {
    async fn terminate(&self, project_id: &str, zone: &str, instance_name: &str) -> Result<()>;
}

/// Source of bearer tokens for control-plane calls.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}
