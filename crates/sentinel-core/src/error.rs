//! Error types for Sentinel

use std::time::Duration;
use thiserror::Error;

/// Result type for collaborator operations
pub type Result<T> = std::result::Result<T, SentinelError>;

/// Core error type for Sentinel operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SentinelError {
    #[error("Metadata unavailable: {0}")]
    MetadataUnavailable(String),

    #[error("Metadata {key} returned {status}")]
    MetadataNotOk { key: String, status: u16 },

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Credentials error: {0}")]
    Credentials(String),

    #[error("Termination failed: {0}")]
    Termination(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SentinelError {
    /// Create a metadata transport error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::MetadataUnavailable(msg.into())
    }

    /// Create a termination error
    pub fn termination(msg: impl Into<String>) -> Self {
        Self::Termination(msg.into())
    }

    /// Create a credentials error
    pub fn credentials(msg: impl Into<String>) -> Self {
        Self::Credentials(msg.into())
    }
}
