//! Error types for sentinel-agent

use sentinel_core::SentinelError;
use thiserror::Error;

/// Result type for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Error type for agent operations
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] SentinelError),

    /// Identity facts required for self-termination could not be fetched
    #[error("Startup failed: {0}")]
    Startup(String),
}

impl AgentError {
    /// Create a startup error
    pub fn startup(msg: impl Into<String>) -> Self {
        Self::Startup(msg.into())
    }
}

/// Collaborator traits speak `SentinelError`; HTTP and JSON failures are
/// reported as an unreachable or unusable metadata source.
impl From<AgentError> for SentinelError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::Core(inner) => inner,
            AgentError::Http(e) => SentinelError::unavailable(e.to_string()),
            AgentError::Json(e) => SentinelError::unavailable(format!("malformed response: {e}")),
            AgentError::Startup(msg) => SentinelError::Config(msg),
        }
    }
}
