//! Control-plane credentials
//!
//! The instance's default service account is the only identity the agent
//! uses. Its short-lived OAuth token is served by the metadata server, so the
//! provider is just a typed view over one metadata key.

use async_trait::async_trait;
use sentinel_core::{CredentialProvider, MetadataProvider, SentinelError};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::metadata::KEY_DEFAULT_TOKEN;

/// Token response served at `instance/service-accounts/default/token`
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
    #[serde(default)]
    token_type: String,
}

/// Fetches access tokens for the default service account
pub struct MetadataTokenProvider {
    metadata: Arc<dyn MetadataProvider>,
}

impl MetadataTokenProvider {
    pub fn new(metadata: Arc<dyn MetadataProvider>) -> Self {
        Self { metadata }
    }

    async fn fetch(&self) -> Result<TokenResponse> {
        let body = self.metadata.get(KEY_DEFAULT_TOKEN).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl CredentialProvider for MetadataTokenProvider {
    async fn access_token(&self) -> sentinel_core::Result<String> {
        let token = self
            .fetch()
            .await
            .map_err(|e| SentinelError::credentials(e.to_string()))?;

        if token.access_token.is_empty() {
            return Err(SentinelError::credentials("empty access token"));
        }

        debug!(
            token_type = %token.token_type,
            expires_in = token.expires_in,
            "Obtained service account token"
        );

        Ok(token.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeMetadata;

    #[tokio::test]
    async fn test_parses_token() {
        let metadata = FakeMetadata::new().with(
            KEY_DEFAULT_TOKEN,
            r#"{"access_token":"ya29.c.abc","expires_in":3599,"token_type":"Bearer"}"#,
        );
        let provider = MetadataTokenProvider::new(Arc::new(metadata));

        assert_eq!(provider.access_token().await.unwrap(), "ya29.c.abc");
    }

    #[tokio::test]
    async fn test_malformed_token_is_credentials_error() {
        let metadata = FakeMetadata::new().with(KEY_DEFAULT_TOKEN, "<html>nope</html>");
        let provider = MetadataTokenProvider::new(Arc::new(metadata));

        match provider.access_token().await.unwrap_err() {
            SentinelError::Credentials(msg) => assert!(msg.starts_with("JSON error"), "{msg}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_token_is_credentials_error() {
        let provider = MetadataTokenProvider::new(Arc::new(FakeMetadata::new()));
        let err = provider.access_token().await.unwrap_err();
        assert!(matches!(err, SentinelError::Credentials(_)));
    }

    #[tokio::test]
    async fn test_empty_token_rejected() {
        let metadata = FakeMetadata::new().with(KEY_DEFAULT_TOKEN, r#"{"access_token":""}"#);
        let provider = MetadataTokenProvider::new(Arc::new(metadata));
        assert!(provider.access_token().await.is_err());
    }
}
