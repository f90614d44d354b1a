//! Operator notifications
//!
//! Fire-and-forget: a notification that cannot be delivered is logged and
//! dropped. Nothing here can stall or abort the monitor beyond the request
//! timeout.

use async_trait::async_trait;
use sentinel_core::Notifier;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::Result;

/// Upper bound on a single webhook delivery
pub const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    message: &'a str,
}

/// Posts `{"message": "..."}` to a fixed webhook
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(NOTIFY_TIMEOUT).build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, message: &str) {
        let payload = WebhookPayload { message };

        match self.client.post(&self.url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => {
                warn!(
                    status = response.status().as_u16(),
                    "Notification webhook returned non-2xx status"
                );
            }
            Err(e) => {
                warn!(error = %e, "Notification POST failed");
            }
        }
    }
}

/// Used when no webhook is configured: the message only reaches the log
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &str) {
        info!(notification = %message, "Notification (no webhook configured)");
    }
}
