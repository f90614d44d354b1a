//! Sentinel Agent - lifecycle guardian for a single GCE instance
//!
//! Runs on the instance it guards and:
//! - Reads its identity from the metadata server (identity.rs)
//! - Announces itself on the operator channel (notify.rs)
//! - Self-terminates once the TTL is exceeded, after a grace period (terminate.rs)
//! - Reports platform preemption (metadata.rs, monitor.rs)
//!
//! Configuration comes from the environment only (config.rs).
//!
//! Binary: sentinel-agent

use anyhow::Context;
use chrono::Utc;
use sentinel_core::{MetadataProvider, MonitorOutcome, Notifier};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod auth;
mod config;
mod error;
mod identity;
mod message;
mod metadata;
mod monitor;
mod notify;
mod terminate;

#[cfg(test)]
mod testing;

use auth::MetadataTokenProvider;
use config::AgentConfig;
use metadata::HttpMetadataClient;
use monitor::LifecycleMonitor;
use notify::{LogNotifier, WebhookNotifier};
use terminate::ComputeTerminator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sentinel_agent=info,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AgentConfig::from_env();
    let lifecycle = config.lifecycle;
    let deadline = chrono::Duration::from_std(lifecycle.terminate_after())
        .ok()
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .map(|at| at.to_rfc3339())
        .unwrap_or_else(|| "never".to_string());

    info!("========================================");
    info!("Sentinel Agent starting");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!(
        "Instance will terminate in {} hours (around {})",
        lifecycle.terminate_after_hours, deadline
    );
    info!("Poll interval: {}", message::format_duration(lifecycle.poll_interval));
    info!("Grace period: {}", message::format_duration(lifecycle.grace_period));
    if lifecycle.watch_maintenance_event {
        info!("Maintenance events count as preemption");
    }
    info!("========================================");

    let metadata: Arc<dyn MetadataProvider> = Arc::new(
        HttpMetadataClient::with_base_url(&config.metadata_base_url)
            .context("building metadata client")?,
    );

    let notifier: Arc<dyn Notifier> = match &config.webhook_url {
        Some(url) => Arc::new(WebhookNotifier::new(url).context("building notifier")?),
        None => {
            warn!("NOTIFY_WEBHOOK_URL not set, notifications go to the log only");
            Arc::new(LogNotifier)
        }
    };

    let credentials = Arc::new(MetadataTokenProvider::new(metadata.clone()));
    let terminator = Arc::new(
        ComputeTerminator::with_api_base(&config.compute_api_base_url, credentials)
            .context("building compute client")?,
    );

    let identity = match identity::fetch_identity(metadata.as_ref()).await {
        Ok(identity) => identity,
        Err(e) => {
            error!(error = %e, "Cannot resolve instance identity, giving up");
            return Err(e.into());
        }
    };

    let monitor = LifecycleMonitor::new(identity, lifecycle, metadata, notifier, terminator);
    monitor.announce().await;

    info!(instance = %monitor.identity(), "Lifecycle monitoring active");

    match monitor.run().await {
        MonitorOutcome::TtlExpired { terminate_ok: true } => {
            info!("TTL reached, delete issued. Exiting");
        }
        MonitorOutcome::TtlExpired { terminate_ok: false } => {
            warn!("TTL reached but delete failed. Exiting");
        }
        MonitorOutcome::Preempted => {
            info!("Preempted by the platform. Exiting");
        }
    }

    Ok(())
}
