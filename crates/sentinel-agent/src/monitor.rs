//! Lifecycle monitoring loop
//!
//! ```text
//! RUNNING ──ttl exceeded──▶ GRACE_WAIT ──▶ TERMINATING ──▶ EXITED
//!    │
//!    └────preempted───────────────────────────────────────▶ EXITED
//! ```
//!
//! Each cycle checks the TTL first and only then probes the preemption flag,
//! so a self-initiated termination wins when both are true in the same tick.
//! The grace wait is not interrupted by preemption. On preemption the
//! platform is already deleting the VM within ~30s, so no delete is issued.

use sentinel_core::{
    InstanceIdentity, LifecycleConfig, MetadataProvider, MonitorOutcome, Notifier,
    TerminationSignal, Terminator, time_left, ttl_exceeded,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, error, info, warn};

use crate::message;
use crate::metadata::probe_preemption;

/// Loop state, owned by [`LifecycleMonitor::run`] and threaded through
/// every cycle. `terminated` flips once; a terminal action on a state that
/// already flipped is refused.
#[derive(Debug)]
pub struct MonitorState {
    start: Instant,
    terminated: bool,
}

impl MonitorState {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            terminated: false,
        }
    }

    fn uptime(&self) -> Duration {
        self.start.elapsed()
    }

    /// Claim the single termination slot. False if it was already taken.
    fn begin_termination(&mut self) -> bool {
        !std::mem::replace(&mut self.terminated, true)
    }
}

/// Watches one instance's TTL and preemption status
pub struct LifecycleMonitor {
    identity: InstanceIdentity,
    config: LifecycleConfig,
    metadata: Arc<dyn MetadataProvider>,
    notifier: Arc<dyn Notifier>,
    terminator: Arc<dyn Terminator>,
}

impl LifecycleMonitor {
    pub fn new(
        identity: InstanceIdentity,
        config: LifecycleConfig,
        metadata: Arc<dyn MetadataProvider>,
        notifier: Arc<dyn Notifier>,
        terminator: Arc<dyn Terminator>,
    ) -> Self {
        Self {
            identity,
            config,
            metadata,
            notifier,
            terminator,
        }
    }

    pub fn identity(&self) -> &InstanceIdentity {
        &self.identity
    }

    /// Send the one-off launch summary
    pub async fn announce(&self) {
        let text = message::launched(&self.identity, self.config.terminate_after_hours);
        self.notifier.notify(&text).await;
    }

    /// Poll until a termination signal is acted upon.
    ///
    /// Uptime is measured from this call. Never returns while neither signal
    /// fires.
    pub async fn run(&self) -> MonitorOutcome {
        let mut state = MonitorState::new();
        let terminate_after = self.config.terminate_after();

        loop {
            let uptime = state.uptime();

            if let Some(signal) = self.evaluate(uptime).await {
                if let Some(outcome) = self.act(signal, &mut state).await {
                    return outcome;
                }
            }

            info!(
                "Time left: {}",
                message::format_duration(time_left(uptime, terminate_after))
            );
            sleep(self.config.poll_interval).await;
        }
    }

    /// One poll cycle's decision, TTL before preemption
    async fn evaluate(&self, uptime: Duration) -> Option<TerminationSignal> {
        if ttl_exceeded(uptime, self.config.terminate_after()) {
            return Some(TerminationSignal::TtlExceeded { uptime });
        }

        if self.preempted().await {
            return Some(TerminationSignal::Preempted);
        }

        None
    }

    /// Probe failures, including timeouts, count as "not preempted" for this cycle
    async fn preempted(&self) -> bool {
        let probe = probe_preemption(
            self.metadata.as_ref(),
            self.config.watch_maintenance_event,
            self.config.probe_timeout,
        );

        match probe.await {
            Ok(preempted) => preempted,
            Err(e) => {
                warn!(error = %e, "Spot termination check failed");
                false
            }
        }
    }

    /// Run the terminal action for `signal`.
    ///
    /// Returns `None` without side effects when `state` already terminated.
    async fn act(
        &self,
        signal: TerminationSignal,
        state: &mut MonitorState,
    ) -> Option<MonitorOutcome> {
        if !state.begin_termination() {
            error!(?signal, "Termination already handled, refusing to act twice");
            return None;
        }
        debug!(?signal, ?state, "Leaving monitoring loop");

        let outcome = match signal {
            TerminationSignal::TtlExceeded { uptime } => {
                let grace = self.config.grace_period;
                self.notifier
                    .notify(&message::ttl_crossed(&self.identity, grace))
                    .await;
                warn!(
                    uptime_secs = uptime.as_secs(),
                    "Crossed uptime threshold. Terminating in {}",
                    message::format_duration(grace)
                );

                sleep(grace).await;

                let id = &self.identity;
                match self
                    .terminator
                    .terminate(&id.project_id, &id.zone, &id.name)
                    .await
                {
                    Ok(()) => MonitorOutcome::TtlExpired { terminate_ok: true },
                    Err(e) => {
                        error!(error = %e, "Termination failed");
                        MonitorOutcome::TtlExpired {
                            terminate_ok: false,
                        }
                    }
                }
            }
            TerminationSignal::Preempted => {
                warn!(instance = %self.identity.name, "Instance is being preempted");
                self.notifier
                    .notify(&message::preempted(&self.identity))
                    .await;
                MonitorOutcome::Preempted
            }
        };

        Some(outcome)
    }
}
