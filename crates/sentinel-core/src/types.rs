//! Core types shared across Sentinel components

use std::time::Duration;

/// TTL applied when `TERMINATE_AFTER_HOURS` is unset or unusable
pub const DEFAULT_TERMINATE_AFTER_HOURS: i64 = 24;

/// Delay between announcing a TTL termination and issuing it
pub const GRACE_PERIOD: Duration = Duration::from_secs(15 * 60);

/// Delay between two poll cycles
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Upper bound on a single metadata round trip
pub const METADATA_TIMEOUT: Duration = Duration::from_secs(2);

/// Display name used when `instance/name` cannot be fetched
pub const UNKNOWN_NAME: &str = "unknown";

/// Identity facts fetched once at startup, never mutated afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceIdentity {
    pub id: String,
    pub name: String,
    /// Short form, e.g. `us-central1-a`
    pub zone: String,
    /// Short form, e.g. `e2-medium`
    pub machine_type: String,
    pub project_id: String,
}

impl std::fmt::Display for InstanceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}) in {}/{}", self.name, self.id, self.project_id, self.zone)
    }
}

/// Lifecycle timing policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// Maximum uptime, in whole hours. Zero or negative expires immediately.
    pub terminate_after_hours: i64,
    pub grace_period: Duration,
    pub poll_interval: Duration,
    /// Bound the monitor applies around each preemption probe
    pub probe_timeout: Duration,
    /// OR `instance/maintenance-event == TERMINATE_ON_HOST_MAINTENANCE` into the preemption check
    pub watch_maintenance_event: bool,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TERMINATE_AFTER_HOURS)
    }
}

impl LifecycleConfig {
    /// Create a config with the fixed grace period and poll interval
    pub fn new(terminate_after_hours: i64) -> Self {
        Self {
            terminate_after_hours,
            grace_period: GRACE_PERIOD,
            poll_interval: POLL_INTERVAL,
            probe_timeout: METADATA_TIMEOUT,
            watch_maintenance_event: false,
        }
    }

    /// Enable the maintenance-event preemption signal
    pub fn with_maintenance_watch(mut self, enabled: bool) -> Self {
        self.watch_maintenance_event = enabled;
        self
    }

    /// The TTL as a duration; non-positive hours map to zero
    pub fn terminate_after(&self) -> Duration {
        let hours = u64::try_from(self.terminate_after_hours).unwrap_or(0);
        Duration::from_secs(hours.saturating_mul(3600))
    }
}

/// Why the monitor decided to stop. Produced per poll cycle, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationSignal {
    /// Uptime crossed the configured TTL
    TtlExceeded { uptime: Duration },
    /// The platform announced it is reclaiming the instance
    Preempted,
}

/// How the monitoring loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorOutcome {
    /// TTL path: grace period elapsed and a delete was issued
    TtlExpired { terminate_ok: bool },
    /// Preemption path: operator notified, no delete issued
    Preempted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_fixed_timings() {
        let config = LifecycleConfig::default();
        assert_eq!(config.terminate_after_hours, 24);
        assert_eq!(config.grace_period, Duration::from_secs(900));
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert!(!config.watch_maintenance_event);
    }

    #[test]
    fn test_grace_period_independent_of_ttl() {
        for hours in [0, 1, 3, 24, 720] {
            assert_eq!(LifecycleConfig::new(hours).grace_period, GRACE_PERIOD);
        }
    }

    #[test]
    fn test_terminate_after_in_hours() {
        assert_eq!(LifecycleConfig::new(3).terminate_after(), Duration::from_secs(3 * 3600));
        assert_eq!(
            LifecycleConfig::new(i64::MAX).terminate_after(),
            Duration::from_secs(u64::MAX)
        );
    }

    #[test]
    fn test_non_positive_ttl_is_zero() {
        assert_eq!(LifecycleConfig::new(0).terminate_after(), Duration::ZERO);
        assert_eq!(LifecycleConfig::new(-3).terminate_after(), Duration::ZERO);
    }
}
