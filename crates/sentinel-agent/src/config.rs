//! Agent configuration
//!
//! Read once from the process environment at startup. There are no flags and
//! no config files; anything unset falls back to the defaults below.

use sentinel_core::{LifecycleConfig, parse_terminate_after_hours};

/// GCE metadata server, reachable from inside the instance only
pub const DEFAULT_METADATA_BASE_URL: &str = "http://metadata.google.internal/computeMetadata/v1/";

/// Compute Engine REST API
pub const DEFAULT_COMPUTE_API_BASE_URL: &str = "https://compute.googleapis.com";

pub const ENV_TERMINATE_AFTER_HOURS: &str = "TERMINATE_AFTER_HOURS";
pub const ENV_NOTIFY_WEBHOOK_URL: &str = "NOTIFY_WEBHOOK_URL";
pub const ENV_METADATA_BASE_URL: &str = "METADATA_BASE_URL";
pub const ENV_COMPUTE_API_BASE_URL: &str = "COMPUTE_API_BASE_URL";
pub const ENV_WATCH_MAINTENANCE_EVENT: &str = "WATCH_MAINTENANCE_EVENT";

/// Everything main needs to wire the collaborators and the monitor
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub lifecycle: LifecycleConfig,

    /// Notification endpoint; `None` routes notifications to the log
    pub webhook_url: Option<String>,

    pub metadata_base_url: String,

    pub compute_api_base_url: String,
}

impl AgentConfig {
    /// Load from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary lookup (used by tests)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let hours = parse_terminate_after_hours(lookup(ENV_TERMINATE_AFTER_HOURS).as_deref());
        let watch_maintenance = lookup(ENV_WATCH_MAINTENANCE_EVENT)
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Self {
            lifecycle: LifecycleConfig::new(hours).with_maintenance_watch(watch_maintenance),
            webhook_url: non_empty(lookup(ENV_NOTIFY_WEBHOOK_URL)),
            metadata_base_url: non_empty(lookup(ENV_METADATA_BASE_URL))
                .unwrap_or_else(|| DEFAULT_METADATA_BASE_URL.to_string()),
            compute_api_base_url: non_empty(lookup(ENV_COMPUTE_API_BASE_URL))
                .unwrap_or_else(|| DEFAULT_COMPUTE_API_BASE_URL.to_string()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AgentConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AgentConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_environment_empty() {
        let config = config_from(&[]);
        assert_eq!(config.lifecycle.terminate_after_hours, 24);
        assert!(!config.lifecycle.watch_maintenance_event);
        assert!(config.webhook_url.is_none());
        assert_eq!(config.metadata_base_url, DEFAULT_METADATA_BASE_URL);
        assert_eq!(config.compute_api_base_url, DEFAULT_COMPUTE_API_BASE_URL);
    }

    #[test]
    fn test_terminate_after_hours_override() {
        let hours = |raw: &str| {
            config_from(&[("TERMINATE_AFTER_HOURS", raw)])
                .lifecycle
                .terminate_after_hours
        };
        assert_eq!(hours("3"), 3);
        assert_eq!(hours("abc"), 24);
        assert_eq!(hours("-3"), -3);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("NOTIFY_WEBHOOK_URL", "https://hooks.example.com/ops"),
            ("METADATA_BASE_URL", "http://127.0.0.1:9000/"),
            ("COMPUTE_API_BASE_URL", "http://127.0.0.1:9001"),
            ("WATCH_MAINTENANCE_EVENT", "True"),
        ]);
        assert_eq!(config.webhook_url.as_deref(), Some("https://hooks.example.com/ops"));
        assert_eq!(config.metadata_base_url, "http://127.0.0.1:9000/");
        assert_eq!(config.compute_api_base_url, "http://127.0.0.1:9001");
        assert!(config.lifecycle.watch_maintenance_event);
    }

    #[test]
    fn test_blank_webhook_is_ignored() {
        assert!(config_from(&[("NOTIFY_WEBHOOK_URL", "  ")]).webhook_url.is_none());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag("yes"));
        assert!(parse_flag("TRUE"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("off"));
        assert!(!parse_flag(""));
    }
}
