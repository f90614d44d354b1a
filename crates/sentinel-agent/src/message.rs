//! Operator-facing notification text

use sentinel_core::InstanceIdentity;
use std::time::Duration;

/// Compact rendering: `15m`, `1h30m`, `2h`, `45s`. Sub-second parts are dropped.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    if total == 0 {
        return "0s".to_string();
    }

    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    if seconds > 0 {
        out.push_str(&format!("{seconds}s"));
    }
    out
}

/// Sent once after the identity bootstrap
pub fn launched(identity: &InstanceIdentity, terminate_after_hours: i64) -> String {
    format!(
        "GCP Instance Launched\n\
         ```\n\
         Name: {}\n\
         ID: {}\n\
         Zone: {}\n\
         Type: {}\n\
         Project: {}\n\
         Terminate after: {} hours\n\
         ```\n",
        identity.name,
        identity.id,
        identity.zone,
        identity.machine_type,
        identity.project_id,
        terminate_after_hours
    )
}

/// Sent when the TTL fires, before the grace period starts
pub fn ttl_crossed(identity: &InstanceIdentity, grace_period: Duration) -> String {
    format!(
        "Instance `{}` in `{}` crossed uptime threshold. Will terminate in {}",
        identity.name,
        identity.zone,
        format_duration(grace_period)
    )
}

/// Sent when the platform starts reclaiming the instance
pub fn preempted(identity: &InstanceIdentity) -> String {
    format!(
        "🚨 Instance `{}` in `{}` is being PREEMPTED by GCP",
        identity.name, identity.zone
    )
}
