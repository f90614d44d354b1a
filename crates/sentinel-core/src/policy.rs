//! Pure lifecycle decisions
//!
//! Everything the monitor decides without touching the network lives here so
//! it can be checked exhaustively.

use std::time::Duration;

use crate::types::DEFAULT_TERMINATE_AFTER_HOURS;

/// Literal the metadata server returns in `instance/preempted` once reclamation starts
pub const PREEMPTED_FLAG: &str = "TRUE";

/// `instance/maintenance-event` value announcing a terminating host maintenance
pub const TERMINATE_ON_HOST_MAINTENANCE: &str = "TERMINATE_ON_HOST_MAINTENANCE";

/// Resolve the TTL in hours from the raw `TERMINATE_AFTER_HOURS` value.
///
/// Any integer is taken verbatim, including zero and negative values (which
/// expire on the first cycle with nonzero uptime). Unset or unparsable values,
/// including ones with surrounding whitespace, fall back to
/// [`DEFAULT_TERMINATE_AFTER_HOURS`].
pub fn parse_terminate_after_hours(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.parse::<i64>().ok())
        .unwrap_or(DEFAULT_TERMINATE_AFTER_HOURS)
}

/// Trailing segment of a metadata path.
///
/// `projects/123/zones/us-central1-a` becomes `us-central1-a`. Trailing
/// slashes are ignored; a value without separators is returned as-is.
pub fn short_name(path: &str) -> &str {
    let trimmed = path.trim().trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some((_, last)) => last,
        None => trimmed,
    }
}

/// True strictly after the TTL has elapsed; equality does not fire.
pub fn ttl_exceeded(uptime: Duration, terminate_after: Duration) -> bool {
    uptime > terminate_after
}

/// Remaining time before the TTL, truncated to whole seconds for logging
pub fn time_left(uptime: Duration, terminate_after: Duration) -> Duration {
    Duration::from_secs(terminate_after.saturating_sub(uptime).as_secs())
}

/// Case-sensitive match of the trimmed `instance/preempted` body
pub fn is_preempted_flag(value: &str) -> bool {
    value.trim() == PREEMPTED_FLAG
}

/// Case-sensitive match of the trimmed `instance/maintenance-event` body
pub fn is_terminating_maintenance(value: &str) -> bool {
    value.trim() == TERMINATE_ON_HOST_MAINTENANCE
}
