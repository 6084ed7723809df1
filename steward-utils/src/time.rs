//! Shared time helpers.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Current unix time in whole seconds.
pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}

/// Format a duration as a compact `1d 2h 3m 4s` string.
///
/// Leading zero units are omitted; a sub-minute duration renders as `Ns`.
pub fn format_uptime(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 || !parts.is_empty() {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 || !parts.is_empty() {
        parts.push(format!("{minutes}m"));
    }
    parts.push(format!("{seconds}s"));

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_sub_minute_uptime() {
        assert_eq!(format_uptime(Duration::from_secs(42)), "42s");
    }

    #[test]
    fn formats_full_uptime_with_all_units() {
        let duration = Duration::from_secs(86_400 + 2 * 3_600 + 3 * 60 + 4);
        assert_eq!(format_uptime(duration), "1d 2h 3m 4s");
    }

    #[test]
    fn keeps_zero_middle_units_once_a_larger_unit_is_present() {
        let duration = Duration::from_secs(2 * 86_400 + 5);
        assert_eq!(format_uptime(duration), "2d 0h 0m 5s");
    }
}
