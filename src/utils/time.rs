//! Time utilities: epoch-millisecond clocks, shift duration formatting, local timestamps.

use chrono::{Local, TimeZone, Utc};

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Format an elapsed time as `HH:MM:SS`.
///
/// Hours are not wrapped: 100 hours renders as `100:00:00`. Sub-second
/// remainders are truncated and negative inputs clamp to zero.
pub fn format_duration(ms: i64) -> String {
    let total_secs = ms.max(0) / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Render an epoch-millisecond timestamp in the local time zone.
pub fn format_local_timestamp(ms: i64) -> String {
    match Local.timestamp_millis_opt(ms).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => ms.to_string(),
    }
}

/// Short local clock time (`HH:MM`) for roster listings.
pub fn format_local_time(ms: i64) -> String {
    match Local.timestamp_millis_opt(ms).single() {
        Some(dt) => dt.format("%H:%M").to_string(),
        None => "--:--".to_string(),
    }
}
