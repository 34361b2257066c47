//! Uptime information collection

use chrono::DateTime;
use mcp_common::ToolResult;
use sysinfo::System;

use crate::types::UptimeInfo;

/// Get system uptime information
pub fn get_uptime() -> ToolResult<UptimeInfo> {
    let uptime_secs = System::uptime();
    let boot_time = System::boot_time();

    Ok(UptimeInfo {
        uptime_seconds: uptime_secs,
        uptime_formatted: format_uptime(uptime_secs),
        boot_time,
        boot_time_iso: format_boot_time(boot_time),
    })
}

/// RFC 3339 in UTC; empty when the timestamp is out of range
pub fn format_boot_time(unix_secs: u64) -> String {
    i64::try_from(unix_secs)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|t| t.to_rfc3339())
        .unwrap_or_default()
}

/// Format uptime seconds into human-readable string
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(plural(days, "day"));
    }
    if hours > 0 {
        parts.push(plural(hours, "hour"));
    }
    if minutes > 0 {
        parts.push(plural(minutes, "minute"));
    }
    if secs > 0 || parts.is_empty() {
        parts.push(plural(secs, "second"));
    }

    parts.join(", ")
}

fn plural(n: u64, unit: &str) -> String {
    format!("{} {}{}", n, unit, if n == 1 { "" } else { "s" })
}
