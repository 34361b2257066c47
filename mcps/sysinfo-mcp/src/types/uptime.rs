//! Uptime information types

use serde::{Deserialize, Serialize};

/// System uptime information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UptimeInfo {
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// Human-readable uptime (e.g., "2 days, 5 hours, 30 minutes")
    pub uptime_formatted: String,
    /// Unix timestamp of system boot time
    pub boot_time: u64,
    /// Boot time as RFC 3339
    pub boot_time_iso: String,
}
