//! OS information types

use serde::{Deserialize, Serialize};

/// Operating system information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsInfo {
    /// Platform family (e.g., "linux", "macos", "windows")
    pub platform: String,
    /// Distribution or product name (e.g., "Ubuntu", "Darwin")
    pub distro: String,
    /// OS release/version
    pub release: String,
    /// Kernel version
    pub kernel: String,
    /// CPU architecture (e.g., "x86_64", "aarch64")
    pub arch: String,
    pub hostname: String,
    pub uptime_seconds: u64,
    /// Human-readable uptime (e.g., "2 days, 5 hours, 30 minutes")
    pub uptime_formatted: String,
}
