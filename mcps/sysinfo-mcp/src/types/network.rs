//! Network information types

use serde::{Deserialize, Serialize};

/// Network information containing all interfaces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkInfo {
    /// List of network interfaces
    pub interfaces: Vec<NetworkInterface>,
}

/// Individual network interface information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    /// Interface name (e.g., "eth0", "wlan0", "en0")
    pub name: String,
    /// MAC address
    pub mac: String,
    /// First IPv4 address, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<String>,
    /// First IPv6 address, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<String>,
    /// Every address assigned to this interface
    pub addresses: Vec<String>,
    /// "loopback", "wireless", "wired" or "virtual"
    #[serde(rename = "type")]
    pub kind: String,
    /// Operational state ("up", "down" or "unknown")
    pub status: String,
    /// Total bytes received since boot
    pub received_bytes: u64,
    /// Total bytes transmitted since boot
    pub transmitted_bytes: u64,
}
