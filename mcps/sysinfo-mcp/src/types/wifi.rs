//! Wi-Fi scan types

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WifiScan {
    pub networks: Vec<WifiNetwork>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WifiNetwork {
    pub ssid: String,
    /// Signal strength (0-100)
    pub signal: u8,
    /// Security protocols (e.g., "WPA2"), empty for open networks
    pub security: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<u32>,
    /// Currently connected network
    pub in_use: bool,
}
