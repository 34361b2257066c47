//! Battery information types

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryInfo {
    pub has_battery: bool,
    /// Charge level (0-100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_charging: Option<bool>,
    /// Raw status reported by the OS (e.g., "Discharging", "Full")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Estimated minutes until empty (discharging) or full (charging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_remaining: Option<u64>,
    /// Full-charge capacity relative to design capacity (0-100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_count: Option<u64>,
}
