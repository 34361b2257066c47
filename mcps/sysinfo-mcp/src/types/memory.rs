//! Memory information types

use serde::{Deserialize, Serialize};

/// Memory (RAM and swap) information, sizes in GB
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryInfo {
    #[serde(rename = "totalGB")]
    pub total_gb: f64,
    #[serde(rename = "usedGB")]
    pub used_gb: f64,
    #[serde(rename = "freeGB")]
    pub free_gb: f64,
    #[serde(rename = "availableGB")]
    pub available_gb: f64,
    /// Memory usage percentage (0-100)
    pub usage_percent: f64,
    #[serde(rename = "swapTotalGB")]
    pub swap_total_gb: f64,
    #[serde(rename = "swapUsedGB")]
    pub swap_used_gb: f64,
    /// Swap usage percentage (0-100)
    pub swap_usage_percent: f64,
}
