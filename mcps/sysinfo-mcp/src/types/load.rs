//! System load types

use serde::{Deserialize, Serialize};

/// Load averages over 1, 5 and 15 minutes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemLoad {
    pub load1: f64,
    pub load5: f64,
    pub load15: f64,
    /// Logical CPU count used for normalization
    pub cpu_count: usize,
    /// `load1 / cpu_count`; 1.0 means every core busy
    pub normalized_load1: f64,
    /// False on platforms without load averages (Windows), where all loads are 0
    pub supported: bool,
}
