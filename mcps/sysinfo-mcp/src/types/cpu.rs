//! CPU information types

use serde::{Deserialize, Serialize};

/// CPU hardware information with a usage sample
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuInfo {
    /// CPU brand/model name
    pub brand: String,
    /// CPU vendor ID (e.g., "GenuineIntel")
    pub vendor: String,
    /// Number of logical CPU cores (including hyperthreading)
    pub cores: usize,
    /// Number of physical CPU cores, when the OS reports it
    pub physical_cores: Option<usize>,
    /// Clock speed in GHz
    pub speed: f64,
    /// Global CPU usage percentage (0-100)
    pub usage: f64,
    /// Per-core information (if requested)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_core: Option<Vec<CpuCore>>,
}

/// Individual CPU core information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuCore {
    /// Core name/identifier
    pub name: String,
    /// Core frequency in MHz
    pub frequency_mhz: u64,
    /// Core usage percentage (0-100)
    pub usage: f64,
}
