//! Disk information types

use serde::{Deserialize, Serialize};

/// Disk information containing all partitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskInfo {
    /// List of disk partitions
    pub disks: Vec<Partition>,
}

/// Individual disk partition information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partition {
    /// Disk/partition name
    pub name: String,
    /// Mount point path
    pub mount: String,
    /// Filesystem type (e.g., "ext4", "ntfs", "apfs")
    pub fs_type: String,
    #[serde(rename = "sizeGB")]
    pub size_gb: f64,
    #[serde(rename = "usedGB")]
    pub used_gb: f64,
    #[serde(rename = "availableGB")]
    pub available_gb: f64,
    /// Usage percentage (0-100)
    pub usage_percent: f64,
    /// Whether the disk is removable
    pub removable: bool,
}
