//! Process information types

use serde::{Deserialize, Serialize};

/// Detailed information about one process
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInfo {
    pub pid: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_pid: Option<u32>,
    pub name: String,
    /// Executable path, when readable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exe: Option<String>,
    /// Working directory, when readable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    /// Scheduler state (e.g., "Run", "Sleep")
    pub status: String,
    /// CPU usage percentage (can exceed 100 on multi-core systems)
    pub cpu: f64,
    pub memory_bytes: u64,
    /// Share of total physical memory (0-100)
    pub memory_percent: f64,
    /// Unix timestamp of process start
    pub start_time: u64,
    pub run_time_seconds: u64,
}

/// Result of `list_processes`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessList {
    /// Number of processes on the system before the limit is applied
    pub total: usize,
    pub processes: Vec<ProcessSummary>,
}

/// One row of `list_processes`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSummary {
    pub pid: u32,
    pub name: String,
    pub cpu: f64,
    pub memory_percent: f64,
    pub memory_bytes: u64,
}
