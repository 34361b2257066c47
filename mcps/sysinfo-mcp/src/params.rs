//! Parameter types for System Info MCP tools
//!
//! Every field is optional; unknown keys are ignored.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CpuInfoParams {
    #[schemars(description = "Include per-core frequency and usage")]
    #[serde(default)]
    pub include_per_core: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiskInfoParams {
    #[schemars(description = "Filter results by mount point path (partial match)")]
    #[serde(default)]
    pub mount_point: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct NetworkParams {
    #[schemars(description = "Filter results by interface name (partial match)")]
    #[serde(default)]
    pub interface: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ProcessInfoParams {
    #[schemars(description = "Process ID to inspect (defaults to the server process)")]
    #[serde(default)]
    pub pid: Option<u32>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectivityParams {
    #[schemars(description = "Per-probe timeout in milliseconds (default 1500, max 3000)")]
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// Sort key for `list_processes`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProcessSort {
    #[default]
    Cpu,
    Memory,
    Name,
    Pid,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListProcessesParams {
    #[schemars(description = "Maximum number of processes to return (default 10, max 500)")]
    #[serde(default)]
    pub limit: Option<usize>,

    #[schemars(description = "Sort order: cpu, memory (descending), name or pid (ascending)")]
    #[serde(default)]
    pub sort_by: Option<ProcessSort>,
}

/// Protocol filter for `get_open_ports`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PortProtocol {
    Tcp,
    Udp,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct OpenPortsParams {
    #[schemars(description = "Only report tcp or udp sockets (default: both)")]
    #[serde(default)]
    pub protocol: Option<PortProtocol>,
}
