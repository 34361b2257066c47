//! Memory information collection

use mcp_common::ToolResult;
use sysinfo::System;

use super::{bytes_to_gb, percent};
use crate::types::MemoryInfo;

/// Get memory (RAM and swap) information
pub fn get_memory_info() -> ToolResult<MemoryInfo> {
    let mut sys = System::new();
    sys.refresh_memory();
    Ok(memory_info(&sys))
}

pub fn memory_info(sys: &System) -> MemoryInfo {
    let total = sys.total_memory();
    let used = sys.used_memory();
    let swap_total = sys.total_swap();
    let swap_used = sys.used_swap();

    MemoryInfo {
        total_gb: bytes_to_gb(total),
        used_gb: bytes_to_gb(used),
        free_gb: bytes_to_gb(sys.free_memory()),
        available_gb: bytes_to_gb(sys.available_memory()),
        usage_percent: percent(used, total),
        swap_total_gb: bytes_to_gb(swap_total),
        swap_used_gb: bytes_to_gb(swap_used),
        swap_usage_percent: percent(swap_used, swap_total),
    }
}
