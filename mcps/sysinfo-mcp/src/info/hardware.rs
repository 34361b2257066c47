//! Hardware information collection

use std::path::Path;

use mcp_common::ToolResult;
use sysinfo::System;

use super::{bytes_to_gb, read_value};
use crate::types::HardwareInfo;

const DMI_DIR: &str = "/sys/class/dmi/id";

/// Values firmware vendors leave in unset DMI fields
const DMI_PLACEHOLDERS: &[&str] = &[
    "To Be Filled By O.E.M.",
    "To be filled by O.E.M.",
    "Default string",
    "Not Specified",
    "System Product Name",
    "System manufacturer",
    "None",
];

pub fn get_hardware_info() -> ToolResult<HardwareInfo> {
    let mut sys = System::new();
    sys.refresh_cpu_all();
    sys.refresh_memory();

    let dmi = |name: &str| clean_dmi(read_value(Path::new(DMI_DIR).join(name)));

    let cpu_brand = sys
        .cpus()
        .first()
        .map(|c| c.brand().trim().to_string())
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());

    Ok(HardwareInfo {
        manufacturer: dmi("sys_vendor"),
        model: dmi("product_name"),
        board_vendor: dmi("board_vendor"),
        board_name: dmi("board_name"),
        bios_vendor: dmi("bios_vendor"),
        bios_version: dmi("bios_version"),
        cpu_brand,
        cpu_cores: sys.cpus().len(),
        total_memory_gb: bytes_to_gb(sys.total_memory()),
    })
}

pub fn clean_dmi(value: Option<String>) -> Option<String> {
    value.filter(|v| !DMI_PLACEHOLDERS.iter().any(|p| v.eq_ignore_ascii_case(p)))
}
