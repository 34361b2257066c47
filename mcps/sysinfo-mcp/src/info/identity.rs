//! System identity collection

use mcp_common::ToolResult;
use sysinfo::System;

use super::{platform, read_value};
use crate::types::SystemIdentity;

const MACHINE_ID_PATHS: &[&str] = &["/etc/machine-id", "/var/lib/dbus/machine-id"];

/// Hostname, user and machine identifiers
pub fn get_system_identity() -> ToolResult<SystemIdentity> {
    let unknown = || "unknown".to_string();

    Ok(SystemIdentity {
        hostname: System::host_name().unwrap_or_else(unknown),
        username: username(|key| std::env::var(key).ok()).unwrap_or_else(unknown),
        machine_id: MACHINE_ID_PATHS.iter().find_map(|p| read_value(p)),
        platform: platform().to_string(),
        arch: std::env::consts::ARCH.to_string(),
        os_name: System::name().unwrap_or_else(unknown),
        os_version: System::long_os_version()
            .or_else(System::os_version)
            .unwrap_or_else(unknown),
    })
}

fn username(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .filter_map(|key| lookup(key))
        .find(|v| !v.is_empty())
}
