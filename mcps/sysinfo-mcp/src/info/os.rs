//! OS information collection

use mcp_common::ToolResult;
use sysinfo::System;

use super::platform;
use super::uptime::format_uptime;
use crate::types::OsInfo;

/// Get operating system information
pub fn get_os_info() -> ToolResult<OsInfo> {
    let uptime = System::uptime();
    let unknown = || "unknown".to_string();

    Ok(OsInfo {
        platform: platform().to_string(),
        distro: System::name().unwrap_or_else(|| platform().to_string()),
        release: System::os_version().unwrap_or_else(unknown),
        kernel: System::kernel_version().unwrap_or_else(unknown),
        arch: std::env::consts::ARCH.to_string(),
        hostname: System::host_name().unwrap_or_else(unknown),
        uptime_seconds: uptime,
        uptime_formatted: format_uptime(uptime),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_info_fields_are_filled() {
        let info = get_os_info().unwrap();
        assert_eq!(info.platform, std::env::consts::OS);
        assert!(!info.arch.is_empty());
        assert!(!info.hostname.is_empty());
        assert!(!info.uptime_formatted.is_empty());
    }
}
