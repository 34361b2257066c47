//! MCP Server implementation for system information

use mcp_common::{NoParams, RegistryError, ServerInfo, ToolRegistry, ToolServer};

use crate::info::{self, blocking};
use crate::params::{
    ConnectivityParams, CpuInfoParams, DiskInfoParams, ListProcessesParams, NetworkParams,
    OpenPortsParams, ProcessInfoParams,
};

const INSTRUCTIONS: &str = "System Information MCP Server - provides tools for retrieving \
    CPU, memory, OS, disk, network, process, battery, hardware, sensor and connectivity \
    information. Every tool returns a JSON document in content[0].text; unavailable data \
    is reported as {\"error\":{\"code\":\"NOT_AVAILABLE\",...}}.";

/// The main System Info MCP Server
#[derive(Debug, Clone, Default)]
pub struct SysInfoMcpServer;

impl SysInfoMcpServer {
    pub fn new() -> Self {
        Self
    }
}

impl ToolServer for SysInfoMcpServer {
    fn server_info(&self) -> ServerInfo {
        ServerInfo {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn instructions(&self) -> Option<String> {
        Some(INSTRUCTIONS.to_string())
    }

    fn registry(&self) -> Result<ToolRegistry, RegistryError> {
        ToolRegistry::builder()
            .tool(
                "get_cpu_info",
                "Get CPU information including brand, vendor, core counts, speed and current usage",
                |p: CpuInfoParams| info::cpu::get_cpu_info(p.include_per_core.unwrap_or(false)),
            )
            .tool(
                "get_memory_info",
                "Get memory information including total, used, free and available RAM, plus swap usage",
                |_: NoParams| blocking(info::memory::get_memory_info),
            )
            .tool(
                "get_os_info",
                "Get operating system information including platform, distribution, release, kernel, architecture and hostname",
                |_: NoParams| blocking(info::os::get_os_info),
            )
            .tool(
                "get_uptime",
                "Get system uptime in seconds and human-readable format, plus boot time",
                |_: NoParams| blocking(info::uptime::get_uptime),
            )
            .tool(
                "get_disk_info",
                "Get disk partition information including mount points, filesystem types and total/used/available space",
                |p: DiskInfoParams| {
                    blocking(move || info::disk::get_disk_info(p.mount_point.as_deref()))
                },
            )
            .tool(
                "get_network_info",
                "Get network interface information including MAC and IP addresses, type, status and traffic counters",
                |p: NetworkParams| {
                    blocking(move || info::network::get_network_info(p.interface.as_deref()))
                },
            )
            .tool(
                "get_system_identity",
                "Get hostname, current user, machine ID and OS identification",
                |_: NoParams| blocking(info::identity::get_system_identity),
            )
            .tool(
                "get_process_info",
                "Get details of one process (defaults to this server's process)",
                |p: ProcessInfoParams| info::process::get_process_info(p.pid),
            )
            .tool(
                "get_system_load",
                "Get 1, 5 and 15 minute load averages, raw and normalized by CPU count",
                |_: NoParams| blocking(info::load::get_system_load),
            )
            .tool(
                "get_battery_info",
                "Get battery charge, charging state, time remaining, health and cycle count",
                |_: NoParams| blocking(info::battery::get_battery_info),
            )
            .tool(
                "get_hardware_info",
                "Get machine manufacturer, model, board and BIOS identification plus CPU and memory capacity",
                |_: NoParams| blocking(info::hardware::get_hardware_info),
            )
            .tool(
                "get_environment_info",
                "Get shell, home, user, language, terminal and PATH of the server environment",
                |_: NoParams| blocking(info::environment::get_environment_info),
            )
            .tool(
                "check_internet_connectivity",
                "Check internet reachability and DNS resolution with per-target latency",
                |p: ConnectivityParams| {
                    info::connectivity::check_internet_connectivity(p.timeout_ms)
                },
            )
            .tool(
                "get_temperature_info",
                "Get readings from hardware temperature sensors",
                |_: NoParams| blocking(info::temperature::get_temperature_info),
            )
            .tool(
                "list_processes",
                "List running processes sorted by cpu, memory, name or pid",
                |p: ListProcessesParams| {
                    info::process::list_processes(p.limit, p.sort_by.unwrap_or_default())
                },
            )
            .tool(
                "get_open_ports",
                "List listening TCP ports and bound UDP ports",
                |p: OpenPortsParams| blocking(move || info::ports::get_open_ports(p.protocol)),
            )
            .tool(
                "scan_wifi_networks",
                "Scan for visible Wi-Fi networks with signal strength and security",
                |_: NoParams| info::wifi::scan_wifi_networks(),
            )
            .tool(
                "get_bluetooth_devices",
                "List Bluetooth devices known to the system",
                |_: NoParams| info::bluetooth::get_bluetooth_devices(),
            )
            .build()
    }
}
