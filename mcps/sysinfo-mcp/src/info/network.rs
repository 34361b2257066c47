//! Network information collection

use std::net::IpAddr;

use mcp_common::ToolResult;
use sysinfo::Networks;

use crate::types::{NetworkInfo, NetworkInterface};

/// Get network interface information
pub fn get_network_info(interface_filter: Option<&str>) -> ToolResult<NetworkInfo> {
    let networks = Networks::new_with_refreshed_list();

    let mut interfaces: Vec<NetworkInterface> = networks
        .iter()
        .filter(|(name, _)| interface_filter.map_or(true, |f| name.contains(f)))
        .map(|(name, data)| {
            let ips: Vec<IpAddr> = data.ip_networks().iter().map(|ip| ip.addr).collect();

            NetworkInterface {
                name: name.clone(),
                mac: data.mac_address().to_string(),
                ipv4: ips.iter().find(|ip| ip.is_ipv4()).map(ToString::to_string),
                ipv6: ips.iter().find(|ip| ip.is_ipv6()).map(ToString::to_string),
                addresses: ips.iter().map(ToString::to_string).collect(),
                kind: classify_interface(name).to_string(),
                status: interface_status(name, !ips.is_empty()).to_string(),
                received_bytes: data.total_received(),
                transmitted_bytes: data.total_transmitted(),
            }
        })
        .collect();

    interfaces.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(NetworkInfo { interfaces })
}

/// Guess the interface type from its name
pub fn classify_interface(name: &str) -> &'static str {
    const VIRTUAL: &[&str] = &[
        "docker", "veth", "br-", "virbr", "vmnet", "vboxnet", "tun", "tap", "utun", "wg",
        "tailscale", "zt", "awdl", "llw", "bridge",
    ];
    const WIRELESS: &[&str] = &["wl", "wifi", "ath", "ra"];
    const WIRED: &[&str] = &["eth", "en", "em", "eno", "ens", "enp"];

    let lower = name.to_ascii_lowercase();
    if lower == "lo" || lower.starts_with("lo0") || lower.contains("loopback") {
        "loopback"
    } else if VIRTUAL.iter().any(|p| lower.starts_with(p)) {
        "virtual"
    } else if WIRELESS.iter().any(|p| lower.starts_with(p)) || lower.contains("wi-fi") {
        "wireless"
    } else if WIRED.iter().any(|p| lower.starts_with(p)) || lower.contains("ethernet") {
        "wired"
    } else {
        "other"
    }
}

/// Operational state from sysfs, falling back to whether addresses are assigned
fn interface_status(name: &str, has_addresses: bool) -> &'static str {
    let operstate = super::read_value(format!("/sys/class/net/{}/operstate", name));
    status_from(operstate.as_deref(), has_addresses)
}

fn status_from(operstate: Option<&str>, has_addresses: bool) -> &'static str {
    match operstate {
        Some("up") => "up",
        Some("down") | Some("lowerlayerdown") | Some("notpresent") => "down",
        _ if has_addresses => "up",
        _ => "unknown",
    }
}
