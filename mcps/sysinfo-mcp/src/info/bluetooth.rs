//! Bluetooth devices via BlueZ

use mcp_common::ToolResult;

use super::{command, linux_only};
use crate::types::{BluetoothDevice, BluetoothDevices};

/// Devices known to the default controller
pub async fn get_bluetooth_devices() -> ToolResult<BluetoothDevices> {
    if !cfg!(target_os = "linux") {
        return Err(linux_only("Bluetooth device listing"));
    }

    let output = command::run("bluetoothctl", &["devices"]).await?;
    Ok(BluetoothDevices {
        devices: parse_devices(&output),
    })
}

/// Parse `Device AA:BB:CC:DD:EE:FF Some Name` lines
pub fn parse_devices(output: &str) -> Vec<BluetoothDevice> {
    output
        .lines()
        .filter_map(|line| {
            let rest = line.trim().strip_prefix("Device ")?;
            let (address, name) = rest.split_once(' ').unwrap_or((rest, ""));
            is_mac(address).then(|| BluetoothDevice {
                address: address.to_string(),
                name: name.trim().to_string(),
            })
        })
        .collect()
}

fn is_mac(s: &str) -> bool {
    let parts: Vec<&str> = s.split(':').collect();
    parts.len() == 6
        && parts
            .iter()
            .all(|p| p.len() == 2 && p.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_devices() {
        let output = "Device 00:1A:7D:DA:71:13 WH-1000XM4\nDevice F4:5C:89:AB:CD:EF Magic Keyboard\n";
        let devices = parse_devices(output);
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].address, "00:1A:7D:DA:71:13");
        assert_eq!(devices[1].name, "Magic Keyboard");
    }

    #[test]
    fn test_noise_is_skipped() {
        let output = "Waiting to connect to bluetoothd...\nDevice nonsense here\nDevice AA:BB:CC:DD:EE:FF\n";
        let devices = parse_devices(output);
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].name, "");
    }
}
