//! Wi-Fi scanning via NetworkManager

use mcp_common::ToolResult;

use super::{command, linux_only};
use crate::types::{WifiNetwork, WifiScan};

const NMCLI_ARGS: &[&str] = &[
    "-t",
    "-f",
    "IN-USE,SSID,SIGNAL,SECURITY,CHAN",
    "dev",
    "wifi",
    "list",
];

/// Visible networks, strongest first
pub async fn scan_wifi_networks() -> ToolResult<WifiScan> {
    if !cfg!(target_os = "linux") {
        return Err(linux_only("Wi-Fi scanning"));
    }

    let output = command::run("nmcli", NMCLI_ARGS).await?;
    Ok(WifiScan {
        networks: parse_nmcli(&output),
    })
}

pub fn parse_nmcli(output: &str) -> Vec<WifiNetwork> {
    let mut networks: Vec<WifiNetwork> = output
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|line| {
            let fields = split_terse(line);
            if fields.len() < 5 {
                return None;
            }
            let security = fields[3].trim();
            Some(WifiNetwork {
                in_use: fields[0].trim() == "*",
                ssid: fields[1].clone(),
                signal: fields[2].trim().parse().unwrap_or(0),
                security: if security == "--" { String::new() } else { security.to_string() },
                channel: fields[4].trim().parse().ok(),
            })
        })
        .collect();

    networks.sort_by(|a, b| b.signal.cmp(&a.signal).then_with(|| a.ssid.cmp(&b.ssid)));
    networks
}

/// Split an `nmcli -t` line on `:`, honouring `\:` and `\\` escapes
pub fn split_terse(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            ':' => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_terse_escapes() {
        assert_eq!(split_terse("a:b:c"), vec!["a", "b", "c"]);
        assert_eq!(split_terse(r"my\:net:70"), vec!["my:net", "70"]);
        assert_eq!(split_terse(r"back\\slash:"), vec![r"back\slash", ""]);
    }

    #[test]
    fn test_parse_nmcli_output() {
        let output = "*:HomeNet:72:WPA2:36\n :Cafe\\: Free:40:--:6\n :Neighbour:88:WPA1 WPA2:11\n\n";
        let networks = parse_nmcli(output);

        assert_eq!(networks.len(), 3);
        assert_eq!(networks[0].ssid, "Neighbour");
        assert_eq!(networks[0].signal, 88);

        let home = networks.iter().find(|n| n.ssid == "HomeNet").unwrap();
        assert!(home.in_use);
        assert_eq!(home.channel, Some(36));

        let cafe = networks.iter().find(|n| n.ssid == "Cafe: Free").unwrap();
        assert!(!cafe.in_use);
        assert_eq!(cafe.security, "");
    }

    #[test]
    fn test_short_lines_are_ignored() {
        assert!(parse_nmcli("Error: NetworkManager is not running.").is_empty());
    }
}
