//! Open port collection from the Linux socket tables

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::Path;

use mcp_common::{ResultExt, ToolError, ToolErrorCode, ToolResult};
use tracing::debug;

use super::linux_only;
use crate::params::PortProtocol;
use crate::types::{OpenPort, OpenPorts};

const PROC_NET: &str = "/proc/net";

/// `st` column values
const TCP_LISTEN: &str = "0A";
const UDP_UNCONNECTED: &str = "07";

const TABLES: &[(&str, PortProtocol)] = &[
    ("tcp", PortProtocol::Tcp),
    ("tcp6", PortProtocol::Tcp),
    ("udp", PortProtocol::Udp),
    ("udp6", PortProtocol::Udp),
];

/// Listening TCP sockets and bound UDP sockets
pub fn get_open_ports(protocol: Option<PortProtocol>) -> ToolResult<OpenPorts> {
    if !cfg!(target_os = "linux") {
        return Err(linux_only("Open port listing"));
    }

    let mut ports = Vec::new();
    let mut readable = 0;

    for (table, kind) in TABLES
        .iter()
        .filter(|(_, kind)| protocol.map_or(true, |want| want == *kind))
    {
        if let Some(content) = read_table(&Path::new(PROC_NET).join(table))? {
            readable += 1;
            ports.extend(parse_table(table, *kind, &content));
        }
    }

    if readable == 0 {
        return Err(ToolError::not_available(format!(
            "No socket tables readable under {}",
            PROC_NET
        )));
    }

    ports.sort_by(|a, b| a.port.cmp(&b.port).then_with(|| a.protocol.cmp(&b.protocol)));
    Ok(OpenPorts { ports })
}

/// Contents of one socket table; `None` when it cannot be read for any
/// reason other than permissions
fn read_table(path: &Path) -> ToolResult<Option<String>> {
    match std::fs::read_to_string(path).to_tool_err() {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.code == ToolErrorCode::PermissionDenied => Err(ToolError::permission_denied(
            format!("Cannot read {}: {}", path.display(), e.message),
        )),
        Err(e) => {
            debug!("Skipping {}: {}", path.display(), e);
            Ok(None)
        }
    }
}

/// Parse one `/proc/net/{tcp,udp}[6]` table, skipping the header
pub fn parse_table(protocol: &str, kind: PortProtocol, content: &str) -> Vec<OpenPort> {
    content
        .lines()
        .skip(1)
        .filter_map(|line| parse_line(protocol, kind, line))
        .collect()
}

fn parse_line(protocol: &str, kind: PortProtocol, line: &str) -> Option<OpenPort> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let local = fields.get(1)?;
    let state = match (kind, *fields.get(3)?) {
        (PortProtocol::Tcp, TCP_LISTEN) => "LISTEN",
        (PortProtocol::Udp, UDP_UNCONNECTED) => "UNCONN",
        _ => return None,
    };
    let inode = fields.get(9)?.parse().ok()?;

    let (addr_hex, port_hex) = local.split_once(':')?;
    let port = u16::from_str_radix(port_hex, 16).ok()?;
    let address = parse_hex_addr(addr_hex)?;

    Some(OpenPort {
        protocol: protocol.to_string(),
        local_address: address.to_string(),
        port,
        state: state.to_string(),
        inode,
    })
}

/// Decode a kernel socket address: 32-bit words printed in host byte order
pub fn parse_hex_addr(hex: &str) -> Option<IpAddr> {
    if !hex.is_ascii() {
        return None;
    }
    let word = |i: usize| u32::from_str_radix(&hex[i * 8..i * 8 + 8], 16).ok().map(u32::from_be);

    match hex.len() {
        8 => Some(IpAddr::V4(Ipv4Addr::from(word(0)?))),
        32 => {
            let mut octets = [0u8; 16];
            for i in 0..4 {
                octets[i * 4..i * 4 + 4].copy_from_slice(&word(i)?.to_be_bytes());
            }
            Some(IpAddr::V6(Ipv6Addr::from(octets)))
        }
        _ => None,
    }
}

#[cfg(all(test, target_endian = "little"))]
mod tests {
    use super::*;

    const TCP: &str = "  sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode
   0: 0100007F:0CEA 00000000:0000 0A 00000000:00000000 00:00000000 00000000   999        0 40123 1 0000000000000000 100 0 0 10 0
   1: 00000000:0016 00000000:0000 0A 00000000:00000000 00:00000000 00000000     0        0 22011 1 0000000000000000 100 0 0 10 0
   2: 0F02000A:D2B4 5D2B0C8E:01BB 01 00000000:00000000 02:000A1B2C 00000000  1000        0 77777 2 0000000000000000 20 4 30 10 -1";

    const TCP6: &str = "  sl  local_address                         remote_address                        st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode
   0: 00000000000000000000000001000000:0277 00000000000000000000000000000000:0000 0A 00000000:00000000 00:00000000 00000000     0        0 31337 1 0000000000000000 100 0 0 10 0";

    const UDP: &str = "   sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode ref pointer drops
  512: 3500007F:0035 00000000:0000 07 00000000:00000000 00:00000000 00000000   101        0 18544 2 0000000000000000 0";

    #[test]
    fn test_parse_ipv4_addresses() {
        assert_eq!(parse_hex_addr("0100007F"), Some("127.0.0.1".parse().unwrap()));
        assert_eq!(parse_hex_addr("00000000"), Some("0.0.0.0".parse().unwrap()));
        assert_eq!(parse_hex_addr("0F02000A"), Some("10.0.2.15".parse().unwrap()));
        assert_eq!(parse_hex_addr("xyz"), None);
    }

    #[test]
    fn test_parse_ipv6_loopback() {
        assert_eq!(
            parse_hex_addr("00000000000000000000000001000000"),
            Some("::1".parse().unwrap())
        );
    }

    #[test]
    fn test_only_listening_tcp_sockets() {
        let ports = parse_table("tcp", PortProtocol::Tcp, TCP);
        assert_eq!(ports.len(), 2);
        assert_eq!(ports[0].local_address, "127.0.0.1");
        assert_eq!(ports[0].port, 3306);
        assert_eq!(ports[0].inode, 40123);
        assert_eq!(ports[1].port, 22);
        assert!(ports.iter().all(|p| p.state == "LISTEN"));
    }

    #[test]
    fn test_tcp6_and_udp() {
        let ports = parse_table("tcp6", PortProtocol::Tcp, TCP6);
        assert_eq!(ports[0].local_address, "::1");
        assert_eq!(ports[0].port, 631);

        let ports = parse_table("udp", PortProtocol::Udp, UDP);
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].local_address, "127.0.0.53");
        assert_eq!(ports[0].port, 53);
        assert_eq!(ports[0].state, "UNCONN");
    }

    #[test]
    fn test_unreadable_tables_are_skipped() {
        assert_eq!(read_table(Path::new("/definitely/not/proc/net/tcp")), Ok(None));

        // reading a directory fails with an I/O error that is not a permission problem
        assert_eq!(read_table(&std::env::temp_dir()), Ok(None));
    }

    #[test]
    fn test_readable_table() {
        let path = std::env::temp_dir().join(format!("sysinfo-mcp-udp-{}", std::process::id()));
        std::fs::write(&path, UDP).unwrap();
        let content = read_table(&path);
        std::fs::remove_file(&path).ok();

        let content = content.unwrap().unwrap();
        assert_eq!(parse_table("udp", PortProtocol::Udp, &content).len(), 1);
    }

    #[test]
    fn test_garbage_lines_are_skipped() {
        let ports = parse_table("tcp", PortProtocol::Tcp, "header\nnot a socket line\n\n");
        assert!(ports.is_empty());
    }
}
