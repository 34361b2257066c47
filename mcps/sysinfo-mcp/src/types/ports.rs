//! Open port types

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenPorts {
    pub ports: Vec<OpenPort>,
}

/// A listening TCP socket or a bound UDP socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPort {
    /// "tcp", "tcp6", "udp" or "udp6"
    pub protocol: String,
    pub local_address: String,
    pub port: u16,
    /// "LISTEN" for TCP, "UNCONN" for UDP
    pub state: String,
    pub inode: u64,
}
