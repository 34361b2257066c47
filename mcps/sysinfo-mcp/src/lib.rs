//! System Info MCP Library
//!
//! Eighteen system information tools (CPU, memory, OS, disks, network,
//! processes, battery, sensors, connectivity, ...) served over
//! line-delimited JSON-RPC by `mcp-common`.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mcp_common::{Dispatcher, SessionConfig};
//! use sysinfo_mcp::SysInfoMcpServer;
//!
//! let config = SessionConfig::default();
//! let dispatcher = Arc::new(Dispatcher::for_server(&SysInfoMcpServer::new(), &config)?);
//! mcp_common::serve(dispatcher, &config, reader, writer, shutdown).await?;
//! ```
//!
//! # Usage as Binary
//!
//! Run directly: `sysinfo-mcp`
//!
//! Or configure in `.mcp.json`:
//! ```json
//! { "mcpServers": { "sysinfo": { "command": "./sysinfo-mcp" } } }
//! ```

pub mod info;
pub mod params;
pub mod server;
pub mod types;

// Re-export main server type
pub use server::SysInfoMcpServer;

// Re-export parameter types for direct API usage
pub use params::{
    ConnectivityParams, CpuInfoParams, DiskInfoParams, ListProcessesParams, NetworkParams,
    OpenPortsParams, PortProtocol, ProcessInfoParams, ProcessSort,
};
