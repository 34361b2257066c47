//! System Info MCP Server
//!
//! System information tools over line-delimited JSON-RPC on stdio.
//! Logs go to stderr; see `SYSINFO_MCP_*` variables for tuning.
//!
//! # Usage
//!
//! Run directly: `sysinfo-mcp`
//!
//! Or configure in `.mcp.json`:
//! ```json
//! { "mcpServers": { "sysinfo": { "command": "./sysinfo-mcp" } } }
//! ```

use sysinfo_mcp::SysInfoMcpServer;

mcp_common::serve_stdio!(SysInfoMcpServer, "sysinfo_mcp", "SYSINFO_MCP");
