//! MCP Common - Shared protocol core for MCP servers
//!
//! A small, hand-rolled implementation of MCP over line-delimited JSON-RPC 2.0
//! on stdio:
//!
//! - **Framing**: [`LineFramer`] splits a chunked byte stream into lines
//! - **Encoding**: one compact JSON object per line, written by a single task
//! - **Registry**: [`ToolRegistry`] maps tool names to typed async handlers
//! - **Dispatch**: [`Dispatcher`] routes requests, enforces call timeouts
//! - **Session**: [`serve`] runs the read loop, readiness and shutdown
//! - **Initialization**: `serve_stdio!` macro for standardized server startup
//!
//! # Example
//!
//! ```rust,ignore
//! use mcp_common::{NoParams, ServerInfo, ToolRegistry, ToolServer, RegistryError};
//!
//! struct MyServer;
//!
//! impl ToolServer for MyServer {
//!     fn server_info(&self) -> ServerInfo {
//!         ServerInfo { name: "my-mcp".into(), version: "0.1.0".into() }
//!     }
//!
//!     fn registry(&self) -> Result<ToolRegistry, RegistryError> {
//!         ToolRegistry::builder()
//!             .tool("get_answer", "The answer", |_: NoParams| async { Ok(42) })
//!             .build()
//!     }
//! }
//!
//! // In main.rs
//! mcp_common::serve_stdio!(MyServer, "my_mcp", "MY_MCP");
//! ```

pub mod config;
pub mod dispatch;
pub mod encoder;
pub mod error;
pub mod framer;
pub mod init;
pub mod protocol;
pub mod registry;
pub mod result;
pub mod session;

// Re-export commonly used items at crate root
pub use config::SessionConfig;
pub use dispatch::{Dispatcher, ToolServer};
pub use encoder::{encode_line, spawn_writer, Outbound, ResponseSink};
pub use error::{
    FrameError, IntoToolError, RegistryError, ResultExt, RpcError, SessionError, ToolError,
    ToolErrorCode, ToolResult,
};
pub use framer::{decode_line, Decoded, LineFramer};
pub use init::{init_tracing, shutdown_signal};
pub use protocol::{
    CallToolParams, CallToolResult, Content, ListToolsResult, Notification, Request, RequestId,
    Response, ServerInfo, ToolDescriptor,
};
pub use registry::{NoParams, ToolHandler, ToolRegistry};
pub use result::{into_call_result, json_success, tool_error_result};
pub use session::{serve, SessionSummary};
