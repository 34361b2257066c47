//! Error handling for MCP servers
//!
//! Two distinct families of failure exist on the wire:
//!
//! - [`ToolError`]: a tool ran (or tried to) and reports a tagged failure. It is
//!   embedded inside a *successful* JSON-RPC result as
//!   `{"error":{"code":"NOT_AVAILABLE","message":"..."}}`.
//! - [`RpcError`]: the request itself was rejected (malformed, unknown method,
//!   unknown tool, bad arguments). It becomes the `error` member of the response.
//!
//! Transport and framing failures never reach the wire; see [`FrameError`] and
//! [`SessionError`].

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Type alias for collaborator results
pub type ToolResult<T> = Result<T, ToolError>;

// ============================================================================
// Tool Errors
// ============================================================================

/// Failure category reported by a tool collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolErrorCode {
    /// The information source does not exist on this platform or machine
    NotAvailable,
    /// The information source exists but the process may not read it
    PermissionDenied,
    /// The collaborator did not finish within the call timeout
    Timeout,
    /// Arguments were well-typed but semantically unusable
    InvalidArgument,
    /// Anything else, including a panicking collaborator
    Internal,
}

impl ToolErrorCode {
    /// Wire spelling of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolErrorCode::NotAvailable => "NOT_AVAILABLE",
            ToolErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ToolErrorCode::Timeout => "TIMEOUT",
            ToolErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ToolErrorCode::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ToolErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged failure produced by a tool collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct ToolError {
    pub code: ToolErrorCode,
    pub message: String,
}

impl ToolError {
    pub fn new(code: ToolErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_available(message: impl Into<String>) -> Self {
        Self::new(ToolErrorCode::NotAvailable, message)
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ToolErrorCode::PermissionDenied, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ToolErrorCode::Timeout, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ToolErrorCode::InvalidArgument, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ToolErrorCode::Internal, message)
    }
}

impl From<io::Error> for ToolError {
    fn from(err: io::Error) -> Self {
        let code = match err.kind() {
            io::ErrorKind::NotFound => ToolErrorCode::NotAvailable,
            io::ErrorKind::PermissionDenied => ToolErrorCode::PermissionDenied,
            io::ErrorKind::TimedOut => ToolErrorCode::Timeout,
            _ => ToolErrorCode::Internal,
        };
        ToolError::new(code, err.to_string())
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        ToolError::internal(format!("JSON error: {}", err))
    }
}

/// Trait for converting foreign errors into tool errors
///
/// Implement this for collaborator-specific error types to enable
/// [`ResultExt::to_tool_err`].
pub trait IntoToolError {
    fn into_tool_error(self) -> ToolError;
}

impl IntoToolError for io::Error {
    fn into_tool_error(self) -> ToolError {
        self.into()
    }
}

impl IntoToolError for serde_json::Error {
    fn into_tool_error(self) -> ToolError {
        self.into()
    }
}

impl IntoToolError for anyhow::Error {
    fn into_tool_error(self) -> ToolError {
        ToolError::internal(self.to_string())
    }
}

impl IntoToolError for String {
    fn into_tool_error(self) -> ToolError {
        ToolError::internal(self)
    }
}

impl IntoToolError for &str {
    fn into_tool_error(self) -> ToolError {
        ToolError::internal(self.to_string())
    }
}

/// Extension trait for Result types to convert to tool errors
///
/// ```rust,ignore
/// use mcp_common::ResultExt;
///
/// let text = std::fs::read_to_string("/etc/machine-id").to_tool_err()?;
/// ```
pub trait ResultExt<T> {
    fn to_tool_err(self) -> Result<T, ToolError>;
}

impl<T, E: IntoToolError> ResultExt<T> for Result<T, E> {
    fn to_tool_err(self) -> Result<T, ToolError> {
        self.map_err(|e| e.into_tool_error())
    }
}

// ============================================================================
// RPC Errors
// ============================================================================

/// JSON-RPC 2.0 error codes used by the dispatcher
pub mod codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}

/// Protocol-level rejection, serialized as the response `error` member
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("rpc error {code}: {message}")]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(codes::INVALID_REQUEST, message)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(codes::METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    pub fn unknown_tool(name: &str) -> Self {
        Self::new(codes::INVALID_PARAMS, format!("Unknown tool: {}", name))
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(codes::INVALID_PARAMS, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL_ERROR, message)
    }
}

// ============================================================================
// Framing, Registry and Session Errors
// ============================================================================

/// Diagnostic produced by the line framer. Never fatal to the stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// A complete line that is not a JSON-RPC message
    #[error("unparseable line: {reason}")]
    Unparseable { line: String, reason: String },

    /// The pending line grew past the configured limit without a newline
    #[error("line exceeds {limit} bytes, discarding until next newline")]
    LineTooLong { limit: usize },

    /// Unterminated bytes left over when the input closed
    #[error("truncated line at end of input ({len} bytes)")]
    Truncated { len: usize },
}

/// Registry construction error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("duplicate tool name: {0}")]
    DuplicateTool(String),
}

/// Unrecoverable transport failure that ends a session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read from input: {0}")]
    Read(#[source] io::Error),

    #[error("failed to write to output: {0}")]
    Write(#[source] io::Error),
}
