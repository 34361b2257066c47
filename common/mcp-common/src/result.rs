//! Result helpers for tool responses
//!
//! A tool answer is always a [`CallToolResult`] whose first content item holds
//! a JSON document *as a string*. Callers parse `content[0].text` a second
//! time to get the domain payload or the `{"error": {...}}` object. Keep it
//! that way: existing clients depend on the double encoding.

use serde::Serialize;

use crate::error::{ToolError, ToolResult};
use crate::protocol::{CallToolResult, Content, ToolErrorPayload};

/// Wrap serializable domain data as a successful tool result
///
/// ```rust,ignore
/// use mcp_common::json_success;
///
/// let result = json_success(&MemoryInfo { total_gb: 16.0, .. })?;
/// ```
pub fn json_success<T: Serialize>(data: &T) -> ToolResult<CallToolResult> {
    let json = serde_json::to_string_pretty(data)?;
    Ok(CallToolResult {
        content: vec![Content::text(json)],
        is_error: false,
    })
}

/// Wrap a tool failure as `{"error":{"code","message"}}` inside a result
pub fn tool_error_result(error: ToolError) -> CallToolResult {
    let payload = ToolErrorPayload { error };
    // A struct of two strings cannot fail to serialize
    let json = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| {
        format!(
            r#"{{"error":{{"code":"{}","message":"unserializable error"}}}}"#,
            payload.error.code
        )
    });
    CallToolResult {
        content: vec![Content::text(json)],
        is_error: true,
    }
}

/// Fold a collaborator outcome into the envelope
pub fn into_call_result<T: Serialize>(outcome: ToolResult<T>) -> CallToolResult {
    match outcome.and_then(|data| json_success(&data)) {
        Ok(result) => result,
        Err(err) => tool_error_result(err),
    }
}
