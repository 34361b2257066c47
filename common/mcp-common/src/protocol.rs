//! MCP protocol types (JSON-RPC 2.0 subset)
//!
//! Only the surface a tool server needs: requests, responses, notifications,
//! tool descriptors and the `tools/call` content envelope.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{RpcError, ToolError};

/// JSON-RPC version string
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol revisions this server can speak, oldest first
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2024-11-05", "2025-03-26", "2025-06-18"];

/// Method names understood by the dispatcher
pub mod methods {
    pub const INITIALIZE: &str = "initialize";
    pub const INITIALIZED: &str = "notifications/initialized";
    pub const CANCELLED: &str = "notifications/cancelled";
    pub const READY: &str = "notifications/ready";
    pub const PING: &str = "ping";
    pub const TOOLS_LIST: &str = "tools/list";
    pub const TOOLS_CALL: &str = "tools/call";
}

// ============================================================================
// Requests
// ============================================================================

/// Caller-supplied request identifier. Opaque: echoed back, never interpreted.
///
/// Numbers keep their original text (serde_json `arbitrary_precision`), so
/// `1.10` or an id past `u64::MAX` is answered with exactly the same token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(serde_json::Number),
    String(String),
}

// Not derived: an untagged derive buffers the value and loses the raw number.
impl<'de> Deserialize<'de> for RequestId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => Ok(RequestId::Number(n)),
            Value::String(s) => Ok(RequestId::String(s)),
            other => Err(de::Error::custom(format!(
                "request id must be a string or a number, got {}",
                other
            ))),
        }
    }
}

impl From<i64> for RequestId {
    fn from(value: i64) -> Self {
        RequestId::Number(value.into())
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        RequestId::String(value.to_string())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{}", n),
            RequestId::String(s) => write!(f, "{:?}", s),
        }
    }
}

/// Incoming JSON-RPC message. A missing `id` makes it a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl Request {
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(id.into()),
            method: method.into(),
            params: Some(params),
        }
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Params of `tools/call`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,
}

/// Params of `initialize`. Only the requested revision matters to us.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    #[serde(default)]
    pub protocol_version: Option<String>,
}

// ============================================================================
// Responses
// ============================================================================

/// Exactly one of `result` or `error`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponsePayload {
    Result(Value),
    Error(RpcError),
}

/// Outgoing JSON-RPC response
///
/// `id` is `null` only when answering a request whose id could not be recovered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: String,
    pub id: Option<RequestId>,
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

impl Response {
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            payload: ResponsePayload::Result(result),
        }
    }

    pub fn error(id: Option<RequestId>, error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            payload: ResponsePayload::Error(error),
        }
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.payload {
            ResponsePayload::Result(value) => Some(value),
            ResponsePayload::Error(_) => None,
        }
    }

    pub fn rpc_error(&self) -> Option<&RpcError> {
        match &self.payload {
            ResponsePayload::Result(_) => None,
            ResponsePayload::Error(err) => Some(err),
        }
    }
}

/// Outgoing JSON-RPC notification (no id, no response expected)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl Notification {
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
        }
    }
}

// ============================================================================
// Tool Types
// ============================================================================

/// Static description of a tool, the unit of a `tools/list` answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// `tools/list` result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListToolsResult {
    pub tools: Vec<ToolDescriptor>,
}

/// One item of a tool result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text { text: String },
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }

    pub fn as_text(&self) -> &str {
        match self {
            Content::Text { text } => text,
        }
    }
}

/// `tools/call` result envelope
///
/// `content[0].text` is always a JSON document encoded as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallToolResult {
    pub content: Vec<Content>,
    #[serde(
        rename = "isError",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub is_error: bool,
}

/// Payload embedded in `content[0].text` when a tool fails
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolErrorPayload {
    pub error: ToolError,
}

// ============================================================================
// Handshake Types
// ============================================================================

/// Identity reported by `initialize` and the readiness notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// `initialize` result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: Value,
    pub server_info: ServerInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Pick the revision to answer `initialize` with
pub fn negotiate_protocol_version(requested: Option<&str>) -> &'static str {
    let latest = SUPPORTED_PROTOCOL_VERSIONS[SUPPORTED_PROTOCOL_VERSIONS.len() - 1];
    requested
        .and_then(|req| SUPPORTED_PROTOCOL_VERSIONS.iter().find(|v| **v == req).copied())
        .unwrap_or(latest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_tools_list_request() {
        let line = r#"{"jsonrpc":"2.0","id":1,"method":"tools/list","params":{}}"#;
        let req: Request = serde_json::from_str(line).unwrap();
        assert_eq!(req.method, "tools/list");
        assert_eq!(req.id, Some(RequestId::from(1)));
        assert!(!req.is_notification());
    }

    #[test]
    fn test_string_and_float_ids_round_trip_verbatim() {
        let req: Request =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":"abc","method":"ping"}"#).unwrap();
        assert_eq!(req.id, Some(RequestId::from("abc")));

        let req: Request =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":2.5,"method":"ping"}"#).unwrap();
        let resp = Response::success(req.id, json!({}));
        let text = serde_json::to_string(&resp).unwrap();
        assert!(text.contains(r#""id":2.5"#));
    }

    #[test]
    fn test_numeric_ids_keep_their_exact_text() {
        for raw in ["18446744073709551616", "1.10", "-0", "1e3", "12345678901234567890123"] {
            let line = format!(r#"{{"jsonrpc":"2.0","id":{},"method":"ping"}}"#, raw);

            // through Value first, the way the framer decodes lines
            let value: Value = serde_json::from_str(&line).unwrap();
            let req: Request = serde_json::from_value(value).unwrap();
            let text = serde_json::to_string(&Response::success(req.id, json!({}))).unwrap();

            assert_eq!(text, format!(r#"{{"jsonrpc":"2.0","id":{},"result":{{}}}}"#, raw));
        }
    }

    #[test]
    fn test_id_must_be_string_or_number() {
        let bad = r#"{"jsonrpc":"2.0","id":{"x":1},"method":"ping"}"#;
        assert!(serde_json::from_str::<Request>(bad).is_err());

        let null_id: Request =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#).unwrap();
        assert!(null_id.is_notification());
    }

    #[test]
    fn test_success_response_wire_shape() {
        let result = CallToolResult {
            content: vec![Content::text(r#"{"cores":8}"#)],
            is_error: false,
        };
        let resp = Response::success(Some(7.into()), serde_json::to_value(&result).unwrap());
        let text = serde_json::to_string(&resp).unwrap();
        assert!(text.starts_with(r#"{"jsonrpc":"2.0","id":7,"result":"#));

        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            json!({
                "jsonrpc": "2.0",
                "id": 7,
                "result": { "content": [{ "type": "text", "text": "{\"cores\":8}" }] }
            })
        );
        assert!(value["result"].get("isError").is_none());
    }

    #[test]
    fn test_error_response_wire_shape() {
        let resp = Response::error(Some(3.into()), RpcError::new(-32601, "Method not found: x"));
        let text = serde_json::to_string(&resp).unwrap();
        assert_eq!(
            text,
            r#"{"jsonrpc":"2.0","id":3,"error":{"code":-32601,"message":"Method not found: x"}}"#
        );
    }

    #[test]
    fn test_tool_error_result_flags_is_error() {
        let result = CallToolResult {
            content: vec![Content::text("{}")],
            is_error: true,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["isError"], true);
    }

    #[test]
    fn test_notification_omits_params_when_absent() {
        let text = serde_json::to_string(&Notification::new(methods::READY, None)).unwrap();
        assert_eq!(text, r#"{"jsonrpc":"2.0","method":"notifications/ready"}"#);
    }

    #[test]
    fn test_negotiate_protocol_version() {
        assert_eq!(negotiate_protocol_version(Some("2024-11-05")), "2024-11-05");
        assert_eq!(negotiate_protocol_version(Some("1999-01-01")), "2025-06-18");
        assert_eq!(negotiate_protocol_version(None), "2025-06-18");
    }
}
