//! Request dispatch
//!
//! [`Dispatcher`] turns one decoded [`Request`] into at most one [`Response`]:
//! exactly one for requests, none for notifications. Protocol problems become
//! RPC errors; tool failures, timeouts and panics become tool-error results.
//! Nothing a caller sends can make `dispatch` fail or panic.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::SessionConfig;
use crate::error::{RegistryError, RpcError, ToolError};
use crate::protocol::{
    methods, negotiate_protocol_version, CallToolParams, CallToolResult, InitializeParams,
    InitializeResult, ListToolsResult, Request, Response, ServerInfo, JSONRPC_VERSION,
};
use crate::registry::ToolRegistry;
use crate::result::tool_error_result;

/// A server definition: identity plus the tools it exposes
pub trait ToolServer {
    fn server_info(&self) -> ServerInfo;

    /// Build the tool registry; called once at startup
    fn registry(&self) -> Result<ToolRegistry, RegistryError>;

    fn instructions(&self) -> Option<String> {
        None
    }
}

/// Aborts the wrapped task when dropped, so abandoning a call cancels it
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Routes requests to the tool registry
#[derive(Debug)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    server_info: ServerInfo,
    instructions: Option<String>,
    call_timeout: Duration,
    permits: Arc<Semaphore>,
}

impl Dispatcher {
    pub fn new(registry: ToolRegistry, server_info: ServerInfo) -> Self {
        Self::from_config(registry, server_info, &SessionConfig::default())
    }

    pub fn from_config(
        registry: ToolRegistry,
        server_info: ServerInfo,
        config: &SessionConfig,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            server_info,
            instructions: None,
            call_timeout: config.call_timeout(),
            permits: Arc::new(Semaphore::new(config.max_in_flight.max(1))),
        }
    }

    /// Dispatcher for a [`ToolServer`] under `config`
    pub fn for_server<S: ToolServer>(
        server: &S,
        config: &SessionConfig,
    ) -> Result<Self, RegistryError> {
        let dispatcher = Self::from_config(server.registry()?, server.server_info(), config);
        Ok(match server.instructions() {
            Some(instructions) => dispatcher.with_instructions(instructions),
            None => dispatcher,
        })
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Handle one request; `None` for notifications
    pub async fn dispatch(&self, request: Request) -> Option<Response> {
        if request.jsonrpc != JSONRPC_VERSION {
            return request.id.map(|id| {
                Response::error(
                    Some(id),
                    RpcError::invalid_request(format!(
                        "Unsupported JSON-RPC version: {:?}",
                        request.jsonrpc
                    )),
                )
            });
        }

        if request.is_notification() {
            self.handle_notification(&request);
            return None;
        }

        debug!(id = ?request.id, method = %request.method, "Received request");

        let Request {
            id, method, params, ..
        } = request;

        let outcome = match method.as_str() {
            methods::INITIALIZE => to_result(&self.initialize(params)),
            methods::PING => Ok(json!({})),
            methods::TOOLS_LIST => to_result(&self.list_tools()),
            methods::TOOLS_CALL => match parse_call_params(params) {
                Ok(params) => self
                    .call_tool(params)
                    .await
                    .and_then(|result| to_result(&result)),
                Err(e) => Err(e),
            },
            other => Err(RpcError::method_not_found(other)),
        };

        Some(match outcome {
            Ok(result) => Response::success(id, result),
            Err(err) => {
                debug!(id = ?id, code = err.code, message = %err.message, "Request rejected");
                Response::error(id, err)
            }
        })
    }

    /// The full, order-stable tool list
    pub fn list_tools(&self) -> ListToolsResult {
        ListToolsResult {
            tools: self.registry.descriptors(),
        }
    }

    /// Validate and run one tool call under the call timeout
    pub async fn call_tool(&self, params: CallToolParams) -> Result<CallToolResult, RpcError> {
        let CallToolParams { name, arguments } = params;

        let tool = self
            .registry
            .get(&name)
            .ok_or_else(|| RpcError::unknown_tool(&name))?;

        let arguments = match arguments {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(RpcError::invalid_params(format!(
                    "Invalid arguments for {}: arguments must be an object",
                    name
                )))
            }
        };

        let invocation = tool.handler.invoke(arguments).map_err(|e| {
            RpcError::invalid_params(format!("Invalid arguments for {}: {}", name, e))
        })?;

        let started = Instant::now();
        let deadline = started + self.call_timeout;
        let timeout_ms = self.call_timeout.as_millis();

        let acquire = self.permits.clone().acquire_owned();
        let permit = match tokio::time::timeout_at(deadline, acquire).await {
            Ok(Ok(permit)) => permit,
            Ok(Err(_closed)) => {
                return Ok(tool_error_result(ToolError::internal(
                    "dispatcher is shutting down",
                )))
            }
            Err(_elapsed) => {
                warn!(tool = %name, timeout_ms, "Tool call timed out waiting for a free slot");
                return Ok(tool_error_result(ToolError::timeout(format!(
                    "{} did not start within {} ms",
                    name, timeout_ms
                ))));
            }
        };

        let mut task = AbortOnDrop(tokio::spawn(async move {
            let _permit = permit;
            invocation.await
        }));

        let result = match tokio::time::timeout_at(deadline, &mut task.0).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) if join_err.is_panic() => {
                error!(tool = %name, "Tool collaborator panicked");
                tool_error_result(ToolError::internal(format!("{} failed unexpectedly", name)))
            }
            Ok(Err(_cancelled)) => {
                tool_error_result(ToolError::internal(format!("{} was cancelled", name)))
            }
            Err(_elapsed) => {
                // dropping `task` aborts the collaborator
                warn!(tool = %name, timeout_ms, "Tool call timed out");
                tool_error_result(ToolError::timeout(format!(
                    "{} did not complete within {} ms",
                    name, timeout_ms
                )))
            }
        };

        let elapsed_ms = started.elapsed().as_millis();
        if result.is_error {
            info!(tool = %name, elapsed_ms, "Tool reported an error");
        } else {
            debug!(tool = %name, elapsed_ms, "Tool call completed");
        }

        Ok(result)
    }

    fn initialize(&self, params: Option<Value>) -> InitializeResult {
        let params: InitializeParams = params
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default();
        let version = negotiate_protocol_version(params.protocol_version.as_deref());
        info!(protocol_version = version, "Client initialized session");

        InitializeResult {
            protocol_version: version.to_string(),
            capabilities: json!({ "tools": { "listChanged": false } }),
            server_info: self.server_info.clone(),
            instructions: self.instructions.clone(),
        }
    }

    fn handle_notification(&self, request: &Request) {
        match request.method.as_str() {
            methods::INITIALIZED => info!("Client sent 'initialized' notification"),
            methods::CANCELLED => debug!(params = ?request.params, "Client cancelled a request"),
            other => debug!(method = other, "Ignoring unknown notification"),
        }
    }
}

fn parse_call_params(params: Option<Value>) -> Result<CallToolParams, RpcError> {
    let params = params.unwrap_or(Value::Null);
    if params.get("name").and_then(Value::as_str).is_none() {
        return Err(RpcError::invalid_params("Missing tool name in params"));
    }
    serde_json::from_value(params)
        .map_err(|e| RpcError::invalid_params(format!("Invalid tools/call params: {}", e)))
}

fn to_result<T: Serialize>(value: &T) -> Result<Value, RpcError> {
    serde_json::to_value(value)
        .map_err(|e| RpcError::internal(format!("Failed to serialize result: {}", e)))
}
