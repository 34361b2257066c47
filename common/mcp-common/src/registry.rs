//! Tool registry
//!
//! Maps tool names to a descriptor (name, description, JSON schema of the
//! arguments) and a handler. Built once at startup, read-only afterwards, and
//! shared between concurrent calls without locking.
//!
//! Handlers are usually plain async functions over a typed parameter struct:
//!
//! ```rust,ignore
//! let registry = ToolRegistry::builder()
//!     .tool("get_uptime", "Get system uptime", |_: NoParams| async {
//!         Ok(info::uptime::get_uptime())
//!     })
//!     .build()?;
//! ```
//!
//! The parameter struct doubles as the argument schema (via `schemars`) and as
//! the argument validator (via `serde`): a call whose arguments do not
//! deserialize is rejected before the handler runs.

use std::collections::HashMap;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{RegistryError, ToolResult};
use crate::protocol::{CallToolResult, ToolDescriptor};
use crate::result::into_call_result;

/// A validated, ready-to-run tool invocation
pub type ToolFuture = Pin<Box<dyn Future<Output = CallToolResult> + Send + 'static>>;

/// Handler behind a registered tool
pub trait ToolHandler: Send + Sync {
    /// Check `arguments` and build the invocation
    ///
    /// `Err` carries a human-readable validation failure; the dispatcher
    /// reports it as an invalid-params RPC error without running anything.
    fn invoke(&self, arguments: Map<String, Value>) -> Result<ToolFuture, String>;
}

/// Parameter type for tools that take no arguments
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct NoParams {}

/// Adapter from `Fn(P) -> impl Future<Output = ToolResult<T>>` to [`ToolHandler`]
struct TypedTool<P, F> {
    f: F,
    _params: PhantomData<fn() -> P>,
}

impl<P, F, Fut, T> ToolHandler for TypedTool<P, F>
where
    P: DeserializeOwned + Send + 'static,
    F: Fn(P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ToolResult<T>> + Send + 'static,
    T: Serialize + Send + 'static,
{
    fn invoke(&self, arguments: Map<String, Value>) -> Result<ToolFuture, String> {
        let params: P =
            serde_json::from_value(Value::Object(arguments)).map_err(|e| e.to_string())?;
        let fut = (self.f)(params);
        Ok(Box::pin(async move { into_call_result(fut.await) }))
    }
}

/// A registry entry
#[derive(Clone)]
pub struct RegisteredTool {
    pub descriptor: ToolDescriptor,
    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for RegisteredTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredTool")
            .field("name", &self.descriptor.name)
            .finish_non_exhaustive()
    }
}

/// Immutable name → tool mapping with stable listing order
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// Descriptors in registration order
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor.clone()).collect()
    }

    /// Case-sensitive lookup
    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.descriptor.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Collects tools; duplicate names are rejected at [`build`](Self::build)
#[derive(Default)]
pub struct ToolRegistryBuilder {
    tools: Vec<RegisteredTool>,
}

impl ToolRegistryBuilder {
    /// Register an async function over a typed parameter struct
    pub fn tool<P, F, Fut, T>(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        f: F,
    ) -> Self
    where
        P: DeserializeOwned + JsonSchema + Send + 'static,
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult<T>> + Send + 'static,
        T: Serialize + Send + 'static,
    {
        let descriptor = ToolDescriptor {
            name: name.into(),
            description: description.into(),
            input_schema: input_schema_for::<P>(),
        };
        let handler = TypedTool {
            f,
            _params: PhantomData,
        };
        self.handler(descriptor, Arc::new(handler))
    }

    /// Register a hand-written handler
    pub fn handler(mut self, descriptor: ToolDescriptor, handler: Arc<dyn ToolHandler>) -> Self {
        self.tools.push(RegisteredTool {
            descriptor,
            handler,
        });
        self
    }

    pub fn build(self) -> Result<ToolRegistry, RegistryError> {
        let mut index = HashMap::with_capacity(self.tools.len());
        for (i, tool) in self.tools.iter().enumerate() {
            if index.insert(tool.descriptor.name.clone(), i).is_some() {
                return Err(RegistryError::DuplicateTool(tool.descriptor.name.clone()));
            }
        }
        Ok(ToolRegistry {
            tools: self.tools,
            index,
        })
    }
}

/// JSON schema of `P`, normalized to what MCP clients expect of `inputSchema`
pub fn input_schema_for<P: JsonSchema>() -> Value {
    let schema = schemars::schema_for!(P);
    let mut value = serde_json::to_value(&schema).unwrap_or_else(|_| json!({}));

    if let Value::Object(map) = &mut value {
        map.remove("$schema");
        map.entry("type").or_insert_with(|| json!("object"));
        map.entry("properties").or_insert_with(|| json!({}));
    } else {
        value = json!({ "type": "object", "properties": {} });
    }
    value
}
