//! Tool server facade.
//!
//! [`ToolServer`] ties the configuration to the tool registry and is what the
//! transport holds as shared state. It is cheap to clone; the registry is
//! built once and shared read-only between requests.

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::config::Config;
use super::error::Result;
use crate::domains::tools::{
    Discovery, ToolDefinition, ToolError, ToolOutput, ToolRegistry, build_tool_registry,
};

/// Key of the optional envelope around invocation parameters.
const PARAMETERS_ENVELOPE: &str = "parameters";

/// The tools server.
#[derive(Clone)]
pub struct ToolServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Registry of every tool this server exposes.
    registry: Arc<ToolRegistry>,
}

impl ToolServer {
    /// Create a server around an already populated registry.
    pub fn new(config: Config, registry: ToolRegistry) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
        }
    }

    /// Create a server exposing the built-in tools.
    pub fn with_builtin_tools(config: Config) -> Result<Self> {
        let registry = build_tool_registry(&config)?;
        Ok(Self::new(config, registry))
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the tool registry.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// List every registered tool.
    pub fn discovery(&self) -> Discovery<'_> {
        self.registry.discover()
    }

    /// Invoke a tool with a raw JSON request body.
    ///
    /// The body is either the parameter object itself or an envelope
    /// `{"parameters": {...}}`.
    pub async fn invoke(&self, name: &str, body: Value) -> std::result::Result<ToolOutput, ToolError> {
        let raw = unwrap_envelope(self.registry.definition(name), body);
        self.registry.invoke(name, raw).await
    }
}

/// Strip a `{"parameters": {...}}` envelope.
///
/// Left alone when the tool itself declares a parameter named `parameters`.
fn unwrap_envelope(definition: Option<&ToolDefinition>, body: Value) -> Value {
    let declares_parameters =
        definition.is_some_and(|d| d.parameter(PARAMETERS_ENVELOPE).is_some());

    match body {
        Value::Object(mut map)
            if !declares_parameters
                && map.len() == 1
                && map.get(PARAMETERS_ENVELOPE).is_some_and(Value::is_object) =>
        {
            debug!("Unwrapping parameters envelope");
            map.remove(PARAMETERS_ENVELOPE).unwrap_or_default()
        }
        other => other,
    }
}
