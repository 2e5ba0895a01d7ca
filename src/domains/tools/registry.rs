//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - Registration of tool definitions with their handlers
//! - Discovery of every registered tool, in registration order
//! - Dispatch: parameter validation followed by a call to the handler
//!
//! The registry is populated at startup and then shared read-only behind an
//! `Arc`, so concurrent invocations need no locking.

use futures::FutureExt;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use super::error::ToolError;
use super::handlers::{ToolHandler, ToolOutput};
use super::params::validate_parameters;
use super::schema::{ToolDefinition, ToolDescriptor};

/// A definition together with the handler that implements it.
struct RegisteredTool {
    definition: ToolDefinition,
    handler: Arc<dyn ToolHandler>,
}

/// Body served by the discovery endpoint.
#[derive(Debug, Serialize)]
pub struct Discovery<'a> {
    pub tools: Vec<ToolDescriptor<'a>>,
}

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// Registering a name that already exists replaces the earlier entry in
/// place, so discovery order stays the order names were first registered.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool.
    ///
    /// Fails with [`ToolError::InvalidDefinition`] if the definition is
    /// malformed; nothing is inserted in that case.
    pub fn register(
        &mut self,
        definition: ToolDefinition,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<(), ToolError> {
        definition.validate()?;

        let name = definition.name.clone();
        let entry = RegisteredTool {
            definition,
            handler,
        };

        match self.index.get(&name) {
            Some(&position) => {
                warn!("Tool '{}' registered twice, replacing previous entry", name);
                self.tools[position] = entry;
            }
            None => {
                info!("Registered tool: {}", name);
                self.index.insert(name, self.tools.len());
                self.tools.push(entry);
            }
        }

        Ok(())
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` if no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Returns `true` if a tool with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Get a tool's definition by name.
    pub fn definition(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&i| &self.tools[i].definition)
    }

    /// All tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools
            .iter()
            .map(|t| t.definition.name.as_str())
            .collect()
    }

    /// List every registered tool as a schema descriptor.
    pub fn discover(&self) -> Discovery<'_> {
        Discovery {
            tools: self
                .tools
                .iter()
                .map(|t| t.definition.descriptor())
                .collect(),
        }
    }

    /// Validate parameters and dispatch to the named tool's handler.
    ///
    /// A structured failure returned by the handler comes back as
    /// `Ok(ToolOutput::Failure(..))`. Handler errors and panics become
    /// [`ToolError::Handler`].
    #[instrument(skip_all, fields(tool = %name))]
    pub async fn invoke(&self, name: &str, raw: Value) -> Result<ToolOutput, ToolError> {
        let tool = match self.index.get(name) {
            Some(&i) => &self.tools[i],
            None => {
                warn!("Unknown tool requested: {}", name);
                return Err(ToolError::not_found(name));
            }
        };

        let params = validate_parameters(&tool.definition, &raw).map_err(|issues| {
            debug!("Rejected parameters: {:?}", issues);
            ToolError::Validation(issues)
        })?;

        let call = tool.handler.call(params);
        match AssertUnwindSafe(call).catch_unwind().await {
            Ok(Ok(output)) => {
                if let ToolOutput::Failure(failure) = &output {
                    info!("Tool reported failure ({}): {}", failure.kind, failure.message);
                }
                Ok(output)
            }
            Ok(Err(e)) => {
                error!("Tool handler failed: {:#}", e);
                Err(ToolError::handler(format!("{:#}", e)))
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!("Tool handler panicked: {}", message);
                Err(ToolError::handler(message))
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
