//! Built-in tools - assembles the registry served at startup.
//!
//! Adding a new tool:
//! 1. Create its handler and definition in `definitions/`
//! 2. Register it in `build_tool_registry()`
//!
//! The HTTP transport never needs to change; it serves whatever is registered.

use std::sync::Arc;

use crate::core::config::Config;
use crate::core::error::Result;

use super::definitions::AddressDetailsTool;
use super::registry::ToolRegistry;

/// Build the registry with every built-in tool.
///
/// Fails on the first tool that cannot be constructed or has an invalid
/// definition.
pub fn build_tool_registry(config: &Config) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();

    registry.register(
        AddressDetailsTool::definition(),
        Arc::new(AddressDetailsTool::new(config.bring.clone())?),
    )?;

    Ok(registry)
}
