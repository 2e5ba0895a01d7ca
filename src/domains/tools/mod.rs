//! Tools domain module.
//!
//! Tools are named, independently invocable units of functionality with a
//! declared parameter schema. Clients discover them and invoke them by name.
//!
//! ## Architecture
//!
//! - `schema.rs` - Tool and parameter definitions
//! - `params.rs` - Validation and coercion of raw parameters
//! - `handlers.rs` - Handler trait and invocation results
//! - `registry.rs` - Central tool registry and dispatch
//! - `builtin.rs` - Registry assembled at startup
//! - `definitions/` - Individual tool implementations
//! - `error.rs` - Tool-specific error types

pub mod builtin;
pub mod definitions;
mod error;
mod handlers;
mod params;
mod registry;
mod schema;

pub use builtin::build_tool_registry;
pub use error::{ParameterIssue, ToolError};
pub use handlers::{FnHandler, ToolFailure, ToolHandler, ToolOutput, handler_fn};
pub use params::{ParamValue, ToolParams, validate_parameters};
pub use registry::{Discovery, ToolRegistry};
pub use schema::{ParameterSpec, ParameterType, ToolDefinition, ToolDescriptor};
