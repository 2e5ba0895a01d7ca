//! Tool schema types.
//!
//! A [`ToolDefinition`] is the declared shape of a tool: its name, what it
//! does, and the ordered list of parameters it accepts. Definitions are built
//! once at startup and serialized as-is for discovery.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::error::ToolError;

/// The type a parameter value is coerced to before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Integer,
    Number,
    Boolean,
    List,
    Dictionary,
}

impl ParameterType {
    /// Wire name used in discovery and in validation messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::List => "list",
            Self::Dictionary => "dictionary",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single declared parameter of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    pub required: bool,
}

impl ParameterSpec {
    /// A parameter the caller must supply.
    pub fn required(
        name: impl Into<String>,
        param_type: ParameterType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            param_type,
            required: true,
        }
    }

    /// A parameter the caller may omit.
    pub fn optional(
        name: impl Into<String>,
        param_type: ParameterType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            required: false,
            ..Self::required(name, param_type, description)
        }
    }
}

/// Declared shape of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
}

impl ToolDefinition {
    /// Start a definition with no parameters.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    /// Append a parameter, keeping declaration order.
    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Look up a declared parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Relative path the tool is invoked on.
    pub fn endpoint(&self) -> String {
        format!("/tools/{}", self.name)
    }

    /// Check the definition is well-formed.
    ///
    /// Names must be non-empty and parameter names unique.
    pub fn validate(&self) -> Result<(), ToolError> {
        if self.name.trim().is_empty() {
            return Err(ToolError::invalid_definition("tool name must not be empty"));
        }

        let mut seen = HashSet::new();
        for parameter in &self.parameters {
            if parameter.name.trim().is_empty() {
                return Err(ToolError::invalid_definition(format!(
                    "tool '{}' declares a parameter with an empty name",
                    self.name
                )));
            }
            if !seen.insert(parameter.name.as_str()) {
                return Err(ToolError::invalid_definition(format!(
                    "tool '{}' declares parameter '{}' more than once",
                    self.name, parameter.name
                )));
            }
        }

        Ok(())
    }

    /// Schema descriptor served by discovery.
    pub fn descriptor(&self) -> ToolDescriptor<'_> {
        ToolDescriptor {
            name: &self.name,
            description: &self.description,
            parameters: &self.parameters,
            endpoint: self.endpoint(),
            http_method: "POST",
        }
    }
}

/// Discovery view of a [`ToolDefinition`].
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub parameters: &'a [ParameterSpec],
    pub endpoint: String,
    pub http_method: &'static str,
}
