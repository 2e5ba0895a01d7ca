//! Tool-specific error types.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A single problem found while validating invocation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterIssue {
    /// Name of the offending parameter.
    pub parameter: String,

    /// What is wrong with it.
    pub problem: String,
}

impl ParameterIssue {
    pub fn new(parameter: impl Into<String>, problem: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            problem: problem.into(),
        }
    }

    /// The parameter is required but absent.
    pub fn missing(parameter: impl Into<String>) -> Self {
        Self::new(parameter, "missing required parameter")
    }
}

impl fmt::Display for ParameterIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}': {}", self.parameter, self.problem)
    }
}

/// Errors that can occur during tool registration and dispatch.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool definition is malformed. Raised at registration time.
    #[error("Invalid tool definition: {0}")]
    InvalidDefinition(String),

    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// Invocation parameters failed validation.
    #[error("Invalid parameters: {}", join_issues(.0))]
    Validation(Vec<ParameterIssue>),

    /// The handler faulted while executing.
    #[error("Handler error: {0}")]
    Handler(String),
}

fn join_issues(issues: &[ParameterIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ToolError {
    /// Create a new "invalid definition" error.
    pub fn invalid_definition(msg: impl Into<String>) -> Self {
        Self::InvalidDefinition(msg.into())
    }

    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a validation error with a single issue.
    pub fn validation(parameter: impl Into<String>, problem: impl Into<String>) -> Self {
        Self::Validation(vec![ParameterIssue::new(parameter, problem)])
    }

    /// Create a new "handler" error.
    pub fn handler(msg: impl Into<String>) -> Self {
        Self::Handler(msg.into())
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDefinition(_) => "invalid_definition",
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation_error",
            Self::Handler(_) => "handler_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_every_parameter() {
        let err = ToolError::Validation(vec![
            ParameterIssue::missing("query"),
            ParameterIssue::new("limit", "expected integer"),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("'query': missing required parameter"));
        assert!(msg.contains("'limit': expected integer"));
    }

    #[test]
    fn test_codes() {
        assert_eq!(ToolError::not_found("x").code(), "not_found");
        assert_eq!(ToolError::validation("a", "b").code(), "validation_error");
        assert_eq!(ToolError::handler("boom").code(), "handler_error");
    }
}
