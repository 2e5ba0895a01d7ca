//! Tool handlers and their results.
//!
//! A handler implements a tool's behaviour. It receives parameters that have
//! already been validated against the tool's definition and produces a
//! [`ToolOutput`]: either a success payload or a structured failure the tool
//! chose to report. Returning `Err` signals that the handler itself faulted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::future::Future;

use super::params::ToolParams;

/// A failure a tool deliberately reports, such as an upstream service error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolFailure {
    /// Short machine-readable kind, e.g. `upstream_status`.
    pub kind: String,

    /// Human-readable message.
    pub message: String,

    /// Extra fields merged into the response body.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub details: Map<String, Value>,
}

impl ToolFailure {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            details: Map::new(),
        }
    }

    /// Attach an extra field to the failure body.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Render as the JSON body returned to callers.
    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        body.insert("error".to_string(), Value::Bool(true));
        body.insert("kind".to_string(), Value::String(self.kind.clone()));
        body.insert("message".to_string(), Value::String(self.message.clone()));
        for (key, value) in &self.details {
            body.entry(key.clone()).or_insert_with(|| value.clone());
        }
        Value::Object(body)
    }
}

/// Output from a tool execution.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// The tool ran and produced a payload.
    Success(Value),

    /// The tool ran and reports a failure.
    Failure(ToolFailure),
}

impl ToolOutput {
    /// Create a successful tool output.
    pub fn success(data: impl Into<Value>) -> Self {
        Self::Success(data.into())
    }

    /// Create a failed tool output.
    pub fn failure(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failure(ToolFailure::new(kind, message))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// JSON body for the caller.
    pub fn into_json(self) -> Value {
        match self {
            Self::Success(data) => data,
            Self::Failure(failure) => failure.to_json(),
        }
    }
}

impl From<ToolFailure> for ToolOutput {
    fn from(failure: ToolFailure) -> Self {
        Self::Failure(failure)
    }
}

/// Trait implemented by every tool's behaviour.
///
/// Handlers are shared across concurrent invocations, so they must not keep
/// per-call state in `self`.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the tool with validated parameters.
    async fn call(&self, params: ToolParams) -> anyhow::Result<ToolOutput>;
}

/// Adapter turning an async closure into a [`ToolHandler`].
pub struct FnHandler<F> {
    f: F,
}

/// Wrap an async closure as a handler.
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(ToolParams) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<ToolOutput>> + Send + 'static,
{
    FnHandler { f }
}

#[async_trait::async_trait]
impl<F, Fut> ToolHandler for FnHandler<F>
where
    F: Fn(ToolParams) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<ToolOutput>> + Send + 'static,
{
    async fn call(&self, params: ToolParams) -> anyhow::Result<ToolOutput> {
        (self.f)(params).await
    }
}
