//! Tool abstraction — named operations with JSON parameters.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::context::SessionContext;

/// Errors for broken tool invocations (unknown tool, malformed parameters).
///
/// Value-level validation failures are not errors; those come back as
/// conversational replies in [`ToolOutput`].
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Tool {name} not found")]
    NotFound { name: String },

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

/// Result of a tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Reply text for the runtime to speak back to the user.
    pub content: String,
    /// How long execution took.
    pub duration: Duration,
}

impl ToolOutput {
    pub fn text(content: impl Into<String>, duration: Duration) -> Self {
        Self {
            content: content.into(),
            duration,
        }
    }
}

/// Definition advertised to the runtime for function calling.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// A named operation the external runtime invokes with caller-supplied
/// JSON arguments.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name.
    fn name(&self) -> &str;

    /// Description shown to the runtime's model.
    fn description(&self) -> &str;

    /// JSON schema of the accepted parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given parameters.
    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: &SessionContext,
    ) -> Result<ToolOutput, ToolError>;
}

/// Extract a required string parameter.
pub fn require_str(params: &serde_json::Value, key: &str) -> Result<String, ToolError> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| ToolError::InvalidParameters(format!("missing string parameter `{key}`")))
}

/// Extract a required array-of-strings parameter.
pub fn require_str_array(params: &serde_json::Value, key: &str) -> Result<Vec<String>, ToolError> {
    let items = params
        .get(key)
        .and_then(|v| v.as_array())
        .ok_or_else(|| ToolError::InvalidParameters(format!("missing array parameter `{key}`")))?;
    items
        .iter()
        .map(|v| {
            v.as_str().map(|s| s.to_string()).ok_or_else(|| {
                ToolError::InvalidParameters(format!("`{key}` must contain only strings"))
            })
        })
        .collect()
}
