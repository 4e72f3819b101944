//! Tool trait and result types.

use std::time::Duration;

use async_trait::async_trait;

use crate::context::ToolContext;

/// Errors a tool reports back to the calling agent.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

/// Output of a successful tool call.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub result: serde_json::Value,
    pub duration: Duration,
}

impl ToolOutput {
    pub fn success(result: serde_json::Value, duration: Duration) -> Self {
        Self { result, duration }
    }
}

/// A capability an agent can call with JSON parameters.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the accepted parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, ToolError>;
}

/// Fetch a required, non-empty string parameter.
pub fn require_str<'a>(params: &'a serde_json::Value, key: &str) -> Result<&'a str, ToolError> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ToolError::InvalidParameters(format!("missing '{key}' parameter")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_str_present() {
        let params = serde_json::json!({"keywords": "dentist"});
        assert_eq!(require_str(&params, "keywords").unwrap(), "dentist");
    }

    #[test]
    fn require_str_missing_or_blank() {
        let params = serde_json::json!({"keywords": "  ", "n": 3});
        assert!(matches!(
            require_str(&params, "keywords"),
            Err(ToolError::InvalidParameters(_))
        ));
        assert!(require_str(&params, "n").is_err());
        assert!(require_str(&params, "absent").is_err());
    }
}
