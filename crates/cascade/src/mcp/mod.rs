//! Remote tool client for the CMS tool server.
//!
//! `ToolTransport` is the wire seam; `ToolClient` normalizes the
//! transport's polymorphic result shapes once so downstream code always
//! consumes a single [`ToolValue`]. No retries and no business logic
//! live here.

pub mod http;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

pub use http::McpHttpTransport;

#[derive(Debug, thiserror::Error)]
pub enum ToolClientError {
    #[error("tool server not configured: {0}")]
    NotConfigured(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("tool '{tool}' reported an error: {message}")]
    Tool { tool: String, message: String },
}

/// Raw result of one tool invocation, before normalization. The server
/// may return structured content, text content, or both.
#[derive(Debug, Clone, Default)]
pub struct RawToolResponse {
    pub structured: Option<Value>,
    pub text: Option<String>,
    pub is_error: bool,
}

/// Wire-level access to the tool server.
#[async_trait]
pub trait ToolTransport: Send + Sync {
    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<RawToolResponse, ToolClientError>;
}

/// Normalized tool result: structured JSON when the server provides it
/// (or its text parses as JSON), raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolValue {
    Structured(Value),
    Text(String),
}

impl ToolValue {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ToolValue::Structured(value) => Some(value),
            ToolValue::Text(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            ToolValue::Structured(value) => Some(value),
            ToolValue::Text(_) => None,
        }
    }
}

/// The single chokepoint every remote query and mutation flows through.
#[derive(Clone)]
pub struct ToolClient {
    transport: Arc<dyn ToolTransport>,
}

impl ToolClient {
    pub fn new(transport: Arc<dyn ToolTransport>) -> Self {
        Self { transport }
    }

    /// Invoke a named tool and normalize its result.
    ///
    /// Structured content wins when present (unwrapping the server's
    /// single-key `{"result": ...}` envelope); otherwise text content is
    /// parsed as JSON, falling back to the raw string.
    pub async fn call(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolValue, ToolClientError> {
        tracing::debug!(tool = name, "calling remote tool");
        let raw = self.transport.call_tool(name, arguments).await?;

        if raw.is_error {
            let message = raw
                .text
                .or_else(|| raw.structured.map(|v| v.to_string()))
                .unwrap_or_else(|| "unknown tool error".to_string());
            return Err(ToolClientError::Tool {
                tool: name.to_string(),
                message,
            });
        }

        if let Some(mut value) = raw.structured {
            if let Value::Object(map) = &value {
                if map.len() == 1 {
                    if let Some(inner) = map.get("result") {
                        value = inner.clone();
                    }
                }
            }
            return Ok(ToolValue::Structured(value));
        }

        match raw.text {
            Some(text) => match serde_json::from_str::<Value>(&text) {
                Ok(value) => Ok(ToolValue::Structured(value)),
                Err(_) => Ok(ToolValue::Text(text)),
            },
            None => Err(ToolClientError::Protocol(format!(
                "tool '{name}' returned no content"
            ))),
        }
    }
}
