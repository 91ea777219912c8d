//! MCP JSON-RPC transport over streamable HTTP.
//!
//! Connects per call: initialize, send the initialized notification,
//! then issue the tools/call request. The server may answer with plain
//! JSON or with an SSE-framed body; both are handled here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use super::{RawToolResponse, ToolClientError, ToolTransport};
use crate::config::Config;

const PROTOCOL_VERSION: &str = "2025-03-26";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct McpHttpTransport {
    client: Client,
    server_url: String,
    api_key: Option<String>,
}

impl McpHttpTransport {
    pub fn new(server_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            server_url: server_url.into(),
            api_key,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ToolClientError> {
        if config.mcp_server_url.is_empty() {
            return Err(ToolClientError::NotConfigured(
                "MCP_SERVER_URL is not set".to_string(),
            ));
        }
        Ok(Self::new(
            config.mcp_server_url.clone(),
            config.mcp_api_key.clone(),
        ))
    }

    /// Send one JSON-RPC message. Returns the parsed response body (Null
    /// for accepted notifications) and the session id header, if any.
    async fn rpc(
        &self,
        body: &Value,
        session: Option<&str>,
    ) -> Result<(Value, Option<String>), ToolClientError> {
        let mut request = self
            .client
            .post(&self.server_url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json, text/event-stream")
            .timeout(REQUEST_TIMEOUT)
            .json(body);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }
        if let Some(session) = session {
            request = request.header("Mcp-Session-Id", session.to_string());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ToolClientError::Transport(e.to_string()))?;

        let status = response.status();
        let new_session = response
            .headers()
            .get("mcp-session-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolClientError::Transport(format!(
                "server returned {status}: {body}"
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ToolClientError::Transport(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok((Value::Null, new_session));
        }

        Ok((parse_rpc_body(&text)?, new_session))
    }

    async fn initialize(&self) -> Result<Option<String>, ToolClientError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {},
                "clientInfo": {
                    "name": "cascade",
                    "version": env!("CARGO_PKG_VERSION"),
                },
            },
        });
        let (response, session) = self.rpc(&body, None).await?;
        if let Some(error) = response.get("error") {
            return Err(ToolClientError::Protocol(format!(
                "initialize failed: {error}"
            )));
        }
        debug!(session = ?session, "tool server session initialized");

        let notification = json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized",
        });
        self.rpc(&notification, session.as_deref()).await?;

        Ok(session)
    }
}

#[async_trait]
impl ToolTransport for McpHttpTransport {
    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<RawToolResponse, ToolClientError> {
        let session = self.initialize().await?;

        let body = json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/call",
            "params": {
                "name": name,
                "arguments": arguments,
            },
        });
        let (response, _) = self.rpc(&body, session.as_deref()).await?;

        if let Some(error) = response.get("error") {
            return Err(ToolClientError::Protocol(format!(
                "tools/call failed: {error}"
            )));
        }
        let result = response.get("result").ok_or_else(|| {
            ToolClientError::Protocol("response missing result".to_string())
        })?;

        let structured = result.get("structuredContent").cloned();
        let text = result
            .get("content")
            .and_then(Value::as_array)
            .and_then(|blocks| {
                blocks.iter().find_map(|block| {
                    if block.get("type").and_then(Value::as_str) == Some("text") {
                        block.get("text").and_then(Value::as_str).map(str::to_string)
                    } else {
                        None
                    }
                })
            });
        let is_error = result
            .get("isError")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        Ok(RawToolResponse {
            structured,
            text,
            is_error,
        })
    }
}

/// Parse a response body that is either plain JSON or SSE-framed
/// (`data:` lines). For SSE the last data line carries the response.
fn parse_rpc_body(text: &str) -> Result<Value, ToolClientError> {
    let trimmed = text.trim_start();
    if trimmed.starts_with("event:") || trimmed.starts_with("data:") {
        let payload = text
            .lines()
            .filter_map(|line| line.strip_prefix("data:"))
            .map(str::trim)
            .last()
            .ok_or_else(|| {
                ToolClientError::Protocol("event stream carried no data".to_string())
            })?;
        return serde_json::from_str(payload)
            .map_err(|e| ToolClientError::Protocol(format!("bad event payload: {e}")));
    }
    serde_json::from_str(text)
        .map_err(|e| ToolClientError::Protocol(format!("bad response body: {e}")))
}
