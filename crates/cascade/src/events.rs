//! Fire-and-forget status events pushed to the UI backend.
//!
//! Emission must never affect the caller: every failure mode (disabled
//! configuration, missing user id, timeout, non-2xx) is logged and
//! swallowed, and the HTTP POST runs on a detached task.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::Config;

const EMIT_TIMEOUT: Duration = Duration::from_secs(2);

/// Event vocabulary consumed by the UI backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    StepStart,
    StepComplete,
    StepError,
    PipelineComplete,
    PipelineStopped,
    PipelineError,
}

/// Posts progress notifications to the configured event endpoint.
#[derive(Debug, Clone)]
pub struct StatusEmitter {
    client: Client,
    events_url: Option<String>,
    token: Option<String>,
}

impl StatusEmitter {
    pub fn new(events_url: Option<String>, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            events_url,
            token,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.events_url.clone(), config.events_token.clone())
    }

    /// An emitter that drops every event. Used where no sink is configured.
    pub fn disabled() -> Self {
        Self::new(None, None)
    }

    fn enabled(&self) -> bool {
        self.events_url.is_some() && self.token.is_some()
    }

    /// Queue one status event for delivery and return immediately.
    pub fn emit(
        &self,
        user_id: Option<&str>,
        message: &str,
        event_type: EventType,
        extra: Option<Value>,
    ) {
        if !self.enabled() {
            debug!(?event_type, content = message, "status event skipped, sink not configured");
            return;
        }
        let Some(uid) = user_id else {
            debug!(?event_type, content = message, "status event skipped, no user id");
            return;
        };

        let mut body = json!({
            "content": message,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });
        if let Some(Value::Object(extra)) = extra {
            for (key, value) in extra {
                body[key] = value;
            }
        }
        let payload = json!({
            "user_id": uid,
            "event_type": event_type,
            "payload": body,
        });

        let client = self.client.clone();
        let url = self.events_url.clone().unwrap_or_default();
        let token = self.token.clone().unwrap_or_default();

        tokio::spawn(async move {
            let result = client
                .post(&url)
                .header("X-Internal-Token", token)
                .json(&payload)
                .timeout(EMIT_TIMEOUT)
                .send()
                .await;
            match result {
                Ok(response) if !response.status().is_success() => {
                    warn!(status = %response.status(), "status event push failed");
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "status event push failed"),
            }
        });
    }
}
