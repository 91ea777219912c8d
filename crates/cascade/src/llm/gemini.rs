//! Gemini generateContent client.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{GenerationClient, GenerationError, GenerationRequest};
use crate::config::Config;

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Self {
        if api_key.is_none() {
            warn!("Gemini client created without API key");
        }
        Self {
            client: Client::new(),
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.gemini_api_key.clone())
    }

    /// Point the client at a different endpoint (local test servers).
    pub fn with_endpoint(api_key: Option<String>, endpoint: impl Into<String>) -> Self {
        let mut client = Self::new(api_key);
        client.endpoint = endpoint.into();
        client
    }

    fn parse_text(json: &Value) -> String {
        json["candidates"]
            .get(0)
            .and_then(|candidate| candidate["content"]["parts"].as_array())
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| GenerationError::Auth("GEMINI_API_KEY not configured".to_string()))?;

        let mut payload = json!({
            "system_instruction": { "parts": [{ "text": request.system_instruction }] },
            "contents": [{ "role": "user", "parts": [{ "text": request.user_content }] }],
        });
        if let Some(schema) = &request.response_schema {
            payload["generationConfig"] = json!({
                "responseMimeType": "application/json",
                "responseSchema": schema,
            });
        }

        let url = format!("{}/models/{}:generateContent", self.endpoint, request.model);
        debug!(model = %request.model, "calling generation service");

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key.as_str())])
            .json(&payload)
            .send()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 {
                return Err(GenerationError::RateLimited);
            }
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| GenerationError::Parse(e.to_string()))?;

        let text = Self::parse_text(&json);
        if text.is_empty() {
            return Err(GenerationError::Empty);
        }
        Ok(text)
    }
}
