//! Environment-backed configuration for the assistant.

use std::env;

/// Configuration loading/validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required configuration: {}", .0.join(", "))]
    Missing(Vec<String>),
}

const FALLBACK_MODEL: &str = "gemini-2.0-flash";

/// Assistant configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the CMS tool server.
    pub mcp_server_url: String,
    /// Bearer token for the CMS tool server.
    pub mcp_api_key: Option<String>,
    /// API key for the generation service.
    pub gemini_api_key: Option<String>,
    /// Endpoint of the status-event sink. Events are disabled when unset.
    pub events_url: Option<String>,
    /// Internal token sent with status events.
    pub events_token: Option<String>,
    /// Fast model used for intent classification.
    pub router_model: String,
    /// Model used for content generation.
    pub content_model: String,
    /// Model used everywhere else (research).
    pub default_model: String,
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if
    /// one is present.
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();

        Self {
            mcp_server_url: env::var("MCP_SERVER_URL").unwrap_or_default(),
            mcp_api_key: env::var("MCP_API_KEY").ok(),
            gemini_api_key: env::var("GEMINI_API_KEY").ok(),
            events_url: env::var("EVENTS_URL").ok(),
            events_token: env::var("EVENTS_TOKEN").ok(),
            router_model: env::var("ROUTER_MODEL")
                .unwrap_or_else(|_| FALLBACK_MODEL.to_string()),
            content_model: env::var("CONTENT_MODEL")
                .unwrap_or_else(|_| FALLBACK_MODEL.to_string()),
            default_model: env::var("DEFAULT_MODEL")
                .unwrap_or_else(|_| FALLBACK_MODEL.to_string()),
        }
    }

    /// Check that every required variable is present, collecting all
    /// missing names into one error instead of failing on the first.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();

        if self.mcp_server_url.is_empty() {
            missing.push("MCP_SERVER_URL".to_string());
        }
        if self.gemini_api_key.is_none() {
            missing.push("GEMINI_API_KEY".to_string());
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Missing(missing))
        }
    }

    /// Status events require both an endpoint and a token.
    pub fn events_enabled(&self) -> bool {
        self.events_url.is_some() && self.events_token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            mcp_server_url: "https://cms.example.com/mcp".to_string(),
            mcp_api_key: Some("key".to_string()),
            gemini_api_key: Some("key".to_string()),
            events_url: Some("https://rails.example.com/events".to_string()),
            events_token: Some("token".to_string()),
            router_model: FALLBACK_MODEL.to_string(),
            content_model: FALLBACK_MODEL.to_string(),
            default_model: FALLBACK_MODEL.to_string(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validation_collects_all_missing_vars() {
        let config = Config {
            mcp_server_url: String::new(),
            gemini_api_key: None,
            ..valid_config()
        };
        let err = config.validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("MCP_SERVER_URL"));
        assert!(message.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_events_disabled_without_token() {
        let config = Config {
            events_token: None,
            ..valid_config()
        };
        assert!(!config.events_enabled());
        assert!(valid_config().events_enabled());
    }
}
