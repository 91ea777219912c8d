//! Generation service boundary.
//!
//! One request shape for every generation call the assistant makes:
//! classification, research, and content. Structured output is asked
//! for by attaching a JSON Schema to the request.

pub mod gemini;

use async_trait::async_trait;
use serde_json::Value;

pub use gemini::GeminiClient;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited")]
    RateLimited,

    #[error("response parse error: {0}")]
    Parse(String),

    #[error("empty response from generation service")]
    Empty,
}

/// One generation call: a fixed instruction, the user-side content, and
/// an optional response shape the service must conform to.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: String,
    pub system_instruction: String,
    pub user_content: String,
    pub response_schema: Option<Value>,
}

/// A service that turns a prompt into text (or schema-conformant JSON
/// text). Implemented by the production Gemini client and by test mocks.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}
