//! Intent classification with a fast model.
//!
//! Classification never raises: any transport or parse failure degrades
//! to a HELP intent carrying the failure description, so the dispatcher
//! always has something to act on.

use std::sync::Arc;

use schemars::schema_for;
use schemas::Intent;
use tracing::{debug, warn};

use crate::llm::{GenerationClient, GenerationRequest};
use crate::prompts::ROUTER_INSTRUCTION;

pub struct IntentRouter {
    llm: Arc<dyn GenerationClient>,
    model: String,
}

impl IntentRouter {
    pub fn new(llm: Arc<dyn GenerationClient>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// Classify one user request. Stateless; the same input always gets
    /// the same treatment.
    pub async fn classify(&self, user_request: &str) -> Intent {
        let request = GenerationRequest {
            model: self.model.clone(),
            system_instruction: ROUTER_INSTRUCTION.to_string(),
            user_content: user_request.to_string(),
            response_schema: serde_json::to_value(schema_for!(Intent)).ok(),
        };

        let text = match self.llm.generate(request).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "intent classification failed");
                return Intent::help_fallback(format!("Classification error: {e}"));
            }
        };

        match serde_json::from_str::<Intent>(&text) {
            Ok(intent) => {
                debug!(action = %intent.action, reasoning = %intent.reasoning, "classified intent");
                intent
            }
            Err(e) => {
                warn!(error = %e, "classification response did not parse");
                Intent::help_fallback(format!("Could not parse classification response: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::GenerationError;
    use crate::test_support::MockGeneration;
    use schemas::IntentAction;

    #[tokio::test]
    async fn test_classify_parses_intent() {
        let llm = MockGeneration::new();
        llm.enqueue(
            r#"{"reasoning": "user wants a new page", "action": "CREATE_PAGE",
                "target_page_name": "Multnomah Falls", "destination_parent_name": "Oregon"}"#,
        );
        let router = IntentRouter::new(llm.clone(), "gemini-2.0-flash");

        let intent = router.classify("Create a page for Multnomah Falls in Oregon").await;
        assert_eq!(intent.action, IntentAction::CreatePage);
        assert_eq!(intent.target_page_name.as_deref(), Some("Multnomah Falls"));
        assert_eq!(intent.destination_parent_name.as_deref(), Some("Oregon"));

        // classification asks for the intent shape
        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].response_schema.is_some());
        assert_eq!(requests[0].model, "gemini-2.0-flash");
    }

    #[tokio::test]
    async fn test_transport_failure_degrades_to_help() {
        let llm = MockGeneration::new();
        llm.enqueue_error(GenerationError::Request("timed out".to_string()));
        let router = IntentRouter::new(llm, "gemini-2.0-flash");

        let intent = router.classify("Create a page for Watson Falls").await;
        assert_eq!(intent.action, IntentAction::Help);
        assert!(intent.reasoning.contains("timed out"));
    }

    #[tokio::test]
    async fn test_unparseable_response_degrades_to_help() {
        let llm = MockGeneration::new();
        llm.enqueue("Sure! I'd be happy to help you create that page.");
        let router = IntentRouter::new(llm, "gemini-2.0-flash");

        let intent = router.classify("Create a page").await;
        assert_eq!(intent.action, IntentAction::Help);
    }
}
