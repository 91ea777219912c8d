//! Shared mocks for the tool transport and the generation service.
//!
//! Both record every call so tests can assert call counts per
//! operation, and both pop canned responses in FIFO order.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::llm::{GenerationClient, GenerationError, GenerationRequest};
use crate::mcp::{RawToolResponse, ToolClientError, ToolTransport};

/// Tool transport fed from per-tool response queues.
pub(crate) struct MockTransport {
    responses: Mutex<HashMap<String, VecDeque<Result<RawToolResponse, String>>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Queue a structured response for one invocation of `tool`.
    pub fn stub(&self, tool: &str, value: Value) {
        self.responses
            .lock()
            .unwrap()
            .entry(tool.to_string())
            .or_default()
            .push_back(Ok(RawToolResponse {
                structured: Some(value),
                text: None,
                is_error: false,
            }));
    }

    /// Queue a text-only response.
    pub fn stub_text(&self, tool: &str, text: &str) {
        self.responses
            .lock()
            .unwrap()
            .entry(tool.to_string())
            .or_default()
            .push_back(Ok(RawToolResponse {
                structured: None,
                text: Some(text.to_string()),
                is_error: false,
            }));
    }

    /// Queue a transport failure.
    pub fn stub_failure(&self, tool: &str, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .entry(tool.to_string())
            .or_default()
            .push_back(Err(message.to_string()));
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, tool: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == tool)
            .count()
    }

    /// Arguments of the only call made to `tool`. Panics when the tool
    /// was called zero or multiple times.
    pub fn single_call_args(&self, tool: &str) -> Value {
        let calls = self.calls.lock().unwrap();
        let matching: Vec<_> = calls
            .iter()
            .filter(|(name, _)| name == tool)
            .map(|(_, args)| args.clone())
            .collect();
        assert_eq!(matching.len(), 1, "expected exactly one call to {tool}");
        matching.into_iter().next().unwrap()
    }
}

#[async_trait]
impl ToolTransport for MockTransport {
    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<RawToolResponse, ToolClientError> {
        self.calls
            .lock()
            .unwrap()
            .push((name.to_string(), arguments));
        let response = self
            .responses
            .lock()
            .unwrap()
            .get_mut(name)
            .and_then(VecDeque::pop_front);
        match response {
            Some(Ok(raw)) => Ok(raw),
            Some(Err(message)) => Err(ToolClientError::Transport(message)),
            None => panic!("no stubbed response for tool '{name}'"),
        }
    }
}

/// Generation client fed from one global FIFO queue: classification,
/// research, and content calls pop in the order the code makes them.
pub(crate) struct MockGeneration {
    responses: Mutex<VecDeque<Result<String, GenerationError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockGeneration {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn enqueue(&self, text: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(text.into()));
    }

    pub fn enqueue_json(&self, value: &impl serde::Serialize) {
        self.enqueue(serde_json::to_string(value).unwrap());
    }

    pub fn enqueue_error(&self, error: GenerationError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationClient for MockGeneration {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no queued generation response"))
    }
}
