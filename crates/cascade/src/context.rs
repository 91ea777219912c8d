//! Request-scoped caller identity.
//!
//! One `RequestContext` is built per user turn and threaded through the
//! dispatcher into every pipeline stage, so deeply nested code can emit
//! status events without each function accepting an identity parameter.
//! Contexts are never shared between concurrent requests.

use serde_json::Value;

use crate::events::{EventType, StatusEmitter};

#[derive(Debug, Clone)]
pub struct RequestContext {
    user_id: Option<String>,
    emitter: StatusEmitter,
}

impl RequestContext {
    pub fn new(user_id: Option<String>, emitter: StatusEmitter) -> Self {
        Self { user_id, emitter }
    }

    /// A context with no caller identity; status events are dropped.
    pub fn anonymous(emitter: StatusEmitter) -> Self {
        Self::new(None, emitter)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Emit a best-effort status event for this request.
    pub fn emit(&self, message: &str, event_type: EventType) {
        self.emitter
            .emit(self.user_id.as_deref(), message, event_type, None);
    }

    /// Emit a status event carrying extra structured data.
    pub fn emit_with(&self, message: &str, event_type: EventType, extra: Value) {
        self.emitter
            .emit(self.user_id.as_deref(), message, event_type, Some(extra));
    }
}
