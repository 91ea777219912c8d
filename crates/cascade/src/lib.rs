//! # Cascade - conversational CMS assistant
//!
//! Classifies natural-language requests into intents, then dispatches
//! them to deterministic multi-step workflows that research, write, and
//! publish waterfall pages through the remote CMS tool server. The CMS
//! is the system of record; nothing is persisted here.

pub mod config;
pub mod context;
pub mod dispatch;
pub mod events;
pub mod llm;
pub mod mcp;
pub mod pipeline;
pub mod prompts;
pub mod resolve;
pub mod router;

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
mod dispatch_tests;

pub use config::{Config, ConfigError};
pub use context::RequestContext;
pub use dispatch::Assistant;
pub use events::{EventType, StatusEmitter};
pub use llm::{GenerationClient, GenerationError, GenerationRequest};
pub use mcp::{RawToolResponse, ToolClient, ToolClientError, ToolTransport, ToolValue};
pub use pipeline::create::{CreatePagePipeline, PipelineOutcome, PipelineState};
pub use pipeline::management::{OpReport, PageOperations, StatusKind};
pub use router::IntentRouter;
