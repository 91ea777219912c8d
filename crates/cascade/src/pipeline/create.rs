//! Page-creation pipeline: duplicate check, research, content
//! generation, CMS write.
//!
//! An explicit state machine with early-exit semantics at every stage.
//! Each run starts at the duplicate check and ends in a terminal state
//! within a single call; there is no resumption. Stage boundaries emit
//! best-effort status events that never affect control flow.

use std::sync::Arc;

use schemars::schema_for;
use schemas::{ResearchResult, WaterfallPageDraft};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::context::RequestContext;
use crate::events::EventType;
use crate::llm::{GenerationClient, GenerationRequest};
use crate::mcp::ToolClient;
use crate::prompts::{CONTENT_INSTRUCTION, RESEARCH_INSTRUCTION};
use crate::resolve::{truncate, NameResolver};

/// Pipeline states. The first four are transitional; the rest are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    CheckingDuplicate,
    Researching,
    WritingContent,
    Creating,
    Done,
    DuplicateStopped,
    ResearchFailed,
    ContentFailed,
    CmsError,
}

/// Terminal result of one pipeline run. The message is the signal
/// string reported to the caller.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub state: PipelineState,
    pub message: String,
}

/// Outcome of one stage: carry the payload forward or halt with a
/// terminal state and its signal string.
enum StageResult<T> {
    Continue(T),
    Stop(PipelineState, String),
}

pub struct CreatePagePipeline {
    tools: ToolClient,
    resolver: NameResolver,
    llm: Arc<dyn GenerationClient>,
    research_model: String,
    content_model: String,
}

impl CreatePagePipeline {
    pub fn new(
        tools: ToolClient,
        llm: Arc<dyn GenerationClient>,
        research_model: impl Into<String>,
        content_model: impl Into<String>,
    ) -> Self {
        let resolver = NameResolver::new(tools.clone());
        Self {
            tools,
            resolver,
            llm,
            research_model: research_model.into(),
            content_model: content_model.into(),
        }
    }

    /// Run the full pipeline for one creation request.
    pub async fn run(
        &self,
        ctx: &RequestContext,
        waterfall_name: &str,
        parent_name: Option<&str>,
    ) -> PipelineOutcome {
        info!(waterfall = waterfall_name, "starting create pipeline");

        let research = match self.check_duplicate(ctx, waterfall_name).await {
            StageResult::Continue(()) => match self.research(ctx, waterfall_name).await {
                StageResult::Continue(research) => research,
                StageResult::Stop(state, message) => {
                    return PipelineOutcome { state, message }
                }
            },
            StageResult::Stop(state, message) => return PipelineOutcome { state, message },
        };

        let draft = match self.write_content(ctx, waterfall_name, &research).await {
            StageResult::Continue(draft) => draft,
            StageResult::Stop(state, message) => return PipelineOutcome { state, message },
        };

        match self.create_in_cms(ctx, &draft, parent_name).await {
            StageResult::Continue(message) => PipelineOutcome {
                state: PipelineState::Done,
                message,
            },
            StageResult::Stop(state, message) => PipelineOutcome { state, message },
        }
    }

    /// Stage 1: stop if a page with this exact title already exists.
    /// Creating a second page for a documented subject wastes the
    /// expensive research and content stages and duplicates live
    /// content.
    async fn check_duplicate(
        &self,
        ctx: &RequestContext,
        waterfall_name: &str,
    ) -> StageResult<()> {
        ctx.emit("Checking for existing pages...", EventType::StepStart);

        if let Some(existing) = self.resolver.find_page_exact(waterfall_name).await {
            let message = format!(
                "DUPLICATE_FOUND: '{}' already exists (ID: {})",
                existing.title, existing.id
            );
            ctx.emit(&message, EventType::PipelineStopped);
            return StageResult::Stop(PipelineState::DuplicateStopped, message);
        }

        ctx.emit("No duplicate found", EventType::StepComplete);
        StageResult::Continue(())
    }

    /// Stage 2: research the subject. Verification is a hard gate, not
    /// a soft signal; unverifiable subjects never reach content
    /// generation.
    async fn research(
        &self,
        ctx: &RequestContext,
        waterfall_name: &str,
    ) -> StageResult<ResearchResult> {
        ctx.emit(
            &format!("Researching {waterfall_name}..."),
            EventType::StepStart,
        );

        let request = GenerationRequest {
            model: self.research_model.clone(),
            system_instruction: RESEARCH_INSTRUCTION.to_string(),
            user_content: format!(
                "Research the waterfall called {waterfall_name}. Find GPS coordinates, \
                 trail distance, elevation gain, difficulty, and notable features."
            ),
            response_schema: serde_json::to_value(schema_for!(ResearchResult)).ok(),
        };

        let text = match self.llm.generate(request).await {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "research call failed");
                let message =
                    format!("RESEARCH_FAILED: Error researching {waterfall_name}: {e}");
                ctx.emit(&message, EventType::PipelineError);
                return StageResult::Stop(PipelineState::ResearchFailed, message);
            }
        };

        let research: ResearchResult = match serde_json::from_str(&text) {
            Ok(research) => research,
            Err(e) => {
                warn!(error = %e, "research response did not parse");
                let message = format!(
                    "RESEARCH_FAILED: Research returned invalid format. Expected JSON but got: {}...",
                    truncate(&text, 200)
                );
                ctx.emit(&message, EventType::PipelineError);
                return StageResult::Stop(PipelineState::ResearchFailed, message);
            }
        };

        if !research.verified {
            let notes = research.verification_notes.as_deref().unwrap_or("");
            let message = format!(
                "RESEARCH_FAILED: Could not verify '{waterfall_name}' exists. {notes}"
            );
            ctx.emit(&message, EventType::PipelineStopped);
            return StageResult::Stop(PipelineState::ResearchFailed, message);
        }

        ctx.emit("Research complete", EventType::StepComplete);
        StageResult::Continue(research)
    }

    /// Stage 3: turn the research dossier into a page draft in the
    /// site's voice. The draft must validate against the template's
    /// recognized block names.
    async fn write_content(
        &self,
        ctx: &RequestContext,
        waterfall_name: &str,
        research: &ResearchResult,
    ) -> StageResult<WaterfallPageDraft> {
        ctx.emit("Writing engaging content...", EventType::StepStart);

        let research_json =
            serde_json::to_string_pretty(research).unwrap_or_else(|_| "{}".to_string());
        let request = GenerationRequest {
            model: self.content_model.clone(),
            system_instruction: CONTENT_INSTRUCTION.to_string(),
            user_content: format!(
                "Create content for {waterfall_name} using this research:\n\n{research_json}"
            ),
            response_schema: serde_json::to_value(schema_for!(WaterfallPageDraft)).ok(),
        };

        let text = match self.llm.generate(request).await {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "content call failed");
                let message = format!("CONTENT_FAILED: Error generating content: {e}");
                ctx.emit(&message, EventType::PipelineError);
                return StageResult::Stop(PipelineState::ContentFailed, message);
            }
        };

        let draft: WaterfallPageDraft = match serde_json::from_str(&text) {
            Ok(draft) => draft,
            Err(e) => {
                warn!(error = %e, "content response did not parse");
                let message = format!("CONTENT_FAILED: Invalid content format: {e}");
                ctx.emit(&message, EventType::PipelineError);
                return StageResult::Stop(PipelineState::ContentFailed, message);
            }
        };

        if let Err(reason) = draft.validate() {
            warn!(reason, "content draft failed validation");
            let message = format!("CONTENT_FAILED: Draft failed validation: {reason}");
            ctx.emit(&message, EventType::PipelineError);
            return StageResult::Stop(PipelineState::ContentFailed, message);
        }

        ctx.emit("Content ready", EventType::StepComplete);
        StageResult::Continue(draft)
    }

    /// Stage 4: resolve or create the parent category, then create the
    /// page as a draft.
    async fn create_in_cms(
        &self,
        ctx: &RequestContext,
        draft: &WaterfallPageDraft,
        parent_name: Option<&str>,
    ) -> StageResult<String> {
        ctx.emit("Creating page in CMS...", EventType::StepStart);

        let parent_id = self.find_or_create_parent(ctx, parent_name).await;

        let created = match self
            .tools
            .call("create_waterfall_page", draft.to_create_args(parent_id))
            .await
        {
            Ok(value) => value.into_json().unwrap_or(Value::Null),
            Err(e) => {
                error!(error = %e, "page creation failed");
                let message = format!("CMS_ERROR: Failed to create page: {e}");
                ctx.emit(&message, EventType::PipelineError);
                return StageResult::Stop(PipelineState::CmsError, message);
            }
        };

        let Some(page_id) = created.get("id").and_then(Value::as_i64) else {
            let message = format!(
                "CMS_ERROR: Page creation returned no id: {}",
                truncate(&created.to_string(), 200)
            );
            ctx.emit(&message, EventType::PipelineError);
            return StageResult::Stop(PipelineState::CmsError, message);
        };
        let page_title = created
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or(&draft.title);

        let parent_info = match parent_name {
            Some(parent) => format!("under '{parent}'"),
            None => "at root level".to_string(),
        };
        let message = format!(
            "SUCCESS: Created '{page_title}' (ID: {page_id}) as draft {parent_info}. \
             Included {} content blocks.",
            draft.blocks.len()
        );
        ctx.emit(&message, EventType::PipelineComplete);
        info!(page_id, "create pipeline finished");
        StageResult::Continue(message)
    }

    /// Strict category lookup, creating the category when absent.
    /// Resolution or creation failures land the page at root rather
    /// than aborting the run this late in the pipeline.
    async fn find_or_create_parent(
        &self,
        ctx: &RequestContext,
        parent_name: Option<&str>,
    ) -> Option<i64> {
        let parent_name = parent_name?;
        let normalized = schemas::normalize_title(parent_name);

        if let Some(existing) = self.resolver.find_category(&normalized).await {
            info!(parent = %existing.title, id = existing.id, "found existing parent");
            return Some(existing.id);
        }

        ctx.emit(
            &format!("Creating category page '{normalized}'..."),
            EventType::StepStart,
        );
        let category = schemas::Category::new(&normalized);
        match self
            .tools
            .call("create_category_page", category.to_create_args())
            .await
        {
            Ok(value) => {
                let id = value
                    .as_json()
                    .and_then(|v| v.get("id"))
                    .and_then(Value::as_i64);
                match id {
                    Some(id) => {
                        info!(parent = %normalized, id, "created parent category");
                        ctx.emit(
                            &format!("Created '{normalized}' (ID: {id})"),
                            EventType::StepComplete,
                        );
                        Some(id)
                    }
                    None => {
                        warn!(parent = %normalized, "category creation returned no id");
                        ctx.emit(
                            &format!("Failed to create parent page '{normalized}'"),
                            EventType::StepError,
                        );
                        None
                    }
                }
            }
            Err(e) => {
                warn!(parent = %normalized, error = %e, "category creation failed");
                ctx.emit(
                    &format!("Failed to create parent page '{normalized}'"),
                    EventType::StepError,
                );
                None
            }
        }
    }
}
