//! Top-level dispatcher: classify the request, then run exactly one
//! pipeline or operation.

use std::sync::Arc;

use schemas::IntentAction;
use tracing::info;

use crate::config::Config;
use crate::context::RequestContext;
use crate::llm::GenerationClient;
use crate::mcp::ToolClient;
use crate::pipeline::create::CreatePagePipeline;
use crate::pipeline::management::PageOperations;
use crate::prompts::HELP_TEXT;
use crate::router::IntentRouter;

pub struct Assistant {
    router: IntentRouter,
    pipeline: CreatePagePipeline,
    ops: PageOperations,
}

impl Assistant {
    pub fn new(tools: ToolClient, llm: Arc<dyn GenerationClient>, config: &Config) -> Self {
        let router = IntentRouter::new(llm.clone(), config.router_model.clone());
        let pipeline = CreatePagePipeline::new(
            tools.clone(),
            llm,
            config.default_model.clone(),
            config.content_model.clone(),
        );
        let ops = PageOperations::new(tools);
        Self {
            router,
            pipeline,
            ops,
        }
    }

    /// Handle one user turn: classify, dispatch, report. Always returns
    /// a terminating human-readable message, never an error.
    pub async fn handle(&self, ctx: &RequestContext, request: &str) -> String {
        let intent = self.router.classify(request).await;
        info!(action = %intent.action, "dispatching intent");

        let target = intent.target_page_name.as_deref();
        let parent = intent.destination_parent_name.as_deref();

        match intent.action {
            IntentAction::CreatePage => {
                let Some(target) = target else {
                    return missing_target(
                        "I could not tell which waterfall to create a page for",
                        "Create a page for Multnomah Falls in Oregon",
                    );
                };
                self.pipeline.run(ctx, target, parent).await.message
            }
            IntentAction::CreateCategory => {
                let Some(target) = target else {
                    return missing_target(
                        "I could not tell which category to create",
                        "Create a Southern Oregon category",
                    );
                };
                self.ops.create_category(ctx, target, parent).await.render()
            }
            IntentAction::MovePage => {
                let Some(target) = target else {
                    return missing_target(
                        "I could not tell which page to move",
                        "Move Toketee Falls under Highway 138",
                    );
                };
                self.ops.move_page(ctx, target, parent).await.render()
            }
            IntentAction::RenamePage | IntentAction::UpdateMetadata => {
                let Some(target) = target else {
                    return missing_target(
                        "I could not tell which page to rename",
                        "Rename Watson Falls to Watson Falls Trail",
                    );
                };
                let Some(new_title) = intent.content_description.as_deref() else {
                    return missing_target(
                        "I could not tell what the new title should be",
                        "Rename Watson Falls to Watson Falls Trail",
                    );
                };
                self.ops.rename_page(ctx, target, new_title).await.render()
            }
            IntentAction::UpdateContent => {
                let Some(target) = target else {
                    return missing_target(
                        "I could not tell which page to update",
                        "Update the introduction on Watson Falls",
                    );
                };
                let block = intent
                    .content_description
                    .as_deref()
                    .and_then(parse_block_update);
                let Some((block_name, block_content)) = block else {
                    return "ERROR: I need the block and its new content, e.g. \
                            \"cjBlockIntroduction: <p>New intro</p>\"."
                        .to_string();
                };
                self.ops
                    .update_page_content(ctx, target, &block_name, &block_content)
                    .await
                    .render()
            }
            IntentAction::PublishPage => {
                let Some(target) = target else {
                    return missing_target(
                        "I could not tell which page to publish",
                        "Publish Multnomah Falls",
                    );
                };
                self.ops.publish_page(ctx, target).await.render()
            }
            IntentAction::UnpublishPage => {
                let Some(target) = target else {
                    return missing_target(
                        "I could not tell which page to unpublish",
                        "Unpublish Multnomah Falls",
                    );
                };
                self.ops.unpublish_page(ctx, target).await.render()
            }
            IntentAction::AddToNav | IntentAction::RemoveFromNav => {
                let adding = intent.action == IntentAction::AddToNav;
                let Some(target) = target else {
                    return missing_target(
                        "I could not tell which page to place",
                        "Add Multnomah Falls to the main menu",
                    );
                };
                let Some(nav) = intent.nav_location_name.as_deref() else {
                    return missing_target(
                        "I could not tell which navigation location you meant",
                        "Add Multnomah Falls to the main menu",
                    );
                };
                let report = if adding {
                    self.ops.add_to_nav_location(ctx, target, nav).await
                } else {
                    self.ops.remove_from_nav_location(ctx, target, nav).await
                };
                report.render()
            }
            IntentAction::SearchCms => {
                self.ops
                    .search_pages(ctx, intent.search_query.as_deref(), parent, false)
                    .await
                    .render()
            }
            IntentAction::ListPages => self.ops.list_pages(ctx, parent).await.render(),
            IntentAction::GetPage => {
                let Some(target) = target else {
                    return missing_target(
                        "I could not tell which page to show",
                        "Show me the Multnomah Falls page",
                    );
                };
                self.ops.get_page_details(ctx, target).await.render()
            }
            IntentAction::Help => HELP_TEXT.to_string(),
        }
    }
}

fn missing_target(what: &str, example: &str) -> String {
    format!("ERROR: {what}. Try \"{example}\".")
}

/// Split a "blockName: markup" description. The block name must be a
/// single identifier token, so conversational text before a colon is
/// not mistaken for one.
fn parse_block_update(description: &str) -> Option<(String, String)> {
    let (name, content) = description.split_once(':')?;
    let name = name.trim();
    let content = content.trim();
    if name.is_empty() || content.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    Some((name.to_string(), content.to_string()))
}
