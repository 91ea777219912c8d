//! Page-management operations: short resolve-then-mutate-then-report
//! sequences over the tool client.
//!
//! Every operation returns an [`OpReport`] so the dispatch layer can
//! branch on the outcome kind without parsing prose. Idempotent no-ops
//! (already published, already named, category exists) report as Info,
//! distinct from both Success and Error.

use once_cell::sync::Lazy;
use regex::Regex;
use schemas::{Category, ContentBlock, NavLocation, PageDetail, PageMetadataUpdate, PageSummary};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::context::RequestContext;
use crate::events::EventType;
use crate::mcp::{ToolClient, ToolClientError, ToolValue};
use crate::resolve::NameResolver;

const BLOCK_PREVIEW_LEN: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Info,
    Error,
}

impl StatusKind {
    fn prefix(&self) -> &'static str {
        match self {
            StatusKind::Success => "SUCCESS",
            StatusKind::Info => "INFO",
            StatusKind::Error => "ERROR",
        }
    }
}

/// Uniform operation result: outcome kind, human-readable message, and
/// optional structured data for callers that want more than prose.
#[derive(Debug, Clone)]
pub struct OpReport {
    pub kind: StatusKind,
    pub message: String,
    pub data: Option<Value>,
}

impl OpReport {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            message: message.into(),
            data: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            message: message.into(),
            data: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// The prefixed status string the conversational layer shows.
    pub fn render(&self) -> String {
        format!("{}: {}", self.kind.prefix(), self.message)
    }
}

impl std::fmt::Display for OpReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

pub struct PageOperations {
    tools: ToolClient,
    resolver: NameResolver,
}

impl PageOperations {
    pub fn new(tools: ToolClient) -> Self {
        let resolver = NameResolver::new(tools.clone());
        Self { tools, resolver }
    }

    /// Move a page under a new parent category, or to root when no
    /// parent is given. The parent must already exist as a category.
    pub async fn move_page(
        &self,
        ctx: &RequestContext,
        page_name: &str,
        new_parent_name: Option<&str>,
    ) -> OpReport {
        info!(page = page_name, parent = ?new_parent_name, "moving page");
        ctx.emit(&format!("Finding '{page_name}'..."), EventType::StepStart);

        let Some(page) = self.resolver.find_page(page_name).await else {
            return OpReport::error(format!("Could not find page '{page_name}'"));
        };

        let mut new_parent_id = None;
        if let Some(parent_name) = new_parent_name {
            let Some(parent) = self.resolver.find_category(parent_name).await else {
                return OpReport::error(format!(
                    "Category '{parent_name}' does not exist. Create it first, \
                     then move the page."
                ));
            };
            new_parent_id = Some(parent.id);
        }

        ctx.emit("Moving page...", EventType::StepStart);
        let result = self
            .tools
            .call(
                "move_page",
                json!({ "page_id": page.id, "new_parent_id": new_parent_id }),
            )
            .await;
        match result {
            Ok(_) => {
                let dest = match new_parent_name {
                    Some(parent) => format!("under '{parent}'"),
                    None => "to root level".to_string(),
                };
                let report = OpReport::success(format!("Moved '{}' {dest}", page.title));
                ctx.emit(&report.render(), EventType::PipelineComplete);
                report
            }
            Err(e) => self.remote_failure(ctx, "move page", e),
        }
    }

    /// Rename a page, touching only its title. A case-insensitive
    /// no-op when the page already carries the requested title.
    pub async fn rename_page(
        &self,
        ctx: &RequestContext,
        page_name: &str,
        new_title: &str,
    ) -> OpReport {
        info!(page = page_name, new_title, "renaming page");
        ctx.emit(&format!("Finding '{page_name}'..."), EventType::StepStart);

        let Some(page) = self.resolver.find_page(page_name).await else {
            return OpReport::error(format!("Could not find page '{page_name}'"));
        };

        if page.title.eq_ignore_ascii_case(new_title) {
            return OpReport::info(format!("'{}' is already named '{new_title}'", page.title));
        }

        let update = PageMetadataUpdate {
            title: Some(new_title.to_string()),
            ..Default::default()
        };
        let result = self
            .tools
            .call("update_page_metadata", update.to_update_args(page.id))
            .await;
        match result {
            Ok(_) => {
                let report = OpReport::success(format!(
                    "Renamed '{}' to '{new_title}'",
                    page.title
                ));
                ctx.emit(&report.render(), EventType::PipelineComplete);
                report
            }
            Err(e) => self.remote_failure(ctx, "rename page", e),
        }
    }

    pub async fn publish_page(&self, ctx: &RequestContext, page_name: &str) -> OpReport {
        self.set_published(ctx, page_name, true).await
    }

    pub async fn unpublish_page(&self, ctx: &RequestContext, page_name: &str) -> OpReport {
        self.set_published(ctx, page_name, false).await
    }

    /// Toggle a page's published state. Already being in the target
    /// state is informational, and no remote mutation happens.
    async fn set_published(
        &self,
        ctx: &RequestContext,
        page_name: &str,
        publish: bool,
    ) -> OpReport {
        let action = if publish { "Publishing" } else { "Unpublishing" };
        info!(page = page_name, publish, "toggling publish state");
        ctx.emit(&format!("Finding '{page_name}'..."), EventType::StepStart);

        let Some(page) = self.resolver.find_page(page_name).await else {
            return OpReport::error(format!("Could not find page '{page_name}'"));
        };

        let state = if publish { "published" } else { "draft" };
        if page.published == publish {
            return OpReport::info(format!("'{}' is already {state}", page.title));
        }

        ctx.emit(&format!("{action}..."), EventType::StepStart);
        let tool = if publish { "publish_page" } else { "unpublish_page" };
        match self.tools.call(tool, json!({ "page_id": page.id })).await {
            Ok(_) => {
                let report =
                    OpReport::success(format!("'{}' is now {state}", page.title));
                ctx.emit(&report.render(), EventType::PipelineComplete);
                report
            }
            Err(e) => self.remote_failure(ctx, tool, e),
        }
    }

    /// Replace one content block by name. This is an upsert keyed on
    /// the block name, never an append; callers wanting to append must
    /// fetch and concatenate first.
    pub async fn update_page_content(
        &self,
        ctx: &RequestContext,
        page_name: &str,
        block_name: &str,
        block_content: &str,
    ) -> OpReport {
        info!(page = page_name, block = block_name, "updating content block");

        if block_name.trim().is_empty() {
            return OpReport::error(
                "A block name is required, e.g. \"cjBlockIntroduction: <p>...</p>\"",
            );
        }
        if block_content.trim().is_empty() {
            return OpReport::error(format!(
                "No content given for block '{block_name}'"
            ));
        }

        ctx.emit(&format!("Finding '{page_name}'..."), EventType::StepStart);
        let Some(page) = self.resolver.find_page(page_name).await else {
            return OpReport::error(format!("Could not find page '{page_name}'"));
        };

        let block = ContentBlock {
            name: block_name.trim().to_string(),
            content: block_content.trim().to_string(),
        };

        ctx.emit("Updating content blocks...", EventType::StepStart);
        let result = self
            .tools
            .call(
                "update_page_content",
                json!({ "page_id": page.id, "blocks": [block] }),
            )
            .await;
        match result {
            Ok(_) => {
                let report = OpReport::success(format!(
                    "Updated block '{}' on '{}'",
                    block_name.trim(),
                    page.title
                ));
                ctx.emit(&report.render(), EventType::PipelineComplete);
                report
            }
            Err(e) => self.remote_failure(ctx, "update content", e),
        }
    }

    /// Create a category page. Idempotent: an exact-match existing
    /// category is reported with its id instead of erroring. A given
    /// parent must already exist.
    pub async fn create_category(
        &self,
        ctx: &RequestContext,
        category_name: &str,
        parent_name: Option<&str>,
    ) -> OpReport {
        let mut category = Category::new(category_name);
        info!(category = %category.title, "creating category");

        if let Some(existing) = self.resolver.find_category(&category.title).await {
            return OpReport::info(format!(
                "Category '{}' already exists (ID: {})",
                existing.title, existing.id
            ))
            .with_data(json!({ "id": existing.id }));
        }

        if let Some(parent_name) = parent_name {
            let Some(parent) = self.resolver.find_category(parent_name).await else {
                return OpReport::error(format!(
                    "Parent category '{parent_name}' does not exist. Create it first."
                ));
            };
            category.parent_id = Some(parent.id);
        }

        ctx.emit(
            &format!("Creating category page '{}'...", category.title),
            EventType::StepStart,
        );
        let result = self
            .tools
            .call("create_category_page", category.to_create_args())
            .await;
        match result {
            Ok(value) => {
                let id = value
                    .as_json()
                    .and_then(|v| v.get("id"))
                    .and_then(Value::as_i64);
                match id {
                    Some(id) => {
                        let report = OpReport::success(format!(
                            "Created category '{}' (ID: {id}) as draft",
                            category.title
                        ))
                        .with_data(json!({ "id": id }));
                        ctx.emit(&report.render(), EventType::PipelineComplete);
                        report
                    }
                    None => OpReport::error(format!(
                        "Category creation for '{}' returned no id",
                        category.title
                    )),
                }
            }
            Err(e) => self.remote_failure(ctx, "create category", e),
        }
    }

    pub async fn add_to_nav_location(
        &self,
        ctx: &RequestContext,
        page_name: &str,
        nav_location_name: &str,
    ) -> OpReport {
        self.change_nav_location(ctx, page_name, nav_location_name, true)
            .await
    }

    pub async fn remove_from_nav_location(
        &self,
        ctx: &RequestContext,
        page_name: &str,
        nav_location_name: &str,
    ) -> OpReport {
        self.change_nav_location(ctx, page_name, nav_location_name, false)
            .await
    }

    async fn change_nav_location(
        &self,
        ctx: &RequestContext,
        page_name: &str,
        nav_location_name: &str,
        add: bool,
    ) -> OpReport {
        info!(page = page_name, nav = nav_location_name, add, "changing nav placement");
        ctx.emit(&format!("Finding '{page_name}'..."), EventType::StepStart);

        let Some(page) = self.resolver.find_page(page_name).await else {
            return OpReport::error(format!("Could not find page '{page_name}'"));
        };

        let locations = match self.list_nav_locations().await {
            Ok(locations) => locations,
            Err(e) => return self.remote_failure(ctx, "list nav locations", e),
        };
        let Some(location) = match_nav_location(&locations, nav_location_name) else {
            let available = locations
                .iter()
                .map(|l| l.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return OpReport::error(format!(
                "No nav location matching '{nav_location_name}'. Available: {available}"
            ));
        };

        let tool = if add {
            "add_page_to_nav_location"
        } else {
            "remove_page_from_nav_location"
        };
        let result = self
            .tools
            .call(
                tool,
                json!({ "page_id": page.id, "nav_location_id": location.id }),
            )
            .await;
        match result {
            Ok(_) => {
                let verb = if add { "Added" } else { "Removed" };
                let preposition = if add { "to" } else { "from" };
                let report = OpReport::success(format!(
                    "{verb} '{}' {preposition} '{}'",
                    page.title, location.name
                ));
                ctx.emit(&report.render(), EventType::PipelineComplete);
                report
            }
            Err(e) => self.remote_failure(ctx, tool, e),
        }
    }

    async fn list_nav_locations(&self) -> Result<Vec<NavLocation>, ToolClientError> {
        let value = self.tools.call("list_nav_locations", json!({})).await?;
        match value {
            ToolValue::Structured(json) => serde_json::from_value(json).map_err(|e| {
                ToolClientError::Protocol(format!("unexpected nav location shape: {e}"))
            }),
            ToolValue::Text(_) => Err(ToolClientError::Protocol(
                "list_nav_locations returned non-JSON text".to_string(),
            )),
        }
    }

    /// Search pages by keyword and/or parent. `parent_name` and
    /// `top_level_only` are mutually exclusive filters.
    pub async fn search_pages(
        &self,
        ctx: &RequestContext,
        query: Option<&str>,
        parent_name: Option<&str>,
        top_level_only: bool,
    ) -> OpReport {
        info!(query = ?query, parent = ?parent_name, top_level_only, "searching pages");

        if parent_name.is_some() && top_level_only {
            return OpReport::error(
                "The parent filter and the top-level filter cannot be combined",
            );
        }

        ctx.emit("Searching...", EventType::StepStart);

        let mut params = json!({});
        let mut filters = Vec::new();
        if let Some(query) = query {
            params["search"] = json!(query);
            filters.push(format!("matching '{query}'"));
        }
        if let Some(parent_name) = parent_name {
            // Read-only filter, so the forgiving page resolver is fine here.
            let Some(parent) = self.resolver.find_page(parent_name).await else {
                return OpReport::error(format!(
                    "Could not find parent page '{parent_name}'"
                ));
            };
            params["parent_id"] = json!(parent.id);
            filters.push(format!("under '{}'", parent.title));
        }
        if top_level_only {
            filters.push("at top level".to_string());
        }
        let filter_desc = if filters.is_empty() {
            String::new()
        } else {
            format!(" {}", filters.join(" "))
        };

        let pages: Vec<PageSummary> = match self.tools.call("list_pages", params).await {
            Ok(ToolValue::Structured(json)) => match serde_json::from_value(json) {
                Ok(pages) => pages,
                Err(e) => {
                    return OpReport::error(format!("Unexpected search result shape: {e}"))
                }
            },
            Ok(ToolValue::Text(_)) => {
                return OpReport::error("Search returned non-JSON text")
            }
            Err(e) => return self.remote_failure(ctx, "search pages", e),
        };

        // The remote list surface has no top-level flag; filter here.
        let pages: Vec<PageSummary> = if top_level_only {
            pages.into_iter().filter(|p| p.parent_id.is_none()).collect()
        } else {
            pages
        };

        if pages.is_empty() {
            return OpReport::info(format!("No pages found{filter_desc}"))
                .with_data(json!([]));
        }

        let mut lines = vec![format!("Found {} page(s){filter_desc}:", pages.len())];
        for page in &pages {
            let status = if page.published { "published" } else { "draft" };
            lines.push(format!("  - {} (ID: {}, {status})", page.title, page.id));
        }
        let data = serde_json::to_value(&pages).unwrap_or(Value::Null);
        let report = OpReport::success(lines.join("\n")).with_data(data);
        ctx.emit(
            &format!("Found {} pages", pages.len()),
            EventType::PipelineComplete,
        );
        report
    }

    /// List pages, optionally under one parent.
    pub async fn list_pages(
        &self,
        ctx: &RequestContext,
        parent_name: Option<&str>,
    ) -> OpReport {
        self.search_pages(ctx, None, parent_name, false).await
    }

    /// Fetch and render full details of one page, with a tag-stripped
    /// preview of each content block.
    pub async fn get_page_details(&self, ctx: &RequestContext, page_name: &str) -> OpReport {
        info!(page = page_name, "getting page details");
        ctx.emit(&format!("Finding '{page_name}'..."), EventType::StepStart);

        let Some(page) = self.resolver.find_page(page_name).await else {
            return OpReport::error(format!("Could not find page '{page_name}'"));
        };

        let detail: PageDetail = match self
            .tools
            .call("get_page", json!({ "page_id": page.id }))
            .await
        {
            Ok(ToolValue::Structured(json)) => match serde_json::from_value(json) {
                Ok(detail) => detail,
                Err(e) => {
                    return OpReport::error(format!("Unexpected page detail shape: {e}"))
                }
            },
            Ok(ToolValue::Text(_)) => {
                return OpReport::error("Page detail returned non-JSON text")
            }
            Err(e) => return self.remote_failure(ctx, "get page", e),
        };

        let mut lines = vec![
            format!("Page: {}", detail.title),
            format!("ID: {}", detail.id),
            format!("Slug: {}", detail.slug.as_deref().unwrap_or("-")),
            format!(
                "Status: {}",
                if detail.published { "Published" } else { "Draft" }
            ),
        ];
        if let Some(difficulty) = &detail.difficulty {
            lines.push(format!("Difficulty: {difficulty}"));
        }
        if let Some(distance) = detail.distance {
            lines.push(format!("Distance: {distance} miles"));
        }
        if let Some(elevation) = detail.elevation_gain {
            lines.push(format!("Elevation: {elevation} ft"));
        }
        if let Some(hike_type) = &detail.hike_type {
            lines.push(format!("Hike type: {hike_type}"));
        }
        if !detail.blocks.is_empty() {
            lines.push(format!("Blocks ({}):", detail.blocks.len()));
            for block in &detail.blocks {
                lines.push(format!(
                    "  - {}: {}",
                    block.name,
                    block_preview(&block.content)
                ));
            }
        }

        let data = serde_json::to_value(&detail).unwrap_or(Value::Null);
        ctx.emit("Details retrieved", EventType::PipelineComplete);
        OpReport::success(lines.join("\n")).with_data(data)
    }

    fn remote_failure(
        &self,
        ctx: &RequestContext,
        operation: &str,
        error: ToolClientError,
    ) -> OpReport {
        warn!(operation, error = %error, "remote operation failed");
        let report = OpReport::error(format!("Failed to {operation}: {error}"));
        ctx.emit(&report.render(), EventType::PipelineError);
        report
    }
}

/// Case-insensitive exact match first, then substring.
fn match_nav_location<'a>(
    locations: &'a [NavLocation],
    name: &str,
) -> Option<&'a NavLocation> {
    let query = name.trim().to_lowercase();
    locations
        .iter()
        .find(|l| l.name.to_lowercase() == query)
        .or_else(|| {
            locations
                .iter()
                .find(|l| l.name.to_lowercase().contains(&query))
        })
}

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Strip markup, collapse whitespace, truncate for display.
fn block_preview(content: &str) -> String {
    let stripped = TAG_RE.replace_all(content, " ");
    let collapsed = WS_RE.replace_all(stripped.trim(), " ").to_string();
    if collapsed.len() <= BLOCK_PREVIEW_LEN {
        return collapsed;
    }
    let mut end = BLOCK_PREVIEW_LEN;
    while end > 0 && !collapsed.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", collapsed[..end].trim_end())
}
