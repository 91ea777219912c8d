use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Actions the router can classify a user request into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentAction {
    CreatePage,
    CreateCategory,
    MovePage,
    RenamePage,
    UpdateContent,
    UpdateMetadata,
    PublishPage,
    UnpublishPage,
    AddToNav,
    RemoveFromNav,
    SearchCms,
    ListPages,
    GetPage,
    Help,
}

impl std::fmt::Display for IntentAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Display matches the wire form so logs and payloads agree
        let s = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_default();
        write!(f, "{}", s)
    }
}

/// Structured classification of one user request, produced by the router
/// and consumed immediately by the dispatcher. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Intent {
    /// Brief explanation of why this action was chosen (1-2 sentences).
    pub reasoning: String,
    /// The classified action type.
    pub action: IntentAction,
    /// Name of the page being acted upon (most actions).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_page_name: Option<String>,
    /// Target parent/category for MOVE_PAGE, CREATE_PAGE, or CREATE_CATEGORY.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_parent_name: Option<String>,
    /// Search terms for SEARCH_CMS or LIST_PAGES.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    /// Payload text for UPDATE_CONTENT ("block: markup"), or the new title
    /// for RENAME_PAGE / UPDATE_METADATA.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_description: Option<String>,
    /// Navigation location for ADD_TO_NAV / REMOVE_FROM_NAV.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav_location_name: Option<String>,
}

impl Intent {
    /// Safe default returned when classification fails for any reason.
    pub fn help_fallback(reason: impl Into<String>) -> Self {
        Self {
            reasoning: reason.into(),
            action: IntentAction::Help,
            target_page_name: None,
            destination_parent_name: None,
            search_query: None,
            content_description: None,
            nav_location_name: None,
        }
    }
}
