//! Page and category name resolution.
//!
//! Users refer to pages by shorthand ("La Fortuna" for "La Fortuna,
//! Costa Rica"), so page lookup falls back to the first search result.
//! Categories are structural and must resolve exactly or not at all: a
//! fuzzy match would conflate a category with a content page whose
//! title merely contains the category name.

use schemas::{normalize_title, PageSummary};
use serde_json::json;
use tracing::warn;

use crate::mcp::{ToolClient, ToolClientError, ToolValue};

#[derive(Clone)]
pub struct NameResolver {
    tools: ToolClient,
}

impl NameResolver {
    pub fn new(tools: ToolClient) -> Self {
        Self { tools }
    }

    /// Search the remote page list. The shared primitive under every
    /// resolution path.
    pub async fn search(&self, query: &str) -> Result<Vec<PageSummary>, ToolClientError> {
        let value = self
            .tools
            .call("list_pages", json!({ "search": query }))
            .await?;
        match value {
            ToolValue::Structured(json) => serde_json::from_value(json).map_err(|e| {
                ToolClientError::Protocol(format!("unexpected list_pages shape: {e}"))
            }),
            ToolValue::Text(text) => Err(ToolClientError::Protocol(format!(
                "list_pages returned non-JSON text: {}",
                truncate(&text, 120)
            ))),
        }
    }

    /// Find a content page by name: exact title match, else exact slug
    /// match, else the first search result. `None` only when the search
    /// returned nothing (or failed).
    pub async fn find_page(&self, name: &str) -> Option<PageSummary> {
        let query = normalize_page_query(name);
        let pages = match self.search(&query).await {
            Ok(pages) => pages,
            Err(e) => {
                warn!(page = name, error = %e, "page lookup failed");
                return None;
            }
        };

        let slug = slugify(&query);
        pages
            .iter()
            .find(|page| page.title.eq_ignore_ascii_case(&query))
            .or_else(|| {
                pages
                    .iter()
                    .find(|page| page.slug.as_deref() == Some(slug.as_str()))
            })
            .or_else(|| pages.first())
            .cloned()
    }

    /// Find a page whose title matches exactly (case-insensitive), with
    /// no fuzzy fallback. Used by the duplicate check.
    pub async fn find_page_exact(&self, title: &str) -> Option<PageSummary> {
        let query = title.trim();
        let pages = match self.search(query).await {
            Ok(pages) => pages,
            Err(e) => {
                warn!(page = title, error = %e, "duplicate lookup failed");
                return None;
            }
        };
        pages
            .iter()
            .find(|page| page.title.eq_ignore_ascii_case(query))
            .cloned()
    }

    /// Find a category strictly: normalized name, exact title or slug
    /// match only. Never falls back to a fuzzy result.
    pub async fn find_category(&self, name: &str) -> Option<PageSummary> {
        let normalized = normalize_title(name);
        let pages = match self.search(&normalized).await {
            Ok(pages) => pages,
            Err(e) => {
                warn!(category = name, error = %e, "category lookup failed");
                return None;
            }
        };

        let slug = slugify(&normalized);
        pages
            .iter()
            .find(|page| {
                page.title.eq_ignore_ascii_case(&normalized)
                    || page.slug.as_deref() == Some(slug.as_str())
            })
            .cloned()
    }
}

/// Strip the shorthand users wrap page names in: a leading "the " and a
/// trailing "page"/"article"/"post".
pub fn normalize_page_query(name: &str) -> String {
    let mut query = name.trim();
    if let Some(prefix) = query.get(..4) {
        if prefix.eq_ignore_ascii_case("the ") {
            query = query[4..].trim_start();
        }
    }
    for suffix in [" page", " article", " post"] {
        if query.len() > suffix.len() {
            let tail_start = query.len() - suffix.len();
            if let Some(tail) = query.get(tail_start..) {
                if tail.eq_ignore_ascii_case(suffix) {
                    query = query[..tail_start].trim_end();
                    break;
                }
            }
        }
    }
    query.to_string()
}

pub(crate) fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

pub(crate) fn truncate(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }
    let mut end = limit;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
