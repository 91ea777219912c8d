use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Trail difficulty levels. Wire values are validated by the CMS,
/// so they must match exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Difficulty {
    Easy,
    Moderate,
    Hard,
}

/// Hike type categories, same exact-match contract as [`Difficulty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum HikeType {
    Loop,
    #[serde(rename = "Out and Back")]
    OutAndBack,
    #[serde(rename = "Point to Point")]
    PointToPoint,
}

/// Recognized block names for the waterfall page template.
pub const TEMPLATE_BLOCK_NAMES: &[&str] = &[
    "cjBlockHero",
    "cjBlockIntroduction",
    "cjBlockHikingTips",
    "cjBlockSeasonalInfo",
    "cjBlockPhotographyTips",
    "cjBlockDirections",
    "cjBlockAdditionalInfo",
    "cjBlockGallery",
];

/// A single named content block. Block identity is the name; the CMS
/// upserts by name, never appends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContentBlock {
    /// Block identifier (e.g. "cjBlockHero").
    pub name: String,
    /// HTML content for the block.
    pub content: String,
}

/// Complete draft for a new waterfall page: the content stage's output
/// and the CMS-write stage's input. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WaterfallPageDraft {
    pub title: String,
    /// URL slug; the CMS derives one from the title when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// SEO title (50-60 characters).
    pub meta_title: String,
    /// SEO description (150-160 characters).
    pub meta_description: String,
    pub difficulty: Difficulty,
    /// Trail distance in miles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Elevation gain in feet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain: Option<i64>,
    pub hike_type: HikeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps_latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps_longitude: Option<f64>,
    pub blocks: Vec<ContentBlock>,
}

impl WaterfallPageDraft {
    /// Check the draft invariants: at least one block, block names unique
    /// and drawn from the template's recognized set.
    pub fn validate(&self) -> Result<(), String> {
        if self.blocks.is_empty() {
            return Err("draft contains no content blocks".to_string());
        }
        let mut seen = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            if !TEMPLATE_BLOCK_NAMES.contains(&block.name.as_str()) {
                return Err(format!("unrecognized block name '{}'", block.name));
            }
            if seen.contains(&block.name.as_str()) {
                return Err(format!("duplicate block name '{}'", block.name));
            }
            seen.push(block.name.as_str());
        }
        Ok(())
    }

    /// Convert to the argument object for the remote `create_waterfall_page`
    /// operation, skipping absent optionals.
    pub fn to_create_args(&self, parent_id: Option<i64>) -> Value {
        let mut args = json!({
            "title": self.title,
            "meta_title": self.meta_title,
            "meta_description": self.meta_description,
            "difficulty": self.difficulty,
            "hike_type": self.hike_type,
            "blocks": self.blocks,
        });
        if let Some(slug) = &self.slug {
            args["slug"] = json!(slug);
        }
        if let Some(distance) = self.distance {
            args["distance"] = json!(distance);
        }
        if let Some(elevation) = self.elevation_gain {
            args["elevation_gain"] = json!(elevation);
        }
        if let Some(lat) = self.gps_latitude {
            args["gps_latitude"] = json!(lat);
        }
        if let Some(lon) = self.gps_longitude {
            args["gps_longitude"] = json!(lon);
        }
        if let Some(parent_id) = parent_id {
            args["parent_id"] = json!(parent_id);
        }
        args
    }
}

/// Partial metadata update; only populated fields are sent.
/// Content blocks are never touched through this record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PageMetadataUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hike_type: Option<HikeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps_latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps_longitude: Option<f64>,
}

impl PageMetadataUpdate {
    /// Argument object for `update_page_metadata`, excluding absent fields.
    pub fn to_update_args(&self, page_id: i64) -> Value {
        let mut args = json!({ "page_id": page_id });
        if let Value::Object(fields) = serde_json::to_value(self).unwrap_or_default() {
            for (key, value) in fields {
                args[key] = value;
            }
        }
        args
    }
}

/// A structural page used to group content pages. The title is
/// normalized to title case on construction; normalization is idempotent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    /// Present iff the category already exists remotely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl Category {
    pub fn new(title: &str) -> Self {
        Self {
            title: normalize_title(title),
            slug: None,
            parent_id: None,
            id: None,
        }
    }

    /// Argument object for the remote `create_category_page` operation.
    pub fn to_create_args(&self) -> Value {
        let mut args = json!({ "title": self.title });
        if let Some(slug) = &self.slug {
            args["slug"] = json!(slug);
        }
        if let Some(parent_id) = self.parent_id {
            args["parent_id"] = json!(parent_id);
        }
        args
    }
}

// Mid-title words kept lowercase, matching the CMS's display conventions.
const SMALL_WORDS: &[&str] = &["of", "the", "and", "in", "at", "to", "for", "on"];

/// Canonicalize a free-text category name: trim, title-case each word,
/// then re-lowercase small words other than the first. Idempotent.
pub fn normalize_title(name: &str) -> String {
    let mut words = Vec::new();
    for (i, word) in name.split_whitespace().enumerate() {
        let lower = word.to_lowercase();
        if i > 0 && SMALL_WORDS.contains(&lower.as_str()) {
            words.push(lower);
        } else {
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => {
                    words.push(first.to_uppercase().chain(chars).collect::<String>())
                }
                None => words.push(String::new()),
            }
        }
    }
    words.join(" ")
}

/// Summary projection of a remote page, as returned by `list_pages`.
/// Lenient on deserialization: the remote may add fields or omit
/// optionals freely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub block_count: u32,
}

/// Full projection of a remote page, as returned by `get_page`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDetail {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub elevation_gain: Option<i64>,
    #[serde(default)]
    pub hike_type: Option<String>,
    #[serde(default)]
    pub gps_latitude: Option<f64>,
    #[serde(default)]
    pub gps_longitude: Option<f64>,
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
}

/// A navigation location the CMS exposes for page placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavLocation {
    pub id: i64,
    pub name: String,
}
