use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::page::{Difficulty, HikeType};

/// Verified factual dossier about a waterfall, produced by the research
/// stage and consumed once by the content stage.
///
/// `verified == false` is a hard gate: content generation must never run
/// for an unverifiable subject, and `verification_notes` explains why.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResearchResult {
    /// Verified name of the waterfall.
    pub waterfall_name: String,
    /// Whether the waterfall was confirmed to exist via credible sources.
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps_latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps_longitude: Option<f64>,
    /// Trail distance in miles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_miles: Option<f64>,
    /// Elevation gain in feet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain_feet: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hike_type: Option<HikeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waterfall_height_feet: Option<i64>,
    /// 2-3 paragraphs of factual information.
    pub description: String,
    #[serde(default)]
    pub notable_features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_time_to_visit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fees: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility_notes: Option<String>,
    /// URLs of the sources consulted.
    #[serde(default)]
    pub sources: Vec<String>,
    /// Why verification failed, when it did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_notes: Option<String>,
}
