//! # Schemas - shared data contract
//!
//! Records exchanged between the assistant core, the generation service
//! (as structured-output response shapes), and the CMS tool surface (as
//! tool arguments and result projections). The CMS is the system of
//! record; nothing here is persisted locally.

pub mod intent;
pub mod page;
pub mod research;

pub use intent::{Intent, IntentAction};
pub use page::{
    normalize_title, Category, ContentBlock, Difficulty, HikeType, NavLocation, PageDetail,
    PageMetadataUpdate, PageSummary, WaterfallPageDraft, TEMPLATE_BLOCK_NAMES,
};
pub use research::ResearchResult;
