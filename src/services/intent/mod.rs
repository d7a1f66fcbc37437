//! Intent Services
//!
//! Natural-language command understanding for the agent:
//! - `normalizer`: text cleanup helpers
//! - `patterns`: the ordered rule table
//! - `extractor`: template extraction and per-intent validation
//! - `fallback`: generative resolution of unmatched commands
//! - `parser`: the entry point tying them together

pub mod extractor;
pub mod fallback;
pub mod normalizer;
pub mod parser;
pub mod patterns;

pub use extractor::{
    extract_content_params, extract_drush_params, extract_for_intent, extract_media_params,
    extract_node_params, extract_query_params, extract_site_params, ContentParams, DrushParams,
    ExtractedParams, MediaParams, NodeParams, QueryParams, SiteParams,
};
pub use fallback::{FallbackError, FallbackResolver};
pub use normalizer::clean_project_name;
pub use parser::IntentParser;
pub use patterns::{PatternRule, PatternTable, Template};
