//! Keyword research pipeline.
//!
//! cache lookup → [`MetricsFetcher`] (API or heuristic) → scoring → cache store.

pub mod fetch;
pub mod heuristic;
pub mod research;
pub mod scoring;
pub mod variations;

use serde::{Deserialize, Serialize};

pub use fetch::{FallbackReason, FetchOutcome, MetricsFetcher, RecordSource, parse_search_volume_response};
pub use heuristic::{estimate_difficulty, estimate_volume, generate_related, heuristic_research};
pub use research::{KeywordResearcher, Research, ResearchSource};
pub use scoring::{RawKeywordMetrics, calculate_difficulty, calculate_relevance};
pub use variations::generate_variations;

/// One scored keyword suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub keyword: String,
    pub search_volume: u64,
    /// Difficulty on a 0-100 scale.
    #[serde(rename = "keyword_difficulty", alias = "difficulty")]
    pub difficulty: u8,
    /// At most five related phrases.
    pub related_keywords: Vec<String>,
    /// Relevance on a 0-100 scale.
    pub relevance_score: f64,
}
