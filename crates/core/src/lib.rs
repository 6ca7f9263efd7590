//! SEO and GEO helpers for blog writing.
//!
//! Keyword research runs cache first, then the DataForSEO API, then a
//! heuristic generator, so [`KeywordResearcher::research`] always yields
//! records. The sibling tools analyze ranking competitors, suggest internal
//! links between markdown posts, and score a draft against a checklist.
//!
//! ```
//! use seogeo_core::{KeywordResearcher, MetricsFetcher, OutputMode, format_keywords};
//!
//! let researcher = KeywordResearcher::new(MetricsFetcher::offline());
//! let research = researcher.research("keyword", 3);
//! assert_eq!(research.records[0].keyword, "keyword");
//!
//! let text = format_keywords(&research.records, OutputMode::Simple).unwrap();
//! assert!(text.starts_with("1. keyword (Vol: 5,000, Diff: 70, Score: 100)"));
//! ```

pub mod cache;
pub mod competitor;
pub mod config;
pub mod credentials;
pub mod dataforseo;
pub mod error;
pub mod formatters;
pub mod keywords;
pub mod linking;
pub mod validate;

pub use cache::{CacheEntry, CacheHit, KeywordCache, cache_key};
pub use competitor::{
    AnalysisProgress, CompetitorAnalysis, CompetitorAnalyzer, Headings, PageStructure, SerpResult, WritingGuidelines,
};
pub use config::{ApiConfig, AppPaths};
pub use credentials::{
    Credential, CredentialResolver, CredentialSource, ResolvedCredential, SecretPrompt, mask_key,
    read_credential_config, write_credential_config,
};
#[cfg(feature = "fetch")]
pub use dataforseo::DataForSeoClient;
pub use dataforseo::{KeywordMetricsApi, SerpApi};
pub use error::{Result, SeoGeoError};
pub use formatters::{OutputMode, format_analysis, format_keywords, format_suggestions, format_validation};
pub use keywords::{
    FallbackReason, FetchOutcome, KeywordRecord, KeywordResearcher, MetricsFetcher, RecordSource, Research,
    ResearchSource, generate_variations,
};
#[doc(hidden)]
pub use keywords::{calculate_difficulty, calculate_relevance, heuristic_research};
pub use linking::{InternalLinkingAnalyzer, LinkSuggestion, SiteContent, load_site_content, read_draft};
pub use validate::{ValidationReport, Verdict, validate_post};
