//! Competitor analysis over the top organic results for a keyword.
//!
//! The analysis runs in four steps: SERP lookup, per-page audit, aggregation
//! and writing guidelines. [`CompetitorAnalyzer::analyze`] reports each step
//! through an [`AnalysisProgress`] callback.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dataforseo::{SerpApi, TASK_OK, first_ok_task};
use crate::{Result, SeoGeoError};

/// Default SERP location name.
pub const DEFAULT_LOCATION: &str = "United States";

/// Default number of pages to analyze.
pub const DEFAULT_PAGE_LIMIT: usize = 10;

static HEADING_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w{3,}\b").expect("heading word pattern is valid"));

/// One organic SERP listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerpResult {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub position: Option<u64>,
}

/// H1-H3 headings of a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Headings {
    #[serde(rename = "H1")]
    pub h1: Vec<String>,
    #[serde(rename = "H2")]
    pub h2: Vec<String>,
    #[serde(rename = "H3")]
    pub h3: Vec<String>,
}

/// Audit of one competitor page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageStructure {
    pub url: String,
    pub title: String,
    pub meta_description: String,
    pub word_count: u64,
    pub headings: Headings,
    /// `og:type` plus `Micromarkup` when structured data was detected.
    pub schema_types: Vec<String>,
    pub internal_links: u64,
    pub external_links: u64,
    pub images: u64,
    /// OnPage SEO score (0-100).
    pub onpage_score: f64,
    /// Flesch-Kincaid readability index.
    pub readability_score: f64,
    pub content_consistency: f64,
    pub has_og_tags: bool,
    pub has_twitter_tags: bool,
}

impl PageStructure {
    /// Host part of the page URL.
    pub fn domain(&self) -> String {
        domain_of(&self.url)
    }
}

/// Short summary of a top-ranking page for the guidelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorSummary {
    pub rank: usize,
    pub domain: String,
    pub title: String,
    pub h1: String,
    pub word_count: u64,
    pub readability: f64,
    pub seo_score: f64,
    pub top_h2s: Vec<String>,
}

/// Targets for a new article derived from the competitor pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingGuidelines {
    pub target_keyword: String,
    pub target_word_count: u64,
    pub target_readability: String,
    pub target_seo_score: String,
    pub average_competitor_word_count: u64,
    pub common_topics: String,
    pub schema_recommendations: String,
    pub primary_schema: String,
    pub top_5_competitors: Vec<CompetitorSummary>,
    pub seo_focus: String,
    pub content_strategy: String,
    pub quality_targets: String,
}

/// Complete competitor analysis for a keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorAnalysis {
    pub keyword: String,
    pub location: String,
    pub analyzed_pages: Vec<PageStructure>,
    pub average_word_count: u64,
    /// 20% above the average.
    pub target_word_count: u64,
    pub average_readability: f64,
    pub average_seo_score: f64,
    pub common_headings: Vec<String>,
    pub common_schema: Vec<String>,
    pub writing_guidelines: WritingGuidelines,
}

impl CompetitorAnalysis {
    /// Aggregates audited pages into benchmarks and guidelines.
    pub fn from_pages(keyword: &str, location: &str, pages: Vec<PageStructure>) -> Self {
        let average_word_count = average_word_count(&pages);
        let average_readability = average(&pages, |p| p.readability_score);
        let average_seo_score = average(&pages, |p| p.onpage_score);
        let common_headings = common_headings(&pages);
        let common_schema = common_schema(&pages);

        let writing_guidelines = build_guidelines(
            keyword,
            &pages,
            average_word_count,
            average_readability,
            average_seo_score,
            &common_headings,
            &common_schema,
        );

        Self {
            keyword: keyword.to_string(),
            location: location.to_string(),
            target_word_count: target_word_count(average_word_count),
            analyzed_pages: pages,
            average_word_count,
            average_readability,
            average_seo_score,
            common_headings,
            common_schema,
            writing_guidelines,
        }
    }
}

/// Step events emitted while an analysis runs.
#[derive(Debug)]
pub enum AnalysisProgress<'a> {
    /// About to query the SERP for at most `limit` results.
    Searching { keyword: &'a str, limit: usize },
    /// Auditing page `index` (1-based) of `total`.
    Page { index: usize, total: usize, url: &'a str },
    /// The audit of `url` failed; the page is left out.
    PageSkipped { url: &'a str, error: &'a SeoGeoError },
    /// Building benchmarks from `analyzed` pages.
    Aggregating { analyzed: usize },
}

/// Runs competitor analysis against a [`SerpApi`].
pub struct CompetitorAnalyzer<'a> {
    api: &'a dyn SerpApi,
}

impl<'a> CompetitorAnalyzer<'a> {
    pub fn new(api: &'a dyn SerpApi) -> Self {
        Self { api }
    }

    /// Organic results for `keyword`, at most `limit`. Failures are logged
    /// and yield an empty list.
    pub fn serp_results(&self, keyword: &str, location: &str, limit: usize) -> Vec<SerpResult> {
        match self.api.organic(keyword, location, limit) {
            Ok(data) => parse_serp_response(&data, limit),
            Err(e) => {
                tracing::warn!("Error calling SERP API: {}", e);
                Vec::new()
            }
        }
    }

    /// Audits one page, falling back to the SERP title and description.
    pub fn analyze_page(&self, result: &SerpResult) -> Result<PageStructure> {
        let data = self.api.instant_page(&result.url)?;
        parse_page_response(&data, result)
    }

    /// Full analysis. Pages that fail are skipped; no SERP results at all is
    /// an error.
    pub fn analyze(
        &self,
        keyword: &str,
        location: &str,
        limit: usize,
        progress: &mut dyn FnMut(AnalysisProgress<'_>),
    ) -> Result<CompetitorAnalysis> {
        progress(AnalysisProgress::Searching { keyword, limit });
        let results = self.serp_results(keyword, location, limit);
        if results.is_empty() {
            return Err(SeoGeoError::NoSerpResults(keyword.to_string()));
        }

        let total = results.len();
        let mut pages = Vec::with_capacity(total);
        for (i, result) in results.iter().enumerate() {
            progress(AnalysisProgress::Page { index: i + 1, total, url: &result.url });
            match self.analyze_page(result) {
                Ok(page) => pages.push(page),
                Err(error) => {
                    tracing::debug!(url = %result.url, "skipped page: {}", error);
                    progress(AnalysisProgress::PageSkipped { url: &result.url, error: &error });
                }
            }
        }
        tracing::info!("analyzed {}/{} pages", pages.len(), total);

        progress(AnalysisProgress::Aggregating { analyzed: pages.len() });
        Ok(CompetitorAnalysis::from_pages(keyword, location, pages))
    }
}

/// Organic items from a SERP envelope, truncated to `limit`.
pub fn parse_serp_response(data: &Value, limit: usize) -> Vec<SerpResult> {
    let task = match first_ok_task(data) {
        Ok(task) => task,
        Err(reason) => {
            tracing::warn!("SERP API returned no usable task ({})", reason);
            return Vec::new();
        }
    };

    let items = task
        .get("result")
        .and_then(Value::as_array)
        .and_then(|result| result.first())
        .and_then(|first| first.get("items"))
        .and_then(Value::as_array);

    let Some(items) = items else {
        return Vec::new();
    };

    items
        .iter()
        .filter(|item| item.get("type").and_then(Value::as_str) == Some("organic"))
        .filter_map(|item| {
            Some(SerpResult {
                url: item.get("url").and_then(Value::as_str)?.to_string(),
                title: str_field(item, "title"),
                description: str_field(item, "description"),
                position: item.get("rank_absolute").and_then(Value::as_u64),
            })
        })
        .take(limit)
        .collect()
}

/// Reads the first item of an instant-pages envelope.
pub fn parse_page_response(data: &Value, serp: &SerpResult) -> Result<PageStructure> {
    let task = data
        .get("tasks")
        .and_then(Value::as_array)
        .and_then(|tasks| tasks.first())
        .ok_or_else(|| SeoGeoError::MalformedResponse("OnPage API error: No tasks".to_string()))?;

    if task.get("status_code").and_then(Value::as_i64) != Some(TASK_OK) {
        let message = task.get("status_message").and_then(Value::as_str).unwrap_or("Unknown error");
        return Err(SeoGeoError::MalformedResponse(format!("OnPage API error: {}", message)));
    }

    let item = task
        .get("result")
        .and_then(Value::as_array)
        .and_then(|result| result.first())
        .and_then(|first| first.get("items"))
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .ok_or_else(|| SeoGeoError::MalformedResponse("No page data in OnPage API response".to_string()))?;

    let empty = Value::Null;
    let meta = item.get("meta").unwrap_or(&empty);
    let content = meta.get("content").unwrap_or(&empty);
    let social = meta.get("social_media_tags").unwrap_or(&empty);
    let htags = meta.get("htags").unwrap_or(&empty);

    let headings = Headings { h1: str_list(htags, "h1"), h2: str_list(htags, "h2"), h3: str_list(htags, "h3") };

    let mut schema_types = Vec::new();
    if let Some(og_type) = str_field(social, "og:type").filter(|t| !t.is_empty()) {
        schema_types.push(og_type);
    }
    if item.pointer("/checks/has_micromarkup").and_then(Value::as_bool) == Some(true) {
        schema_types.push("Micromarkup".to_string());
    }

    Ok(PageStructure {
        url: serp.url.clone(),
        title: str_field(meta, "title").or_else(|| serp.title.clone()).unwrap_or_default(),
        meta_description: str_field(meta, "description").or_else(|| serp.description.clone()).unwrap_or_default(),
        word_count: count_field(content, "plain_text_word_count"),
        headings,
        schema_types,
        internal_links: count_field(meta, "internal_links_count"),
        external_links: count_field(meta, "external_links_count"),
        images: count_field(meta, "images_count"),
        onpage_score: float_field(item, "onpage_score"),
        readability_score: float_field(content, "flesch_kincaid_readability_index"),
        content_consistency: float_field(content, "title_to_content_consistency"),
        has_og_tags: str_field(social, "og:title").is_some_and(|t| !t.is_empty()),
        has_twitter_tags: str_field(social, "twitter:card").is_some_and(|t| !t.is_empty()),
    })
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn str_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}

fn count_field(value: &Value, key: &str) -> u64 {
    value.get(key).and_then(Value::as_f64).map(|n| n.max(0.0) as u64).unwrap_or(0)
}

fn float_field(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

/// Host (and port, if any) of a URL; the input itself when it does not parse.
pub fn domain_of(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) => match (parsed.host_str(), parsed.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            _ => url.to_string(),
        },
        Err(_) => url.to_string(),
    }
}

/// Integer mean of the word counts, truncated; 0 for no pages.
pub fn average_word_count(pages: &[PageStructure]) -> u64 {
    if pages.is_empty() {
        return 0;
    }
    let total: u64 = pages.iter().map(|p| p.word_count).sum();
    total / pages.len() as u64
}

fn average(pages: &[PageStructure], metric: impl Fn(&PageStructure) -> f64) -> f64 {
    if pages.is_empty() {
        return 0.0;
    }
    pages.iter().map(metric).sum::<f64>() / pages.len() as f64
}

pub fn target_word_count(average_word_count: u64) -> u64 {
    (average_word_count as f64 * 1.2) as u64
}

/// Words (3+ word characters) that recur across H2 headings, most frequent
/// first, at most 10.
pub fn common_headings(pages: &[PageStructure]) -> Vec<String> {
    let words = pages
        .iter()
        .flat_map(|page| page.headings.h2.iter())
        .flat_map(|h2| HEADING_WORD.find_iter(h2).map(|m| m.as_str().to_lowercase()));

    let mut counts = ordered_counts(words);
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(10).filter(|(_, count)| *count > 1).map(|(word, _)| word).collect()
}

/// Schema types present on at least two pages, in first-seen order.
pub fn common_schema(pages: &[PageStructure]) -> Vec<String> {
    let types = pages.iter().flat_map(|page| page.schema_types.iter().cloned());
    ordered_counts(types).into_iter().filter(|(_, count)| *count >= 2).map(|(schema, _)| schema).collect()
}

/// Occurrence counts keyed in first-seen order.
fn ordered_counts(items: impl Iterator<Item = String>) -> Vec<(String, usize)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for item in items {
        match index.get(&item) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(item.clone(), counts.len());
                counts.push((item, 1));
            }
        }
    }
    counts
}

fn build_guidelines(
    keyword: &str, pages: &[PageStructure], average_word_count: u64, average_readability: f64,
    average_seo_score: f64, common_headings: &[String], common_schema: &[String],
) -> WritingGuidelines {
    let top_5_competitors = pages
        .iter()
        .take(5)
        .enumerate()
        .map(|(i, page)| CompetitorSummary {
            rank: i + 1,
            domain: page.domain(),
            title: page.title.clone(),
            h1: if page.headings.h1.is_empty() { "N/A".to_string() } else { page.headings.h1.join(", ") },
            word_count: page.word_count,
            readability: page.readability_score,
            seo_score: page.onpage_score,
            top_h2s: page.headings.h2.iter().take(3).cloned().collect(),
        })
        .collect();

    let common_topics = if common_headings.is_empty() {
        "Various".to_string()
    } else {
        common_headings.iter().take(5).cloned().collect::<Vec<_>>().join(", ")
    };

    let (schema_recommendations, primary_schema) = match common_schema.first() {
        Some(first) => (common_schema.join(", "), first.clone()),
        None => ("Article, FAQPage".to_string(), "Article".to_string()),
    };

    WritingGuidelines {
        target_keyword: keyword.to_string(),
        target_word_count: target_word_count(average_word_count),
        target_readability: format!("{:.1} (Flesch-Kincaid)", average_readability),
        target_seo_score: format!("{:.1}/100", average_seo_score),
        average_competitor_word_count: average_word_count,
        common_topics,
        schema_recommendations,
        primary_schema,
        top_5_competitors,
        seo_focus: format!("Use '{}' in H1, introduction, and naturally throughout", keyword),
        content_strategy: "Go deeper than competitors with unique insights, data, and examples".to_string(),
        quality_targets: format!(
            "Match or exceed {:.1} readability and {:.1} SEO score",
            average_readability, average_seo_score
        ),
    }
}
