//! Internal link suggestions between a draft and existing site pages.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::{Result, SeoGeoError};

/// Default minimum relevance for a suggestion to be kept.
pub const DEFAULT_MIN_RELEVANCE: f64 = 60.0;

/// Default number of suggestions returned.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;

/// Characters of context captured on either side of a keyword mention.
const CONTEXT_RADIUS: usize = 100;

const PREVIEW_LEN: usize = 200;

static H1: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").expect("h1 pattern is valid"));
static H2: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^##\s+(.+)$").expect("h2 pattern is valid"));
static HEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#{1,6}\s+").expect("heading marker pattern is valid"));
static HEADING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#{1,6}\s+.+").expect("heading line pattern is valid"));
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[.+?\]\(.+?\)").expect("link pattern is valid"));
static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[*_`]").expect("emphasis pattern is valid"));

/// A page on the site that the draft could link to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteContent {
    pub url: String,
    pub title: String,
    /// Recurring 2-3 word phrases, lower-cased, most common first.
    pub keywords: Vec<String>,
    pub content_preview: String,
    pub h2_headings: Vec<String>,
}

impl SiteContent {
    /// Reads a markdown file. The URL is `base_url/stem` with `_` turned into `-`.
    pub fn from_markdown(path: &Path, base_url: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        Ok(Self::from_content(&content, &stem, base_url))
    }

    /// Builds a page from markdown text and its file stem.
    pub fn from_content(content: &str, stem: &str, base_url: &str) -> Self {
        let title = H1.captures(content).map(|c| c[1].to_string()).unwrap_or_else(|| stem.to_string());
        let h2_headings = H2.captures_iter(content).map(|c| c[1].to_string()).collect();

        let text = HEADING_LINE.replace_all(content, "");
        let text = LINK.replace_all(&text, "");
        let content_preview: String =
            text.split_whitespace().collect::<Vec<_>>().join(" ").chars().take(PREVIEW_LEN).collect();

        Self {
            url: format!("{}/{}", base_url, stem.replace('_', "-")),
            title,
            keywords: extract_keywords(content),
            content_preview,
            h2_headings,
        }
    }
}

/// Most common 2-word (longer than 6 chars) and 3-word (longer than 10 chars)
/// phrases without digits, at most 20, each seen at least twice.
pub fn extract_keywords(content: &str) -> Vec<String> {
    let text = HEADING_MARKER.replace_all(content, "");
    let text = LINK.replace_all(&text, "");
    let text = EMPHASIS.replace_all(&text, "").to_lowercase();
    let words: Vec<&str> = text.split_whitespace().collect();

    let pairs = words.windows(2).map(|w| w.join(" ")).filter(|p| p.chars().count() > 6);
    let triples = words.windows(3).map(|w| w.join(" ")).filter(|p| p.chars().count() > 10);
    let phrases = pairs.chain(triples).filter(|p| !p.chars().any(|c| c.is_numeric()));

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for phrase in phrases {
        match index.get(&phrase) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(phrase.clone(), counts.len());
                counts.push((phrase, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(20).filter(|(_, count)| *count >= 2).map(|(phrase, _)| phrase).collect()
}

/// Loads `.md` files, walking directories recursively in name order.
/// Files that cannot be read are skipped with a warning.
pub fn load_site_content(paths: &[PathBuf], base_url: &str) -> Vec<SiteContent> {
    let mut pages = Vec::new();

    for path in paths {
        if path.is_dir() {
            let files = WalkDir::new(path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        tracing::warn!("Failed to load {}: {}", path.display(), e);
                        None
                    }
                })
                .filter(|entry| entry.file_type().is_file() && is_markdown(entry.path()));

            for entry in files {
                load_one(entry.path(), base_url, &mut pages);
            }
        } else if path.is_file() && is_markdown(path) {
            load_one(path, base_url, &mut pages);
        } else {
            tracing::debug!(path = %path.display(), "not a markdown file or directory, ignored");
        }
    }

    pages
}

fn load_one(path: &Path, base_url: &str, pages: &mut Vec<SiteContent>) {
    match SiteContent::from_markdown(path, base_url) {
        Ok(page) => pages.push(page),
        Err(e) => tracing::warn!("Failed to load {}: {}", path.display(), e),
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}

/// Reads a draft file, mapping a missing file to [`SeoGeoError::FileNotFound`].
pub fn read_draft(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(SeoGeoError::FileNotFound(path.to_path_buf()));
    }
    Ok(fs::read_to_string(path)?)
}

/// One suggested link from the draft to a site page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSuggestion {
    pub target_keyword: String,
    pub target_url: String,
    pub target_title: String,
    pub anchor_text: String,
    /// H2 heading of the section to place the link in.
    pub placement_section: String,
    pub placement_context: String,
    pub relevance_score: f64,
    pub reason: String,
}

/// Suggests internal links by matching page keywords in the draft.
#[derive(Debug, Clone)]
pub struct InternalLinkingAnalyzer {
    min_relevance: f64,
}

impl Default for InternalLinkingAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_RELEVANCE)
    }
}

impl InternalLinkingAnalyzer {
    pub fn new(min_relevance: f64) -> Self {
        Self { min_relevance }
    }

    /// Suggestions above the relevance threshold, best first, at most
    /// `max_suggestions`. Pages already linked from the draft are skipped.
    pub fn suggest_links(&self, draft: &str, pages: &[SiteContent], max_suggestions: usize) -> Vec<LinkSuggestion> {
        let sections = extract_sections(draft);
        let draft_lower = draft.to_lowercase();
        let mut suggestions = Vec::new();

        for page in pages {
            if draft.contains(&page.url) {
                continue;
            }

            for keyword in &page.keywords {
                let contexts = keyword_contexts(draft, keyword);
                let Some((section, context)) = best_placement(&contexts, &sections) else {
                    continue;
                };

                let relevance = relevance(contexts.len(), page, &draft_lower, context);
                if relevance < self.min_relevance {
                    continue;
                }

                suggestions.push(LinkSuggestion {
                    target_keyword: keyword.clone(),
                    target_url: page.url.clone(),
                    target_title: page.title.clone(),
                    anchor_text: anchor_text(keyword),
                    placement_section: section.to_string(),
                    placement_context: context.to_string(),
                    relevance_score: relevance,
                    reason: reason(keyword, relevance),
                });
            }
        }

        suggestions.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
        suggestions.truncate(max_suggestions);
        suggestions
    }
}

/// `(heading, body)` for each H2 section, in document order. Bodies are trimmed.
pub fn extract_sections(content: &str) -> Vec<(String, String)> {
    let headings: Vec<_> = H2.captures_iter(content).collect();

    headings
        .iter()
        .enumerate()
        .map(|(i, caps)| {
            let start = caps.get(0).map_or(0, |m| m.end());
            let end = headings.get(i + 1).and_then(|next| next.get(0)).map_or(content.len(), |m| m.start());
            (caps[1].trim().to_string(), content[start..end].trim().to_string())
        })
        .collect()
}

/// Context snippets around each case-insensitive, non-overlapping mention of
/// `keyword` in `content`.
pub fn keyword_contexts(content: &str, keyword: &str) -> Vec<String> {
    let Ok(pattern) = RegexBuilder::new(&regex::escape(keyword)).case_insensitive(true).build() else {
        return Vec::new();
    };

    pattern
        .find_iter(content)
        .filter(|m| !m.is_empty())
        .map(|m| {
            let start = content[..m.start()].char_indices().rev().nth(CONTEXT_RADIUS - 1).map_or(0, |(i, _)| i);
            let end = content[m.end()..].char_indices().nth(CONTEXT_RADIUS).map_or(content.len(), |(i, _)| m.end() + i);
            content[start..end].trim().to_string()
        })
        .collect()
}

/// First section (document order) containing one of the contexts, else the
/// first context under "Introduction".
fn best_placement<'a>(contexts: &'a [String], sections: &'a [(String, String)]) -> Option<(&'a str, &'a str)> {
    for (heading, body) in sections {
        if let Some(context) = contexts.iter().find(|c| body.contains(c.as_str())) {
            return Some((heading.as_str(), context.as_str()));
        }
    }
    contexts.first().map(|context| ("Introduction", context.as_str()))
}

/// Prominence (max 40) + topic overlap (max 30) + context length (max 30).
fn relevance(mentions: usize, page: &SiteContent, draft_lower: &str, context: &str) -> f64 {
    let prominence = match mentions {
        0 => 0.0,
        1 => 20.0,
        2 => 30.0,
        _ => 40.0,
    };

    let overlap = page.keywords.iter().filter(|kw| draft_lower.contains(&kw.to_lowercase())).count();
    let overlap_ratio = overlap as f64 / page.keywords.len().max(1) as f64;

    let context_len = context.chars().count();
    let context_quality = if context_len > 150 {
        30.0
    } else if context_len > 100 {
        20.0
    } else {
        10.0
    };

    (prominence + overlap_ratio * 30.0 + context_quality).min(100.0)
}

/// The keyword with its first character upper-cased.
pub fn anchor_text(keyword: &str) -> String {
    let keyword = keyword.trim();
    let mut chars = keyword.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn reason(keyword: &str, relevance: f64) -> String {
    if relevance >= 90.0 {
        format!("Highly relevant: '{}' appears multiple times and topics strongly overlap", keyword)
    } else if relevance >= 75.0 {
        format!("Strong relevance: '{}' mentioned and topics align well", keyword)
    } else if relevance >= 60.0 {
        format!("Good relevance: '{}' provides useful context for readers", keyword)
    } else {
        "Moderate relevance: Related topic that adds value".to_string()
    }
}
