//! Rendering of results for stdout.
//!
//! Every renderer is pure and total over well-formed input, the empty list
//! included. Report types that have no rendering for a mode fail with
//! [`SeoGeoError::UnknownFormat`].

pub mod json;
pub mod markdown;
pub mod text;

use std::fmt;
use std::str::FromStr;

use crate::competitor::CompetitorAnalysis;
use crate::keywords::KeywordRecord;
use crate::linking::LinkSuggestion;
use crate::validate::ValidationReport;
use crate::{Result, SeoGeoError};

pub use json::{analysis_to_json, keywords_to_json, suggestions_to_json, validation_to_json};
pub use markdown::{analysis_to_markdown, keywords_to_markdown, suggestions_to_markdown};
pub use text::{group_thousands, keywords_to_simple, validation_to_text};

/// Output shape selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Machine-readable JSON.
    Json,
    /// Long human-readable markdown.
    #[default]
    Markdown,
    /// One line per item.
    Simple,
}

impl OutputMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "markdown",
            Self::Simple => "simple",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputMode {
    type Err = SeoGeoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            "simple" | "text" => Ok(Self::Simple),
            _ => Err(SeoGeoError::UnknownFormat(s.to_string())),
        }
    }
}

/// Renders keyword records in any mode.
pub fn format_keywords(records: &[KeywordRecord], mode: OutputMode) -> Result<String> {
    match mode {
        OutputMode::Json => keywords_to_json(records),
        OutputMode::Markdown => Ok(keywords_to_markdown(records)),
        OutputMode::Simple => Ok(keywords_to_simple(records)),
    }
}

/// Renders a competitor analysis as JSON or markdown.
pub fn format_analysis(analysis: &CompetitorAnalysis, mode: OutputMode) -> Result<String> {
    match mode {
        OutputMode::Json => analysis_to_json(analysis),
        OutputMode::Markdown => Ok(analysis_to_markdown(analysis)),
        OutputMode::Simple => Err(SeoGeoError::UnknownFormat(mode.to_string())),
    }
}

/// Renders link suggestions as JSON or markdown.
pub fn format_suggestions(suggestions: &[LinkSuggestion], mode: OutputMode) -> Result<String> {
    match mode {
        OutputMode::Json => suggestions_to_json(suggestions),
        OutputMode::Markdown => Ok(suggestions_to_markdown(suggestions)),
        OutputMode::Simple => Err(SeoGeoError::UnknownFormat(mode.to_string())),
    }
}

/// Renders a validation report as JSON, or as the plain text report for the
/// human-readable modes.
pub fn format_validation(report: &ValidationReport, mode: OutputMode) -> Result<String> {
    match mode {
        OutputMode::Json => validation_to_json(report),
        OutputMode::Markdown | OutputMode::Simple => Ok(validation_to_text(report)),
    }
}
