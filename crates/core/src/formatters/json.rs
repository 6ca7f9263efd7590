use serde::Serialize;

use crate::Result;
use crate::competitor::CompetitorAnalysis;
use crate::keywords::KeywordRecord;
use crate::linking::LinkSuggestion;
use crate::validate::ValidationReport;

fn pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Keyword records as a JSON array.
pub fn keywords_to_json(records: &[KeywordRecord]) -> Result<String> {
    pretty(records)
}

pub fn analysis_to_json(analysis: &CompetitorAnalysis) -> Result<String> {
    pretty(analysis)
}

pub fn suggestions_to_json(suggestions: &[LinkSuggestion]) -> Result<String> {
    pretty(suggestions)
}

pub fn validation_to_json(report: &ValidationReport) -> Result<String> {
    pretty(report)
}
