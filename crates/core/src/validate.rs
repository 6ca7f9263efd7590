//! Structure checks for a markdown blog draft.
//!
//! Each check lands in exactly one of passed, warnings or failed. Two checks
//! are conditional: the table of contents is only checked for drafts over
//! 1500 words, and the meta description only when one is declared. The score
//! is the share of passed checks.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Score at or above which a draft is acceptable.
pub const PASSING_SCORE: u32 = 60;

/// Score at or above which a draft is excellent.
pub const EXCELLENT_SCORE: u32 = 80;

static TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").expect("title pattern is valid"));
static H2: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^##\s+").expect("h2 pattern is valid"));
static FAQ_QUESTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"###\s+.*\?").expect("faq question pattern is valid"));
static LINK_TARGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.+?\]\((.*?)\)").expect("link target pattern is valid"));
static EXTERNAL_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.+?\]\(https?://.*?\)").expect("external link pattern is valid"));
static IMAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[.*?\]\(.*?\)").expect("image pattern is valid"));
static META_DESCRIPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Meta Description.*?:(.+)").expect("meta description pattern is valid"));
static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").expect("sentence pattern is valid"));
static VOWEL_GROUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[aeiouy]+").expect("vowel pattern is valid"));

/// Outcome of validating a draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub word_count: usize,
    pub passed: Vec<String>,
    pub warnings: Vec<String>,
    pub failed: Vec<String>,
    /// `trunc(passed / total × 100)`.
    pub score: u32,
}

impl ValidationReport {
    pub fn total_checks(&self) -> usize {
        self.passed.len() + self.warnings.len() + self.failed.len()
    }

    pub fn is_passing(&self) -> bool {
        self.score >= PASSING_SCORE
    }

    pub fn verdict(&self) -> Verdict {
        if self.score >= EXCELLENT_SCORE {
            Verdict::Excellent
        } else if self.score >= PASSING_SCORE {
            Verdict::Good
        } else {
            Verdict::NeedsImprovement
        }
    }

    fn pass(&mut self, message: String) {
        self.passed.push(format!("✓ {}", message));
    }

    fn warn(&mut self, message: String) {
        self.warnings.push(format!("⚠ {}", message));
    }

    fn fail(&mut self, message: String) {
        self.failed.push(format!("✗ {}", message));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Excellent,
    Good,
    NeedsImprovement,
}

impl Verdict {
    pub fn message(self) -> &'static str {
        match self {
            Self::Excellent => "✓ Excellent! Blog post meets SEO/GEO standards.",
            Self::Good => "⚠ Good, but address warnings for better optimization.",
            Self::NeedsImprovement => "✗ Needs improvement. Address failed checks and warnings.",
        }
    }
}

/// Runs every check against `content`.
pub fn validate_post(content: &str) -> ValidationReport {
    let word_count = content.split_whitespace().count();
    let mut report = ValidationReport { word_count, ..Default::default() };

    let title = TITLE.captures(content).map(|c| c[1].chars().count()).unwrap_or(0);
    if (50..=60).contains(&title) {
        report.pass(format!("Title length optimal: {} chars", title));
    } else if title > 0 {
        report.warn(format!("Title length: {} chars (target: 50-60)", title));
    } else {
        report.fail("No H1 title found".to_string());
    }

    let h2_count = H2.find_iter(content).count();
    if (4..=8).contains(&h2_count) {
        report.pass(format!("H2 count optimal: {}", h2_count));
    } else {
        report.warn(format!("H2 count: {} (target: 4-8)", h2_count));
    }

    if (1500..=3000).contains(&word_count) {
        report.pass(format!("Word count good: {}", word_count));
    } else if word_count < 1000 {
        report.fail(format!("Word count too low: {} (min: 1,500)", word_count));
    } else {
        report.warn(format!("Word count: {}", word_count));
    }

    if content.contains("## Frequently Asked Questions") || content.contains("## FAQ") {
        let questions = FAQ_QUESTION.find_iter(content).count();
        if questions >= 4 {
            report.pass(format!("FAQ section with {} questions", questions));
        } else {
            report.warn(format!("FAQ section has only {} questions (target: 4-8)", questions));
        }
    } else {
        report.fail("No FAQ section found".to_string());
    }

    let internal_links = count_internal_links(content);
    if (3..=5).contains(&internal_links) {
        report.pass(format!("Internal links: {}", internal_links));
    } else {
        report.warn(format!("Internal links: {} (target: 3-5)", internal_links));
    }

    let external_links = EXTERNAL_LINK.find_iter(content).count();
    if (2..=4).contains(&external_links) {
        report.pass(format!("External links: {}", external_links));
    } else {
        report.warn(format!("External links: {} (target: 2-4)", external_links));
    }

    let images = IMAGE.find_iter(content).count();
    if images >= 5 {
        report.pass(format!("Images: {}", images));
    } else {
        report.warn(format!("Images: {} (target: 5-8)", images));
    }

    let head: String = content.chars().take(500).collect();
    if content.contains("## About the Author") || head.contains("**Author:**") {
        report.pass("Author bio present".to_string());
    } else {
        report.fail("No author bio found".to_string());
    }

    if word_count > 1500 {
        if content.contains("## Table of Contents") {
            report.pass("Table of contents present".to_string());
        } else {
            report.warn("Consider adding table of contents (1,500+ words)".to_string());
        }
    }

    let lower = content.to_lowercase();
    if lower.contains("schema") || lower.contains("json-ld") {
        report.pass("Schema markup mentioned".to_string());
    } else {
        report.warn("No schema markup reference found".to_string());
    }

    if content.contains("Meta Description")
        && let Some(caps) = META_DESCRIPTION.captures(content)
    {
        let length = caps[1].trim().chars().count();
        if (145..=155).contains(&length) {
            report.pass(format!("Meta description length: {} chars", length));
        } else {
            report.warn(format!("Meta description: {} chars (target: 145-155)", length));
        }
    }

    let readability = reading_ease(content);
    if (60.0..=70.0).contains(&readability) {
        report.pass(format!("Readability score: {:.1}", readability));
    } else {
        report.warn(format!("Readability: {:.1} (target: 60-70)", readability));
    }

    let total = report.total_checks();
    if total > 0 {
        report.score = (report.passed.len() as f64 / total as f64 * 100.0) as u32;
    }

    report
}

/// Markdown links whose target does not start with `http`. Images count too.
pub fn count_internal_links(content: &str) -> usize {
    LINK_TARGET.captures_iter(content).filter(|caps| !caps[1].starts_with("http")).count()
}

/// Simplified Flesch reading ease, clamped to 0-100. Zero when the text has
/// no sentence terminators or no words.
pub fn reading_ease(text: &str) -> f64 {
    let sentences = SENTENCE_END.find_iter(text).count();
    let words: Vec<&str> = text.split_whitespace().collect();

    if sentences == 0 || words.is_empty() {
        return 0.0;
    }

    let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();
    let words_per_sentence = words.len() as f64 / sentences as f64;
    let syllables_per_word = syllables as f64 / words.len() as f64;

    (206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word).clamp(0.0, 100.0)
}

/// Vowel groups in the word, at least one.
pub fn count_syllables(word: &str) -> usize {
    VOWEL_GROUP.find_iter(&word.to_lowercase()).count().max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn words(n: usize) -> String {
        "The cat sat on the mat. ".repeat(n / 6 + 1).split_whitespace().take(n).collect::<Vec<_>>().join(" ")
    }

    fn strong_post() -> String {
        let title = "How to Set Healthy Boundaries Without Feeling Guilty";
        let meta = "Meta Description: ".to_string() + &"x".repeat(150);
        format!(
            "# {title} Today\n\n**Author:** Jane Doe\n\n{meta}\n\n## Table of Contents\n\n\
             ## Why It Matters\n\n{body}\n\n\
             [guide](/guide) [tips](/tips) [faq](/faq)\n\
             [study](https://example.com/a) [paper](https://example.org/b)\n\
             ![a](1.png) ![b](2.png) ![c](3.png) ![d](4.png) ![e](5.png)\n\n\
             ## Frequently Asked Questions\n\n### What is it?\n### Why care?\n### How long?\n### Who benefits?\n\n\
             ## About the Author\n\nWrites about schema and people.\n",
            body = words(1600)
        )
    }

    #[rstest]
    #[case("cat", 1)]
    #[case("boundaries", 3)]
    #[case("rhythm", 1)]
    #[case("queue", 1)]
    #[case("", 1)]
    fn test_count_syllables(#[case] word: &str, #[case] expected: usize) {
        assert_eq!(count_syllables(word), expected);
    }

    #[test]
    fn test_reading_ease_bounds() {
        assert_eq!(reading_ease("no terminators here"), 0.0);
        assert_eq!(reading_ease(""), 0.0);
        let easy = reading_ease("The cat sat. The dog ran.");
        assert!((0.0..=100.0).contains(&easy));
        assert_eq!(easy, 100.0);
    }

    #[test]
    fn test_internal_links_exclude_http() {
        let content = "[a](/one) [b](two.md) [c](https://x.com) [d](http://y.com) ![img](pic.png)";
        assert_eq!(count_internal_links(content), 3);
    }

    #[test]
    fn test_empty_post() {
        let report = validate_post("");
        assert_eq!(report.word_count, 0);
        assert!(report.failed.contains(&"✗ No H1 title found".to_string()));
        assert!(report.failed.contains(&"✗ No FAQ section found".to_string()));
        assert!(report.failed.contains(&"✗ No author bio found".to_string()));
        assert!(report.failed.iter().any(|f| f.starts_with("✗ Word count too low")));
        // no ToC check under 1500 words and no meta description check
        assert_eq!(report.total_checks(), 10);
        assert_eq!(report.score, 0);
        assert_eq!(report.verdict(), Verdict::NeedsImprovement);
        assert!(!report.is_passing());
    }

    #[test]
    fn test_strong_post_scores_well() {
        let report = validate_post(&strong_post());

        assert_eq!(report.total_checks(), 12);
        assert!(report.failed.is_empty(), "{:?}", report.failed);
        assert!(report.passed.iter().any(|p| p.starts_with("✓ FAQ section with 4 questions")));
        assert!(report.passed.contains(&"✓ Meta description length: 150 chars".to_string()));
        assert!(report.passed.contains(&"✓ Table of contents present".to_string()));
        assert!(report.passed.contains(&"✓ Author bio present".to_string()));
        // images use link syntax too
        assert!(report.warnings.contains(&"⚠ Internal links: 8 (target: 3-5)".to_string()));
        assert!(report.warnings.iter().any(|w| w.starts_with("⚠ Readability: 100.0")));
        assert_eq!(report.score, 83);
        assert_eq!(report.verdict(), Verdict::Excellent);
    }

    #[test]
    fn test_title_length_warning() {
        let report = validate_post("# Short title\n");
        assert!(report.warnings.contains(&"⚠ Title length: 11 chars (target: 50-60)".to_string()));
    }

    #[test]
    fn test_word_count_between_thousand_and_fifteen_hundred_warns() {
        let report = validate_post(&words(1200));
        assert!(report.warnings.contains(&"⚠ Word count: 1200".to_string()));
    }

    #[test]
    fn test_long_post_without_toc_warns() {
        let report = validate_post(&words(1600));
        assert!(report.warnings.contains(&"⚠ Consider adding table of contents (1,500+ words)".to_string()));
    }

    #[test]
    fn test_verdict_bands() {
        let at = |score| ValidationReport { score, ..Default::default() }.verdict();
        assert_eq!(at(80), Verdict::Excellent);
        assert_eq!(at(79), Verdict::Good);
        assert_eq!(at(60), Verdict::Good);
        assert_eq!(at(59), Verdict::NeedsImprovement);
    }
}
