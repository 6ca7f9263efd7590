use super::text::group_thousands;
use crate::competitor::CompetitorAnalysis;
use crate::keywords::KeywordRecord;
use crate::linking::LinkSuggestion;

/// Number of related keywords shown per record.
const RELATED_SHOWN: usize = 3;

/// Characters of placement context quoted per suggestion.
const CONTEXT_SHOWN: usize = 150;

fn join_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() { fallback.to_string() } else { items.join(", ") }
}

/// Numbered keyword sections under a `# Keyword Research Results` heading.
pub fn keywords_to_markdown(records: &[KeywordRecord]) -> String {
    let mut lines = vec!["# Keyword Research Results\n".to_string()];

    for (i, kw) in records.iter().enumerate() {
        lines.push(format!("## {}. {}", i + 1, kw.keyword));
        lines.push(format!("- **Search Volume:** {}", group_thousands(kw.search_volume)));
        lines.push(format!("- **Difficulty:** {}/100", kw.difficulty));
        lines.push(format!("- **Relevance:** {:.1}/100", kw.relevance_score));

        if !kw.related_keywords.is_empty() {
            let shown: Vec<&str> = kw.related_keywords.iter().take(RELATED_SHOWN).map(String::as_str).collect();
            lines.push(format!("- **Related:** {}", shown.join(", ")));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Benchmarks, guidelines and the top ranking pages.
pub fn analysis_to_markdown(analysis: &CompetitorAnalysis) -> String {
    let top_topics: Vec<String> = analysis.common_headings.iter().take(5).cloned().collect();
    let guidelines = &analysis.writing_guidelines;

    let mut lines = vec![
        format!("# Competitor Analysis: {}", analysis.keyword),
        format!("\n**Location**: {}", analysis.location),
        format!("**Pages Analyzed**: {}\n", analysis.analyzed_pages.len()),
        "## 📊 Quality Benchmarks\n".to_string(),
        format!("- **Average Word Count**: {}", group_thousands(analysis.average_word_count)),
        format!("- **Target Word Count**: {} (20% longer to outrank)", group_thousands(analysis.target_word_count)),
        format!("- **Average Readability**: {:.1} (Flesch-Kincaid)", analysis.average_readability),
        format!("- **Average SEO Score**: {:.1}/100", analysis.average_seo_score),
        format!("- **Common Topics**: {}", join_or(&top_topics, "N/A")),
        format!("- **Schema Types**: {}\n", join_or(&analysis.common_schema, "None found")),
        "## 🎯 Writing Guidelines\n".to_string(),
        format!("- **Target Keyword**: {}", guidelines.target_keyword),
        format!("- **Target Word Count**: {} words", group_thousands(guidelines.target_word_count)),
        format!("- **Target Readability**: {}", guidelines.target_readability),
        format!("- **Target SEO Score**: {}", guidelines.target_seo_score),
        format!("- **Common Topics to Cover**: {}", guidelines.common_topics),
        format!("- **Schema Markup**: {}", guidelines.schema_recommendations),
        format!("- **SEO Focus**: {}", guidelines.seo_focus),
        format!("- **Content Strategy**: {}", guidelines.content_strategy),
        format!("- **Quality Targets**: {}\n", guidelines.quality_targets),
        "## 🏆 Top Ranking Pages\n".to_string(),
    ];

    for (i, page) in analysis.analyzed_pages.iter().take(10).enumerate() {
        let top_h2s: Vec<String> = page.headings.h2.iter().take(3).cloned().collect();
        let og = if page.has_og_tags { "✅ OG" } else { "❌ OG" };
        let twitter = if page.has_twitter_tags { "✅ Twitter" } else { "❌ Twitter" };

        lines.extend([
            format!("### {}. {}", i + 1, page.domain()),
            format!("- **URL**: {}", page.url),
            format!("- **Title**: {}", page.title),
            format!("- **Word Count**: {}", group_thousands(page.word_count)),
            format!("- **Readability**: {:.1} (Flesch-Kincaid)", page.readability_score),
            format!("- **SEO Score**: {:.1}/100", page.onpage_score),
            format!("- **H1**: {}", join_or(&page.headings.h1, "N/A")),
            format!("- **Top H2s**: {}", top_h2s.join(", ")),
            format!("- **Schema**: {}", join_or(&page.schema_types, "None")),
            format!("- **Social**: {} | {}", og, twitter),
            String::new(),
        ]);
    }

    lines.join("\n")
}

/// Suggestions with context and a replacement action, or a hint when empty.
pub fn suggestions_to_markdown(suggestions: &[LinkSuggestion]) -> String {
    if suggestions.is_empty() {
        return "# Internal Linking Suggestions\n\nNo suggestions found. Try lowering --min-relevance threshold.\n"
            .to_string();
    }

    let mut lines =
        vec!["# Internal Linking Suggestions\n".to_string(), format!("**Total Suggestions:** {}\n", suggestions.len())];

    for (i, sug) in suggestions.iter().enumerate() {
        let context: String = sug.placement_context.chars().take(CONTEXT_SHOWN).collect();
        lines.extend([
            format!("## {}. Link to: {}\n", i + 1, sug.target_title),
            format!("**Keyword:** {}", sug.target_keyword),
            format!("**Target URL:** {}", sug.target_url),
            format!("**Anchor Text:** `{}`", sug.anchor_text),
            format!("**Placement:** {} section", sug.placement_section),
            format!("**Relevance:** {:.1}/100", sug.relevance_score),
            format!("**Reason:** {}\n", sug.reason),
            "**Context:**".to_string(),
            format!("> {}...\n", context),
            "**Action:**".to_string(),
            format!("Replace `{}` with `[{}]({})`\n", sug.target_keyword, sug.anchor_text, sug.target_url),
            "---\n".to_string(),
        ]);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::competitor::{Headings, PageStructure};

    fn record() -> KeywordRecord {
        KeywordRecord {
            keyword: "healthy boundaries".to_string(),
            search_volume: 12000,
            difficulty: 45,
            related_keywords: vec!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()],
            relevance_score: 86.5,
        }
    }

    #[test]
    fn test_keywords_to_markdown() {
        let md = keywords_to_markdown(&[record()]);
        let expected = "# Keyword Research Results\n\n\
            ## 1. healthy boundaries\n\
            - **Search Volume:** 12,000\n\
            - **Difficulty:** 45/100\n\
            - **Relevance:** 86.5/100\n\
            - **Related:** a, b, c\n";
        assert_eq!(md, expected);
    }

    #[test]
    fn test_keywords_without_related() {
        let mut rec = record();
        rec.related_keywords.clear();
        let md = keywords_to_markdown(&[rec]);
        assert!(!md.contains("Related"));
    }

    #[test]
    fn test_empty_suggestions_hint() {
        let md = suggestions_to_markdown(&[]);
        assert!(md.contains("No suggestions found. Try lowering --min-relevance threshold."));
    }

    #[test]
    fn test_suggestions_to_markdown() {
        let suggestion = LinkSuggestion {
            target_keyword: "healthy boundaries".to_string(),
            target_url: "/healthy-boundaries".to_string(),
            target_title: "Setting Healthy Boundaries".to_string(),
            anchor_text: "Healthy boundaries".to_string(),
            placement_section: "Getting started".to_string(),
            placement_context: "x".repeat(200),
            relevance_score: 78.57,
            reason: "Strong relevance".to_string(),
        };

        let md = suggestions_to_markdown(&[suggestion]);
        assert!(md.contains("**Total Suggestions:** 1"));
        assert!(md.contains("## 1. Link to: Setting Healthy Boundaries"));
        assert!(md.contains("**Relevance:** 78.6/100"));
        assert!(md.contains(&format!("> {}...", "x".repeat(150))));
        assert!(!md.contains(&"x".repeat(151)));
        assert!(md.contains("Replace `healthy boundaries` with `[Healthy boundaries](/healthy-boundaries)`"));
    }

    #[test]
    fn test_analysis_to_markdown() {
        let page = PageStructure {
            url: "https://www.example.com/post".to_string(),
            title: "Example".to_string(),
            meta_description: String::new(),
            word_count: 2400,
            headings: Headings { h1: Vec::new(), h2: vec!["One".into(), "Two".into()], h3: Vec::new() },
            schema_types: Vec::new(),
            internal_links: 0,
            external_links: 0,
            images: 0,
            onpage_score: 91.25,
            readability_score: 55.0,
            content_consistency: 0.0,
            has_og_tags: true,
            has_twitter_tags: false,
        };
        let analysis = CompetitorAnalysis::from_pages("boundaries", "United States", vec![page]);

        let md = analysis_to_markdown(&analysis);
        assert!(md.starts_with("# Competitor Analysis: boundaries\n"));
        assert!(md.contains("- **Average Word Count**: 2,400"));
        assert!(md.contains("- **Target Word Count**: 2,880 (20% longer to outrank)"));
        assert!(md.contains("- **Common Topics**: N/A"));
        assert!(md.contains("- **Schema Types**: None found"));
        assert!(md.contains("### 1. www.example.com"));
        assert!(md.contains("- **H1**: N/A"));
        assert!(md.contains("- **Top H2s**: One, Two"));
        assert!(md.contains("- **Social**: ✅ OG | ❌ Twitter"));
    }
}
