use crate::keywords::KeywordRecord;
use crate::validate::ValidationReport;

const RULE_WIDTH: usize = 60;

/// Formats an integer with `,` between groups of three digits.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// One line per record: `1. keyword (Vol: 5,000, Diff: 70, Score: 100)`.
pub fn keywords_to_simple(records: &[KeywordRecord]) -> String {
    records
        .iter()
        .enumerate()
        .map(|(i, kw)| {
            format!(
                "{}. {} (Vol: {}, Diff: {}, Score: {:.0})",
                i + 1,
                kw.keyword,
                group_thousands(kw.search_volume),
                kw.difficulty,
                kw.relevance_score
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Boxed text report with grouped checks and a verdict line.
pub fn validation_to_text(report: &ValidationReport) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec![
        String::new(),
        rule.clone(),
        "SEO/GEO VALIDATION RESULTS".to_string(),
        rule.clone(),
        String::new(),
        format!("Word Count: {}", report.word_count),
        format!("Overall Score: {}/100", report.score),
    ];

    let groups = [
        ("✓ PASSED", "checks", &report.passed),
        ("⚠ WARNINGS", "items", &report.warnings),
        ("✗ FAILED", "checks", &report.failed),
    ];

    for (label, noun, items) in groups {
        if items.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(format!("{} ({} {}):", label, items.len(), noun));
        lines.extend(items.iter().map(|item| format!("  {}", item)));
    }

    lines.push(String::new());
    lines.push(rule.clone());
    lines.push(report.verdict().message().to_string());
    lines.push(rule);

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0")]
    #[case(999, "999")]
    #[case(1000, "1,000")]
    #[case(12000, "12,000")]
    #[case(1234567, "1,234,567")]
    fn test_group_thousands(#[case] n: u64, #[case] expected: &str) {
        assert_eq!(group_thousands(n), expected);
    }

    #[test]
    fn test_keywords_to_simple() {
        let records = vec![
            KeywordRecord {
                keyword: "keyword".to_string(),
                search_volume: 5000,
                difficulty: 70,
                related_keywords: Vec::new(),
                relevance_score: 100.0,
            },
            KeywordRecord {
                keyword: "best keyword".to_string(),
                search_volume: 5000,
                difficulty: 70,
                related_keywords: Vec::new(),
                relevance_score: 90.0,
            },
        ];

        assert_eq!(
            keywords_to_simple(&records),
            "1. keyword (Vol: 5,000, Diff: 70, Score: 100)\n2. best keyword (Vol: 5,000, Diff: 70, Score: 90)"
        );
    }

    #[test]
    fn test_validation_to_text() {
        let report = ValidationReport {
            word_count: 1800,
            passed: vec!["✓ Images: 6".to_string(); 4],
            warnings: vec!["⚠ H2 count: 2 (target: 4-8)".to_string()],
            failed: Vec::new(),
            score: 80,
        };

        let text = validation_to_text(&report);
        assert!(text.contains("Word Count: 1800"));
        assert!(text.contains("Overall Score: 80/100"));
        assert!(text.contains("✓ PASSED (4 checks):"));
        assert!(text.contains("⚠ WARNINGS (1 items):\n  ⚠ H2 count: 2 (target: 4-8)"));
        assert!(!text.contains("FAILED"));
        assert!(text.contains("Excellent!"));
    }
}
