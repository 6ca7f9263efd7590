//! Offline keyword estimates.
//!
//! Used whenever the API is unavailable. Volume and difficulty come from the
//! phrase length alone: longer phrases are rarer and easier to rank for.
//!
//! | words | volume | difficulty |
//! |-------|--------|------------|
//! | ≤ 2   | 5000   | 70         |
//! | 3     | 2000   | 55         |
//! | ≥ 4   | 800    | 35         |

use super::KeywordRecord;
use super::variations::generate_variations;

fn word_count(keyword: &str) -> usize {
    keyword.split_whitespace().count()
}

/// Estimated monthly search volume.
pub fn estimate_volume(keyword: &str) -> u64 {
    match word_count(keyword) {
        0..=2 => 5000,
        3 => 2000,
        _ => 800,
    }
}

/// Estimated difficulty (0-100).
pub fn estimate_difficulty(keyword: &str) -> u8 {
    match word_count(keyword) {
        0..=2 => 70,
        3 => 55,
        _ => 35,
    }
}

/// Question and comparison phrasings of the original topic.
pub fn generate_related(topic: &str) -> Vec<String> {
    let mut related = vec![format!("what is {}", topic), format!("how to {}", topic), format!("why {}", topic)];

    if topic.contains(' ') {
        related.push(format!("{} vs", topic));
    }

    related.truncate(5);
    related
}

/// Relevance by result position: 100, 90, 80, ... floored at zero.
pub fn position_relevance(position: usize) -> f64 {
    (100.0 - position as f64 * 10.0).max(0.0)
}

/// Builds up to `limit` records from the topic's variations.
pub fn heuristic_research(topic: &str, limit: usize) -> Vec<KeywordRecord> {
    generate_variations(topic)
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(position, variation)| KeywordRecord {
            search_volume: estimate_volume(&variation),
            difficulty: estimate_difficulty(&variation),
            related_keywords: generate_related(topic),
            relevance_score: position_relevance(position),
            keyword: variation,
        })
        .collect()
}
