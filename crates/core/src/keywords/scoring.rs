use serde_json::Value;

use super::KeywordRecord;

/// Competition value used when the label is missing or unrecognised.
pub const DEFAULT_COMPETITION: f64 = 50.0;

/// Keyword metrics as returned by the search volume endpoint.
///
/// Every field is optional: the response is untrusted and partially filled
/// records are common (new keywords often have a null volume).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawKeywordMetrics {
    pub keyword: Option<String>,
    pub search_volume: Option<f64>,
    pub competition: Option<String>,
    pub competition_index: Option<f64>,
    pub cpc: Option<f64>,
    pub related_keywords: Vec<String>,
}

impl RawKeywordMetrics {
    /// Reads the known fields from a JSON object, ignoring fields of the wrong
    /// type. Returns `None` when `value` is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let string = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);
        let number = |key: &str| object.get(key).and_then(Value::as_f64);

        let related_keywords = object
            .get("related_keywords")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default();

        Some(Self {
            keyword: string("keyword"),
            search_volume: number("search_volume"),
            competition: string("competition"),
            competition_index: number("competition_index"),
            cpc: number("cpc"),
            related_keywords,
        })
    }

    /// Search volume, with missing and negative values read as zero.
    pub fn volume(&self) -> u64 {
        self.search_volume.map(|v| v.max(0.0) as u64).unwrap_or(0)
    }

    /// Scores the metrics against `topic` and builds the record. A missing
    /// keyword falls back to the topic itself.
    pub fn into_record(self, topic: &str) -> KeywordRecord {
        let difficulty = calculate_difficulty(&self);
        let relevance_score = calculate_relevance(&self, topic);
        let search_volume = self.volume();
        let keyword = self.keyword.unwrap_or_else(|| topic.to_string());
        let mut related_keywords = self.related_keywords;
        related_keywords.truncate(5);

        KeywordRecord { keyword, search_volume, difficulty, related_keywords, relevance_score }
    }
}

/// Maps a `HIGH`/`MEDIUM`/`LOW` competition label to a numeric value.
pub fn competition_value(label: Option<&str>) -> f64 {
    match label.map(|l| l.to_uppercase()).as_deref() {
        Some("HIGH") => 75.0,
        Some("MEDIUM") => 50.0,
        Some("LOW") => 25.0,
        _ => DEFAULT_COMPETITION,
    }
}

/// Keyword difficulty on a 0-100 scale.
///
/// A provider competition index is used as-is. Without one, difficulty is
/// `round(competition × 0.7 + min(cpc × 5, 30))`. Both paths are clamped.
pub fn calculate_difficulty(raw: &RawKeywordMetrics) -> u8 {
    if let Some(index) = raw.competition_index {
        return index.round().clamp(0.0, 100.0) as u8;
    }

    let competition = competition_value(raw.competition.as_deref());
    let cpc = raw.cpc.unwrap_or(0.0);
    let difficulty = competition * 0.7 + (cpc * 5.0).min(30.0);

    difficulty.round().clamp(0.0, 100.0) as u8
}

/// Volume share of the relevance score (max 30).
pub fn volume_factor(volume: u64) -> f64 {
    if volume > 10_000 {
        30.0
    } else if volume > 1_000 {
        20.0
    } else if volume > 100 {
        10.0
    } else {
        0.0
    }
}

/// Topic share of the relevance score (max 40).
pub fn topic_match_factor(keyword: &str, topic: &str) -> f64 {
    let keyword = keyword.to_lowercase();
    let topic = topic.to_lowercase();

    if keyword == topic {
        40.0
    } else if topic.contains(&keyword) || keyword.contains(&topic) {
        30.0
    } else {
        10.0
    }
}

/// Relevance on a 0-100 scale: volume (30) + inverse difficulty (30) + topic match (40).
pub fn calculate_relevance(raw: &RawKeywordMetrics, topic: &str) -> f64 {
    let difficulty = calculate_difficulty(raw);
    let score = volume_factor(raw.volume())
        + (100.0 - f64::from(difficulty)) * 0.3
        + topic_match_factor(raw.keyword.as_deref().unwrap_or_default(), topic);

    score.min(100.0)
}
