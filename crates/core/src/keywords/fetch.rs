use serde_json::Value;

use super::KeywordRecord;
use super::heuristic::heuristic_research;
use super::scoring::RawKeywordMetrics;
use super::variations::generate_variations;
use crate::SeoGeoError;
use crate::dataforseo::{KeywordMetricsApi, TASK_OK};

/// Why a fetch used the heuristic generator.
#[derive(Debug)]
pub enum FallbackReason {
    /// No credential was configured.
    NoCredential,
    /// The API call failed on the remote side or in transit.
    RemoteFailure(SeoGeoError),
    /// The API call failed before or after the request, e.g. decoding.
    LocalFailure(SeoGeoError),
    /// The API answered but no usable record could be parsed.
    EmptyResponse,
}

/// Which path produced a record set.
#[derive(Debug)]
pub enum RecordSource {
    Remote,
    Heuristic(FallbackReason),
}

impl RecordSource {
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote)
    }
}

/// Records plus the path that produced them. All records of one outcome come
/// from the same path.
#[derive(Debug)]
pub struct FetchOutcome {
    pub records: Vec<KeywordRecord>,
    pub source: RecordSource,
}

/// Fetches keyword metrics, falling back to heuristics on any failure.
pub struct MetricsFetcher {
    api: Option<Box<dyn KeywordMetricsApi>>,
}

impl MetricsFetcher {
    /// A fetcher that queries `api`.
    pub fn new(api: Box<dyn KeywordMetricsApi>) -> Self {
        Self { api: Some(api) }
    }

    /// A fetcher with no API; every fetch is heuristic.
    pub fn offline() -> Self {
        Self { api: None }
    }

    /// Up to `limit` records for `topic`. Never fails.
    pub fn fetch(&self, topic: &str, limit: usize) -> FetchOutcome {
        let Some(api) = &self.api else {
            return fallback(topic, limit, FallbackReason::NoCredential);
        };

        let batch: Vec<String> = generate_variations(topic).into_iter().take(limit.saturating_mul(2)).collect();

        match api.search_volume(&batch) {
            Ok(response) => {
                let records = parse_search_volume_response(&response, topic, limit);
                if records.is_empty() {
                    tracing::warn!("API returned no usable keyword data, falling back to heuristic mode");
                    fallback(topic, limit, FallbackReason::EmptyResponse)
                } else {
                    FetchOutcome { records, source: RecordSource::Remote }
                }
            }
            Err(e) if e.is_remote() => {
                match e.guidance() {
                    Some(guidance) => tracing::warn!("{}\n{}\nFalling back to heuristic mode.", e, guidance),
                    None => tracing::warn!("{}. Falling back to heuristic mode.", e),
                }
                fallback(topic, limit, FallbackReason::RemoteFailure(e))
            }
            Err(e) => {
                tracing::error!("Unexpected error during API call: {}. Falling back to heuristic mode.", e);
                fallback(topic, limit, FallbackReason::LocalFailure(e))
            }
        }
    }
}

fn fallback(topic: &str, limit: usize, reason: FallbackReason) -> FetchOutcome {
    FetchOutcome { records: heuristic_research(topic, limit), source: RecordSource::Heuristic(reason) }
}

/// Parses a search volume envelope into records sorted by relevance.
///
/// Only the first successful task is read, and at most `limit` of its results.
/// Bad statuses, missing tasks and empty results yield an empty list.
pub fn parse_search_volume_response(data: &Value, topic: &str, limit: usize) -> Vec<KeywordRecord> {
    log_response_shape(data);

    let status = data.get("status_code").and_then(Value::as_i64);
    if !matches!(status, Some(200) | Some(TASK_OK)) {
        let message = data.get("status_message").and_then(Value::as_str).unwrap_or("Unknown error");
        tracing::warn!("API returned status {:?}: {}", status, message);
    }

    let tasks = match data.get("tasks").and_then(Value::as_array) {
        Some(tasks) if !tasks.is_empty() => tasks,
        _ => {
            tracing::warn!("no tasks found in API response");
            return Vec::new();
        }
    };

    let mut records = Vec::new();

    for task in tasks {
        let task_status = task.get("status_code").and_then(Value::as_i64);
        if task_status != Some(TASK_OK) {
            let message = task.get("status_message").and_then(Value::as_str).unwrap_or("Unknown error");
            tracing::warn!("task failed with status {:?}: {}", task_status, message);
            continue;
        }

        let results: Vec<&Value> = match task.get("result") {
            Some(Value::Array(items)) => items.iter().collect(),
            Some(item @ Value::Object(_)) => vec![item],
            _ => Vec::new(),
        };

        if results.is_empty() {
            tracing::warn!("task succeeded but returned no results");
            continue;
        }

        records.extend(
            results
                .into_iter()
                .take(limit)
                .filter_map(RawKeywordMetrics::from_value)
                .map(|raw| raw.into_record(topic)),
        );
        break;
    }

    records.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
    records
}

fn log_response_shape(data: &Value) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }

    let keys: Vec<&String> = data.as_object().map(|o| o.keys().collect()).unwrap_or_default();
    tracing::debug!(?keys, "API response");

    for (i, task) in data.get("tasks").and_then(Value::as_array).into_iter().flatten().enumerate() {
        let result_len = task.get("result").and_then(Value::as_array).map(Vec::len);
        tracing::debug!(
            task = i,
            status_code = ?task.get("status_code"),
            result_len = ?result_len,
            "API task"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Result;
    use serde_json::json;
    use std::cell::RefCell;

    struct StubApi {
        response: fn() -> Result<Value>,
        seen: RefCell<Vec<String>>,
    }

    impl StubApi {
        fn boxed(response: fn() -> Result<Value>) -> Box<Self> {
            Box::new(Self { response, seen: RefCell::new(Vec::new()) })
        }
    }

    impl KeywordMetricsApi for StubApi {
        fn search_volume(&self, keywords: &[String]) -> Result<Value> {
            self.seen.borrow_mut().extend(keywords.iter().cloned());
            (self.response)()
        }
    }

    impl KeywordMetricsApi for std::rc::Rc<StubApi> {
        fn search_volume(&self, keywords: &[String]) -> Result<Value> {
            self.as_ref().search_volume(keywords)
        }
    }

    fn sample_response() -> Value {
        json!({
            "version": "0.1.20231115",
            "status_code": 20000,
            "status_message": "Ok.",
            "tasks": [{
                "id": "test-task-123",
                "status_code": 20000,
                "status_message": "Ok.",
                "result": [
                    {
                        "keyword": "healthy boundaries",
                        "search_volume": 12000,
                        "competition": "MEDIUM",
                        "competition_index": 45,
                        "cpc": 1.25
                    },
                    {
                        "keyword": "setting healthy boundaries",
                        "search_volume": 8500,
                        "competition": "LOW",
                        "competition_index": 30,
                        "cpc": 0.85
                    },
                    {
                        "keyword": "boundaries in relationships",
                        "search_volume": 15000,
                        "competition": "HIGH",
                        "competition_index": 75,
                        "cpc": 2.10
                    }
                ]
            }]
        })
    }

    #[test]
    fn test_parse_response() {
        let records = parse_search_volume_response(&sample_response(), "healthy boundaries", 3);
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].keyword, "healthy boundaries");
        assert_eq!(records[0].search_volume, 12000);
        assert_eq!(records[0].difficulty, 45);

        assert_eq!(records[1].keyword, "setting healthy boundaries");
        assert!(records.windows(2).all(|w| w[0].relevance_score >= w[1].relevance_score));
    }

    #[test]
    fn test_parse_truncates_before_scoring() {
        let records = parse_search_volume_response(&sample_response(), "healthy boundaries", 2);
        assert_eq!(records.len(), 2);
        assert!(!records.iter().any(|r| r.keyword == "boundaries in relationships"));
    }

    #[test]
    fn test_parse_bad_status_without_tasks() {
        let data = json!({"status_code": 400, "status_message": "Bad Request"});
        assert!(parse_search_volume_response(&data, "test", 5).is_empty());
    }

    #[test]
    fn test_parse_task_error() {
        let data = json!({
            "status_code": 20000,
            "tasks": [{"status_code": 40001, "status_message": "Task failed"}]
        });
        assert!(parse_search_volume_response(&data, "test", 5).is_empty());
    }

    #[test]
    fn test_parse_empty_results() {
        let data = json!({"status_code": 20000, "tasks": [{"status_code": 20000, "result": []}]});
        assert!(parse_search_volume_response(&data, "test", 5).is_empty());
    }

    #[test]
    fn test_parse_single_object_result_and_null_items() {
        let data = json!({
            "status_code": 20000,
            "tasks": [
                {"status_code": 20000, "result": {"keyword": "test", "search_volume": null}},
                {"status_code": 20000, "result": [{"keyword": "ignored"}]}
            ]
        });
        let records = parse_search_volume_response(&data, "test", 5);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].keyword, "test");
        assert_eq!(records[0].search_volume, 0);
    }

    #[test]
    fn test_parse_skips_failed_task_and_reads_next() {
        let data = json!({
            "status_code": 20000,
            "tasks": [
                {"status_code": 50000},
                {"status_code": 20000, "result": [null, {"keyword": "test", "competition_index": 10}]}
            ]
        });
        let records = parse_search_volume_response(&data, "test", 5);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].difficulty, 10);
    }

    #[test]
    fn test_fetch_without_api_is_heuristic() {
        let outcome = MetricsFetcher::offline().fetch("keyword", 5);
        assert_eq!(outcome.records.len(), 5);
        assert!(matches!(outcome.source, RecordSource::Heuristic(FallbackReason::NoCredential)));
    }

    #[test]
    fn test_fetch_remote_success() {
        let fetcher = MetricsFetcher::new(StubApi::boxed(|| Ok(sample_response())));
        let outcome = fetcher.fetch("healthy boundaries", 3);
        assert!(outcome.source.is_remote());
        assert_eq!(outcome.records.len(), 3);
    }

    #[test]
    fn test_fetch_sends_twice_the_limit() {
        let api = std::rc::Rc::new(StubApi { response: || Ok(sample_response()), seen: RefCell::new(Vec::new()) });
        let fetcher = MetricsFetcher::new(Box::new(api.clone()));
        fetcher.fetch("healthy boundaries", 3);

        let seen = api.seen.borrow();
        assert_eq!(seen.len(), 6);
        assert_eq!(seen[0], "healthy boundaries");
        assert_eq!(seen[5], "tips for healthy boundaries");
    }

    #[test]
    fn test_fetch_remote_failure_falls_back() {
        let fetcher = MetricsFetcher::new(StubApi::boxed(|| Err(SeoGeoError::Unauthorized)));
        let outcome = fetcher.fetch("keyword", 5);

        assert_eq!(outcome.records.len(), 5);
        assert_eq!(outcome.records[0].keyword, "keyword");
        assert!(matches!(
            outcome.source,
            RecordSource::Heuristic(FallbackReason::RemoteFailure(SeoGeoError::Unauthorized))
        ));
    }

    #[test]
    fn test_fetch_local_failure_falls_back() {
        let fetcher = MetricsFetcher::new(StubApi::boxed(|| Err(SeoGeoError::Cache("disk full".to_string()))));
        let outcome = fetcher.fetch("keyword", 2);

        assert_eq!(outcome.records.len(), 2);
        assert!(matches!(
            outcome.source,
            RecordSource::Heuristic(FallbackReason::LocalFailure(SeoGeoError::Cache(_)))
        ));
    }

    #[test]
    fn test_fetch_malformed_response_falls_back() {
        let fetcher = MetricsFetcher::new(StubApi::boxed(|| Ok(json!({"status_code": 400}))));
        let outcome = fetcher.fetch("keyword", 5);

        assert_eq!(outcome.records.len(), 5);
        assert!(matches!(outcome.source, RecordSource::Heuristic(FallbackReason::EmptyResponse)));
    }
}
