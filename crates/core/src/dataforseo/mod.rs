//! DataForSEO v3 API access.
//!
//! The rest of the crate talks to the API only through [`KeywordMetricsApi`]
//! and [`SerpApi`], which return the raw JSON envelope. Interpreting that
//! envelope is left to the callers because every endpoint nests its payload
//! differently and each caller degrades in its own way.

#[cfg(feature = "fetch")]
pub mod client;

use serde_json::Value;

use crate::Result;

#[cfg(feature = "fetch")]
pub use client::DataForSeoClient;

/// Google Ads search volume, live mode.
pub const SEARCH_VOLUME_PATH: &str = "/v3/keywords_data/google_ads/search_volume/live";

/// Google organic SERP, live advanced mode.
pub const SERP_ORGANIC_PATH: &str = "/v3/serp/google/organic/live/advanced";

/// OnPage instant page analysis.
pub const INSTANT_PAGES_PATH: &str = "/v3/on_page/instant_pages";

/// Task-level status code DataForSEO uses for success.
pub const TASK_OK: i64 = 20000;

/// Source of keyword metrics for a batch of phrases.
pub trait KeywordMetricsApi {
    fn search_volume(&self, keywords: &[String]) -> Result<Value>;
}

/// Source of SERP listings and per-page audits.
pub trait SerpApi {
    fn organic(&self, keyword: &str, location: &str, depth: usize) -> Result<Value>;

    fn instant_page(&self, url: &str) -> Result<Value>;
}

/// First task of an envelope, if its status is [`TASK_OK`].
pub(crate) fn first_ok_task(data: &Value) -> std::result::Result<&Value, String> {
    let task = data
        .get("tasks")
        .and_then(Value::as_array)
        .and_then(|tasks| tasks.first())
        .ok_or_else(|| "No tasks".to_string())?;

    match task.get("status_code").and_then(Value::as_i64) {
        Some(TASK_OK) => Ok(task),
        status => {
            let message = task.get("status_message").and_then(Value::as_str).unwrap_or("Unknown error");
            Err(format!("task status {:?}: {}", status, message))
        }
    }
}
