//! On-disk cache of keyword research results.
//!
//! One JSON file per `(topic, limit)` pair, named by a SHA-256 digest of the
//! normalised query. Entries expire after [`CACHE_TTL`]. Reads and writes
//! both fail soft: the cache is only an optimisation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

pub use crate::config::CACHE_TTL;
use crate::keywords::KeywordRecord;
use crate::{Result, SeoGeoError};

/// A stored research result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(rename = "timestamp", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "topic")]
    pub query_topic: String,
    #[serde(rename = "limit")]
    pub query_limit: usize,
    #[serde(rename = "keywords")]
    pub records: Vec<KeywordRecord>,
}

/// A fresh entry returned by [`KeywordCache::get`].
#[derive(Debug, Clone, PartialEq)]
pub struct CacheHit {
    pub records: Vec<KeywordRecord>,
    pub age: Duration,
}

impl CacheHit {
    pub fn age_days(&self) -> u64 {
        self.age.as_secs() / 86_400
    }
}

/// Cache key for a query: hex SHA-256 of `"{lowercased trimmed topic}_{limit}"`.
pub fn cache_key(topic: &str, limit: usize) -> String {
    let input = format!("{}_{}", topic.trim().to_lowercase(), limit);
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// File-per-key keyword cache rooted at a directory.
#[derive(Debug, Clone)]
pub struct KeywordCache {
    dir: PathBuf,
    ttl: Duration,
}

impl KeywordCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), ttl: CACHE_TTL }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entry_path(&self, topic: &str, limit: usize) -> PathBuf {
        self.dir.join(format!("{}.json", cache_key(topic, limit)))
    }

    /// Fresh records for the query, if any.
    ///
    /// Corrupt and expired entries are deleted and reported as misses. An
    /// entry holding no records is also a miss.
    pub fn get(&self, topic: &str, limit: usize) -> Option<CacheHit> {
        let path = self.entry_path(topic, limit);
        if !path.exists() {
            return None;
        }

        let entry = match read_entry(&path) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Cache read failed ({}), will fetch fresh data", e);
                remove_quietly(&path);
                return None;
            }
        };

        let age = age_of(entry.created_at, OffsetDateTime::now_utc());
        if age > self.ttl {
            tracing::debug!(path = %path.display(), "cache entry expired");
            remove_quietly(&path);
            return None;
        }

        if entry.records.is_empty() {
            return None;
        }

        let hit = CacheHit { records: entry.records, age };
        tracing::info!("Cache hit for '{}' (age: {} days)", topic, hit.age_days());
        Some(hit)
    }

    /// Stores `records` for the query. Failures are logged and swallowed.
    pub fn put(&self, topic: &str, limit: usize, records: &[KeywordRecord]) {
        let entry = CacheEntry {
            created_at: OffsetDateTime::now_utc(),
            query_topic: topic.to_string(),
            query_limit: limit,
            records: records.to_vec(),
        };

        match self.write_entry(&entry) {
            Ok(()) => tracing::info!("Cached results for '{}'", topic),
            Err(e) => tracing::warn!("Could not write to cache ({})", e),
        }
    }

    /// Writes an entry as-is, timestamp included.
    pub fn write_entry(&self, entry: &CacheEntry) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.entry_path(&entry.query_topic, entry.query_limit);
        let json = serde_json::to_string_pretty(entry)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Deletes every entry. Returns how many files were removed.
    pub fn clear(&self) -> Result<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for dir_entry in fs::read_dir(&self.dir)? {
            let path = dir_entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

fn read_entry(path: &Path) -> Result<CacheEntry> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| SeoGeoError::Cache(e.to_string()))
}

fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        tracing::debug!(path = %path.display(), "could not remove cache entry: {}", e);
    }
}

/// Elapsed time since `created_at`. Timestamps in the future count as zero.
fn age_of(created_at: OffsetDateTime, now: OffsetDateTime) -> Duration {
    let elapsed = now - created_at;
    if elapsed.is_negative() { Duration::ZERO } else { elapsed.unsigned_abs() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn records() -> Vec<KeywordRecord> {
        vec![
            KeywordRecord {
                keyword: "healthy boundaries".to_string(),
                search_volume: 12000,
                difficulty: 45,
                related_keywords: vec!["what is healthy boundaries".to_string()],
                relevance_score: 86.5,
            },
            KeywordRecord {
                keyword: "setting healthy boundaries".to_string(),
                search_volume: 8500,
                difficulty: 30,
                related_keywords: Vec::new(),
                relevance_score: 71.0,
            },
        ]
    }

    #[test]
    fn test_cache_key_is_normalised() {
        assert_eq!(cache_key("  Healthy Boundaries ", 5), cache_key("healthy boundaries", 5));
        assert_ne!(cache_key("healthy boundaries", 5), cache_key("healthy boundaries", 10));
        assert_eq!(cache_key("x", 1).len(), 64);
    }

    #[test]
    fn test_miss_on_empty_cache() {
        let dir = TempDir::new().unwrap();
        let cache = KeywordCache::new(dir.path().join("cache"));
        assert!(cache.get("healthy boundaries", 5).is_none());
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let cache = KeywordCache::new(dir.path().join("cache"));

        cache.put("healthy boundaries", 5, &records());
        let hit = cache.get("Healthy Boundaries", 5).unwrap();

        assert_eq!(hit.records, records());
        assert_eq!(hit.age_days(), 0);
        assert!(cache.get("healthy boundaries", 3).is_none());
    }

    #[test]
    fn test_entry_file_layout() {
        let dir = TempDir::new().unwrap();
        let cache = KeywordCache::new(dir.path());
        cache.put("healthy boundaries", 5, &records());

        let content = fs::read_to_string(cache.entry_path("healthy boundaries", 5)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert!(value["timestamp"].is_string());
        assert_eq!(value["topic"], "healthy boundaries");
        assert_eq!(value["limit"], 5);
        assert_eq!(value["keywords"][0]["keyword_difficulty"], 45);
    }

    #[test]
    fn test_expired_entry_is_removed() {
        let dir = TempDir::new().unwrap();
        let cache = KeywordCache::new(dir.path());

        let entry = CacheEntry {
            created_at: OffsetDateTime::now_utc() - time::Duration::days(31),
            query_topic: "healthy boundaries".to_string(),
            query_limit: 5,
            records: records(),
        };
        cache.write_entry(&entry).unwrap();

        let path = cache.entry_path("healthy boundaries", 5);
        assert!(path.exists());
        assert!(cache.get("healthy boundaries", 5).is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_entry_within_ttl_is_fresh() {
        let dir = TempDir::new().unwrap();
        let cache = KeywordCache::new(dir.path());

        let entry = CacheEntry {
            created_at: OffsetDateTime::now_utc() - time::Duration::days(29),
            query_topic: "healthy boundaries".to_string(),
            query_limit: 5,
            records: records(),
        };
        cache.write_entry(&entry).unwrap();

        let hit = cache.get("healthy boundaries", 5).unwrap();
        assert_eq!(hit.age_days(), 29);
    }

    #[test]
    fn test_corrupt_entry_is_removed() {
        let dir = TempDir::new().unwrap();
        let cache = KeywordCache::new(dir.path());
        let path = cache.entry_path("healthy boundaries", 5);
        fs::write(&path, "{ not json").unwrap();

        assert!(cache.get("healthy boundaries", 5).is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_entry_without_timestamp_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let cache = KeywordCache::new(dir.path());
        let path = cache.entry_path("healthy boundaries", 5);
        fs::write(&path, r#"{"topic": "healthy boundaries", "limit": 5, "keywords": []}"#).unwrap();

        assert!(cache.get("healthy boundaries", 5).is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_empty_records_are_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = KeywordCache::new(dir.path());
        cache.put("healthy boundaries", 5, &[]);
        assert!(cache.get("healthy boundaries", 5).is_none());
    }

    #[test]
    fn test_put_into_unwritable_location_is_swallowed() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();

        let cache = KeywordCache::new(blocker.join("cache"));
        cache.put("healthy boundaries", 5, &records());
        assert!(cache.get("healthy boundaries", 5).is_none());
    }

    #[test]
    fn test_clear() {
        let dir = TempDir::new().unwrap();
        let cache = KeywordCache::new(dir.path());
        cache.put("a", 5, &records());
        cache.put("b", 5, &records());

        assert_eq!(cache.clear().unwrap(), 2);
        assert!(cache.get("a", 5).is_none());
    }

    #[test]
    fn test_custom_ttl() {
        let dir = TempDir::new().unwrap();
        let cache = KeywordCache::new(dir.path()).with_ttl(Duration::from_secs(3600));

        let entry = CacheEntry {
            created_at: OffsetDateTime::now_utc() - time::Duration::hours(2),
            query_topic: "k".to_string(),
            query_limit: 1,
            records: records(),
        };
        cache.write_entry(&entry).unwrap();
        assert!(cache.get("k", 1).is_none());
    }
}
