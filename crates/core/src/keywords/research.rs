use super::KeywordRecord;
use super::fetch::{MetricsFetcher, RecordSource};
use crate::cache::KeywordCache;

/// Where a research result came from.
#[derive(Debug)]
pub enum ResearchSource {
    /// Served from the on-disk cache.
    Cache { age_days: u64 },
    /// Freshly fetched, from the API or the heuristic generator.
    Fetched(RecordSource),
}

impl ResearchSource {
    pub fn is_cached(&self) -> bool {
        matches!(self, Self::Cache { .. })
    }
}

#[derive(Debug)]
pub struct Research {
    pub records: Vec<KeywordRecord>,
    pub source: ResearchSource,
}

/// Cache-first keyword research.
pub struct KeywordResearcher {
    fetcher: MetricsFetcher,
    cache: Option<KeywordCache>,
}

impl KeywordResearcher {
    pub fn new(fetcher: MetricsFetcher) -> Self {
        Self { fetcher, cache: None }
    }

    pub fn with_cache(mut self, cache: KeywordCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Looks up the cache, fetches on a miss, and stores non-empty results.
    pub fn research(&self, topic: &str, limit: usize) -> Research {
        if let Some(cache) = &self.cache
            && let Some(hit) = cache.get(topic, limit)
        {
            let age_days = hit.age_days();
            return Research { records: hit.records, source: ResearchSource::Cache { age_days } };
        }

        let outcome = self.fetcher.fetch(topic, limit);

        if let Some(cache) = &self.cache
            && !outcome.records.is_empty()
        {
            cache.put(topic, limit, &outcome.records);
        }

        Research { records: outcome.records, source: ResearchSource::Fetched(outcome.source) }
    }
}
