//! Short-lived search result cache keyed by canonical query string.
//!
//! Identical parameter values within the TTL window are served without a
//! store round-trip. A response always lands under its own key, so a slow
//! response for old parameters can never replace a newer one.

use std::collections::HashMap;
use std::time::Duration;

use bazaar_core::{encode, SearchParameters, SearchParamsUpdate};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::orchestrator::{SearchOrchestrator, SearchOutcome};
use crate::store::SearchStore;

/// Canonical cache key: the query string of the normalized parameters.
#[must_use]
pub fn cache_key(params: &SearchParameters) -> String {
    encode(&SearchParamsUpdate::from(&params.normalized()), "")
}

#[derive(Debug, Clone)]
struct CacheEntry {
    stored_at: Instant,
    outcome: SearchOutcome,
}

/// Entry cap applied by [`SearchCache::new`].
pub const DEFAULT_MAX_ENTRIES: usize = 1024;

#[derive(Debug)]
pub struct SearchCache {
    ttl: Duration,
    max_entries: usize,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl SearchCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            max_entries: DEFAULT_MAX_ENTRIES,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cap the number of live entries; at the cap, inserting a new key drops
    /// the oldest entry.
    #[must_use]
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    /// Latest outcome stored under `key`, failed ones included.
    pub async fn peek(&self, key: &str) -> Option<SearchOutcome> {
        let mut entries = self.entries.lock().await;
        self.evict_expired(&mut entries);
        entries.get(key).map(|entry| entry.outcome.clone())
    }

    pub async fn insert(&self, key: String, outcome: SearchOutcome) {
        let mut entries = self.entries.lock().await;
        self.evict_expired(&mut entries);
        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }
        entries.insert(
            key,
            CacheEntry {
                stored_at: Instant::now(),
                outcome,
            },
        );
    }

    pub async fn len(&self) -> usize {
        let mut entries = self.entries.lock().await;
        self.evict_expired(&mut entries);
        entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Serve a fresh successful outcome for `key`, or run the search and store it.
    ///
    /// Failed outcomes are stored for display but never served as a hit, so
    /// repeating a failed search issues a new request.
    pub async fn get_or_search<S: SearchStore>(
        &self,
        orchestrator: &SearchOrchestrator<S>,
        key: &str,
        params: &SearchParameters,
    ) -> SearchOutcome {
        if let Some(hit) = self.peek(key).await.filter(|o| !o.is_failed()) {
            tracing::debug!(key, "search cache hit");
            return hit;
        }

        let outcome = orchestrator.search(params).await;
        self.insert(key.to_string(), outcome.clone()).await;
        outcome
    }

    fn evict_expired(&self, entries: &mut HashMap<String, CacheEntry>) {
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
    }
}
