//! Live search state bound to a URL query string.
//!
//! The query string is the durable, shareable state; the parameters held
//! here are a decoded copy of it. Every update re-encodes the query string
//! first and then yields a request keyed by the full parameter value.

use std::sync::Arc;

use bazaar_core::{decode, encode, SearchParameters, SearchParamsUpdate, SearchResultEnvelope};

use crate::cache::{cache_key, SearchCache};
use crate::orchestrator::{SearchOrchestrator, SearchOutcome};
use crate::store::SearchStore;

pub struct SearchSession<S> {
    orchestrator: Arc<SearchOrchestrator<S>>,
    cache: Arc<SearchCache>,
    params: SearchParameters,
    query_string: String,
}

impl<S: SearchStore> SearchSession<S> {
    /// Start a session from the current URL query string.
    pub fn from_query_string(
        orchestrator: Arc<SearchOrchestrator<S>>,
        cache: Arc<SearchCache>,
        query: &str,
    ) -> Self {
        Self {
            orchestrator,
            cache,
            params: decode(query),
            query_string: query.trim_start_matches('?').to_string(),
        }
    }

    pub fn params(&self) -> &SearchParameters {
        &self.params
    }

    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    /// Merge `update` into the live parameters.
    ///
    /// Pagination restarts at page 1 unless the update names a page. The query
    /// string is rewritten first and the live parameters are decoded back from
    /// it, so keys carried forward (a `distance` revived by a new location)
    /// count exactly as a reload of the URL would count them.
    pub fn update(&mut self, update: SearchParamsUpdate) -> SearchRequest<S> {
        let update = update.resetting_page();
        self.query_string = encode(&update, &self.query_string);
        self.params = decode(&self.query_string);
        tracing::debug!(query = %self.query_string, "search parameters updated");

        self.request()
    }

    /// Request for the current parameters, e.g. on first render.
    pub fn request(&self) -> SearchRequest<S> {
        SearchRequest {
            key: cache_key(&self.params),
            params: self.params.clone(),
            orchestrator: Arc::clone(&self.orchestrator),
            cache: Arc::clone(&self.cache),
        }
    }

    /// Outcome stored for the current parameters, if it has arrived.
    pub async fn outcome(&self) -> Option<SearchOutcome> {
        self.cache.peek(&cache_key(&self.params)).await
    }

    /// Envelope for the current parameters; empty while loading or after a failure.
    pub async fn results(&self) -> SearchResultEnvelope {
        self.outcome()
            .await
            .map(SearchOutcome::into_envelope)
            .unwrap_or_default()
    }

    pub async fn is_loading(&self) -> bool {
        self.outcome().await.is_none()
    }
}

/// A search bound to one parameter value. Independent of the session, so it
/// can run concurrently with later requests.
pub struct SearchRequest<S> {
    key: String,
    params: SearchParameters,
    orchestrator: Arc<SearchOrchestrator<S>>,
    cache: Arc<SearchCache>,
}

impl<S: SearchStore> SearchRequest<S> {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn params(&self) -> &SearchParameters {
        &self.params
    }

    pub async fn run(self) -> SearchOutcome {
        self.cache
            .get_or_search(&self.orchestrator, &self.key, &self.params)
            .await
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
