use bazaar_core::{EntityType, SearchParameters, SearchResultEnvelope};
use serde::Serialize;

use crate::composer::{compose_categories, compose_listings, compose_product_types, compose_sellers};
use crate::store::SearchStore;

/// Result of one search request.
///
/// A failed search still yields an envelope through [`SearchOutcome::into_envelope`]
/// (all lists empty), but callers that care can tell it apart from "no matches".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    Completed(SearchResultEnvelope),
    Failed { error: String },
}

impl SearchOutcome {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, SearchOutcome::Failed { .. })
    }

    #[must_use]
    pub fn into_envelope(self) -> SearchResultEnvelope {
        match self {
            SearchOutcome::Completed(envelope) => envelope,
            SearchOutcome::Failed { .. } => SearchResultEnvelope::empty(),
        }
    }

    #[must_use]
    pub fn envelope(&self) -> SearchResultEnvelope {
        self.clone().into_envelope()
    }
}

/// Normalizes raw parameters and routes them to exactly one composer.
#[derive(Debug)]
pub struct SearchOrchestrator<S> {
    store: S,
}

impl<S: SearchStore> SearchOrchestrator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run a search. Never panics on store failure; failures are logged and
    /// reported as [`SearchOutcome::Failed`].
    pub async fn search(&self, params: &SearchParameters) -> SearchOutcome {
        let cleaned = params.normalized();

        let result = match cleaned.entity_type {
            EntityType::Sellers => compose_sellers(&self.store, &cleaned).await,
            EntityType::Listings => compose_listings(&self.store, &cleaned).await,
            EntityType::Categories => compose_categories(&self.store, &cleaned).await,
            EntityType::ProductTypes => compose_product_types(&self.store, &cleaned).await,
        };

        match result {
            Ok(envelope) => {
                tracing::debug!(
                    entity_type = %cleaned.entity_type,
                    total_results = envelope.total_results,
                    "search completed"
                );
                SearchOutcome::Completed(envelope)
            }
            Err(error) => {
                tracing::error!(
                    error = %error,
                    entity_type = %cleaned.entity_type,
                    "search failed"
                );
                SearchOutcome::Failed {
                    error: error.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use bazaar_core::CategoryRecord;
    use chrono::Utc;

    fn category(id: i64, name: &str) -> CategoryRecord {
        CategoryRecord {
            id,
            name: name.to_string(),
            slug: name.to_lowercase(),
            description: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn dispatches_to_the_requested_entity_only() {
        let store = MemoryStore::new().with_categories(vec![
            category(1, "Garden"),
            category(2, "Furniture"),
        ]);
        let orchestrator = SearchOrchestrator::new(store);

        let envelope = orchestrator
            .search(&SearchParameters {
                entity_type: EntityType::Categories,
                ..SearchParameters::default()
            })
            .await
            .into_envelope();

        let names: Vec<&str> = envelope.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Furniture", "Garden"]);
        assert_eq!(envelope.total_results, 2);
        assert!(envelope.sellers.is_empty());
        assert!(envelope.listings.is_empty());
        assert!(envelope.product_types.is_empty());
    }

    #[tokio::test]
    async fn store_failure_yields_empty_envelope() {
        let store = MemoryStore::new().with_categories(vec![category(1, "Garden")]);
        store.set_failing(true);
        let orchestrator = SearchOrchestrator::new(store);

        let outcome = orchestrator
            .search(&SearchParameters {
                entity_type: EntityType::Categories,
                ..SearchParameters::default()
            })
            .await;

        assert!(outcome.is_failed());
        assert_eq!(outcome.into_envelope(), SearchResultEnvelope::empty());
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(SearchOutcome::Failed {
            error: "boom".to_string(),
        })
        .expect("serialize");
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "boom");
    }
}
