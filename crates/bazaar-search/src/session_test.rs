use std::sync::Arc;
use std::time::Duration;

use bazaar_core::{
    CatalogQuery, CategoryRecord, Coordinates, EntityType, Fetched, ListingQuery, ListingRecord,
    ProductTypeRecord, SellerQuery, SellerRecord, StoreError,
};
use chrono::Utc;
use tokio::sync::Notify;

use super::*;
use crate::memory::MemoryStore;

fn category(id: i64, name: &str) -> CategoryRecord {
    CategoryRecord {
        id,
        name: name.to_string(),
        slug: name.to_lowercase().replace(' ', "-"),
        description: None,
        created_at: Utc::now(),
    }
}

fn catalog_store() -> MemoryStore {
    MemoryStore::new().with_categories(vec![
        category(1, "Slow lane"),
        category(2, "Fast lane"),
        category(3, "Garden"),
    ])
}

fn session_over<S: SearchStore>(store: S, query: &str) -> SearchSession<S> {
    SearchSession::from_query_string(
        Arc::new(SearchOrchestrator::new(store)),
        Arc::new(SearchCache::new(Duration::from_secs(30))),
        query,
    )
}

fn names(envelope: &SearchResultEnvelope) -> Vec<&str> {
    envelope.categories.iter().map(|c| c.name.as_str()).collect()
}

/// Holds catalog fetches whose text filter is `slow` until released.
struct GatedStore {
    inner: MemoryStore,
    gate: Notify,
}

#[async_trait::async_trait]
impl SearchStore for GatedStore {
    async fn fetch_sellers(
        &self,
        query: &SellerQuery,
    ) -> Result<Fetched<SellerRecord>, StoreError> {
        self.inner.fetch_sellers(query).await
    }

    async fn fetch_listings(
        &self,
        query: &ListingQuery,
    ) -> Result<Fetched<ListingRecord>, StoreError> {
        self.inner.fetch_listings(query).await
    }

    async fn fetch_categories(
        &self,
        query: &CatalogQuery,
    ) -> Result<Fetched<CategoryRecord>, StoreError> {
        if query.name_contains.as_deref() == Some("slow") {
            self.gate.notified().await;
        }
        self.inner.fetch_categories(query).await
    }

    async fn fetch_product_types(
        &self,
        query: &CatalogQuery,
    ) -> Result<Fetched<ProductTypeRecord>, StoreError> {
        self.inner.fetch_product_types(query).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }
}

#[test]
fn session_starts_from_the_url() {
    let session = session_over(
        MemoryStore::new(),
        "?type=sellers&category=Furniture&page=3&lat=40.7&lng=-74&distance=25",
    );

    let params = session.params();
    assert_eq!(params.entity_type, EntityType::Sellers);
    assert_eq!(params.category.as_deref(), Some("Furniture"));
    assert_eq!(params.page, 3);
    assert_eq!(params.max_distance, 25);
    assert_eq!(
        session.query_string(),
        "type=sellers&category=Furniture&page=3&lat=40.7&lng=-74&distance=25"
    );
}

#[test]
fn filter_change_resets_pagination() {
    let mut session = session_over(MemoryStore::new(), "category=Garden&page=3");

    session.update(SearchParamsUpdate {
        category: Some(Some("Furniture".to_string())),
        ..SearchParamsUpdate::default()
    });

    assert_eq!(session.params().page, 1);
    assert_eq!(session.params().category.as_deref(), Some("Furniture"));
    assert_eq!(session.query_string(), "category=Furniture");
}

#[test]
fn explicit_page_is_kept() {
    let mut session = session_over(MemoryStore::new(), "category=Garden");

    session.update(SearchParamsUpdate {
        page: Some(4),
        ..SearchParamsUpdate::default()
    });

    assert_eq!(session.params().page, 4);
    assert_eq!(session.query_string(), "category=Garden&page=4");
}

#[test]
fn clearing_location_drops_distance_from_url_and_params() {
    let mut session = session_over(MemoryStore::new(), "q=lamp&lat=1.5&lng=2&distance=10");

    session.update(SearchParamsUpdate {
        user_location: Some(None),
        ..SearchParamsUpdate::default()
    });

    assert_eq!(session.params().user_location, None);
    assert_eq!(session.params().max_distance, 0);
    assert_eq!(session.query_string(), "q=lamp");
}

#[test]
fn setting_location_appends_coordinates() {
    let mut session = session_over(MemoryStore::new(), "type=sellers");

    let request = session.update(SearchParamsUpdate {
        user_location: Some(Some(Coordinates {
            latitude: 51.5,
            longitude: -0.12,
        })),
        max_distance: Some(5),
        ..SearchParamsUpdate::default()
    });

    assert_eq!(
        session.query_string(),
        "type=sellers&distance=5&lat=51.5&lng=-0.12"
    );
    assert_eq!(request.params(), session.params());
}

#[test]
fn params_always_match_a_reload_of_the_url() {
    let mut session = session_over(MemoryStore::new(), "distance=30&q=lamp");
    assert_eq!(session.params().max_distance, 0);

    let updates = [
        SearchParamsUpdate {
            user_location: Some(Some(Coordinates {
                latitude: 1.0,
                longitude: 2.0,
            })),
            ..SearchParamsUpdate::default()
        },
        SearchParamsUpdate {
            max_distance: Some(12),
            sort_by: Some(bazaar_core::SortBy::Proximity),
            ..SearchParamsUpdate::default()
        },
        SearchParamsUpdate {
            free_text_query: Some(Some(String::new())),
            page: Some(3),
            ..SearchParamsUpdate::default()
        },
        SearchParamsUpdate {
            user_location: Some(None),
            ..SearchParamsUpdate::default()
        },
    ];

    for update in updates {
        session.update(update);
        assert_eq!(decode(session.query_string()), *session.params());
    }
    assert_eq!(session.params().max_distance, 0);
}

#[test]
fn new_location_revives_a_carried_distance() {
    let mut session = session_over(MemoryStore::new(), "distance=30&q=lamp");

    session.update(SearchParamsUpdate {
        user_location: Some(Some(Coordinates {
            latitude: 1.0,
            longitude: 2.0,
        })),
        ..SearchParamsUpdate::default()
    });

    assert_eq!(session.query_string(), "distance=30&q=lamp&lat=1&lng=2");
    assert_eq!(session.params().max_distance, 30);
}

#[tokio::test]
async fn loading_until_the_request_completes() {
    let session = session_over(catalog_store(), "type=categories&q=garden");

    assert!(session.is_loading().await);
    assert!(session.results().await.is_empty());

    let outcome = session.request().run().await;

    assert!(!session.is_loading().await);
    assert_eq!(session.outcome().await, Some(outcome));
    assert_eq!(names(&session.results().await), vec!["Garden"]);
}

#[tokio::test]
async fn repeated_parameters_share_one_fetch() {
    let mut session = session_over(catalog_store(), "type=categories");

    session.request().run().await;
    session
        .update(SearchParamsUpdate {
            free_text_query: Some(Some("lane".to_string())),
            ..SearchParamsUpdate::default()
        })
        .run()
        .await;
    session
        .update(SearchParamsUpdate {
            free_text_query: Some(None),
            ..SearchParamsUpdate::default()
        })
        .run()
        .await;

    assert_eq!(session.query_string(), "type=categories");
    assert_eq!(session.orchestrator.store().fetch_count(), 2);
    assert_eq!(session.results().await.total_results, 3);
}

#[test]
fn equivalent_urls_map_to_one_request_key() {
    let plain = session_over(MemoryStore::new(), "type=categories");
    let noisy = session_over(
        MemoryStore::new(),
        "category=all&type=categories&page=1&sort=relevance",
    );

    assert_eq!(plain.request().key(), noisy.request().key());
}

#[tokio::test]
async fn slow_stale_response_does_not_replace_newer_results() {
    let store = GatedStore {
        inner: catalog_store(),
        gate: Notify::new(),
    };
    let mut session = session_over(store, "type=categories&q=slow");

    let stale = tokio::spawn(session.request().run());

    let fresh = session.update(SearchParamsUpdate {
        free_text_query: Some(Some("fast".to_string())),
        ..SearchParamsUpdate::default()
    });
    fresh.run().await;
    assert_eq!(names(&session.results().await), vec!["Fast lane"]);

    session.orchestrator.store().gate.notify_one();
    let stale_outcome = stale.await.expect("stale request task");
    assert_eq!(names(&stale_outcome.envelope()), vec!["Slow lane"]);

    assert_eq!(session.query_string(), "type=categories&q=fast");
    assert_eq!(names(&session.results().await), vec!["Fast lane"]);
}

#[tokio::test]
async fn failed_search_reports_empty_results() {
    let store = catalog_store();
    store.set_failing(true);
    let session = session_over(store, "type=categories");

    let outcome = session.request().run().await;

    assert!(outcome.is_failed());
    assert!(!session.is_loading().await);
    assert_eq!(session.results().await, SearchResultEnvelope::empty());
}
