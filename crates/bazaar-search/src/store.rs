use async_trait::async_trait;
use bazaar_core::{
    CatalogQuery, CategoryRecord, Fetched, ListingQuery, ListingRecord, ProductTypeRecord,
    SellerQuery, SellerRecord, StoreError,
};
use sqlx::PgPool;

/// Remote table store the composers query.
///
/// Implementations apply the equality, text and range filters, ordering and
/// pagination described by each query, and report the unpaginated match count.
#[async_trait]
pub trait SearchStore: Send + Sync {
    async fn fetch_sellers(
        &self,
        query: &SellerQuery,
    ) -> Result<Fetched<SellerRecord>, StoreError>;

    async fn fetch_listings(
        &self,
        query: &ListingQuery,
    ) -> Result<Fetched<ListingRecord>, StoreError>;

    async fn fetch_categories(
        &self,
        query: &CatalogQuery,
    ) -> Result<Fetched<CategoryRecord>, StoreError>;

    async fn fetch_product_types(
        &self,
        query: &CatalogQuery,
    ) -> Result<Fetched<ProductTypeRecord>, StoreError>;

    /// Cheap reachability probe used by health checks.
    async fn ping(&self) -> Result<(), StoreError>;
}

fn backend(error: bazaar_db::DbError) -> StoreError {
    StoreError::Backend(Box::new(error))
}

#[async_trait]
impl SearchStore for PgPool {
    async fn fetch_sellers(
        &self,
        query: &SellerQuery,
    ) -> Result<Fetched<SellerRecord>, StoreError> {
        bazaar_db::fetch_sellers(self, query).await.map_err(backend)
    }

    async fn fetch_listings(
        &self,
        query: &ListingQuery,
    ) -> Result<Fetched<ListingRecord>, StoreError> {
        bazaar_db::fetch_listings(self, query).await.map_err(backend)
    }

    async fn fetch_categories(
        &self,
        query: &CatalogQuery,
    ) -> Result<Fetched<CategoryRecord>, StoreError> {
        bazaar_db::fetch_categories(self, query)
            .await
            .map_err(backend)
    }

    async fn fetch_product_types(
        &self,
        query: &CatalogQuery,
    ) -> Result<Fetched<ProductTypeRecord>, StoreError> {
        bazaar_db::fetch_product_types(self, query)
            .await
            .map_err(backend)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        bazaar_db::health_check(self).await.map_err(backend)
    }
}
