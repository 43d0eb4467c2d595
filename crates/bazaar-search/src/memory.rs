//! In-memory [`SearchStore`] over fixed record sets.
//!
//! Rows handed to the store are treated as already visible (approved sellers,
//! published listings). Counts every fetch so callers can observe caching.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use bazaar_core::{
    CatalogQuery, CategoryRecord, Fetched, ListingQuery, ListingRecord, ProductTypeRecord,
    SellerQuery, SellerRecord, StoreError, StoreOrder,
};
use rust_decimal::Decimal;

use crate::store::SearchStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    pub sellers: Vec<SellerRecord>,
    pub listings: Vec<ListingRecord>,
    pub categories: Vec<CategoryRecord>,
    pub product_types: Vec<ProductTypeRecord>,
    failing: AtomicBool,
    fetches: AtomicUsize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_sellers(mut self, sellers: Vec<SellerRecord>) -> Self {
        self.sellers = sellers;
        self
    }

    #[must_use]
    pub fn with_listings(mut self, listings: Vec<ListingRecord>) -> Self {
        self.listings = listings;
        self
    }

    #[must_use]
    pub fn with_categories(mut self, categories: Vec<CategoryRecord>) -> Self {
        self.categories = categories;
        self
    }

    #[must_use]
    pub fn with_product_types(mut self, product_types: Vec<ProductTypeRecord>) -> Self {
        self.product_types = product_types;
        self
    }

    /// Make every subsequent fetch fail with [`StoreError::Rejected`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of fetches issued so far, failed ones included.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn begin_fetch(&self) -> Result<(), StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected("memory store set to fail".to_string()));
        }
        Ok(())
    }
}

fn eq_filter(wanted: Option<&str>, actual: Option<&str>) -> bool {
    wanted.is_none_or(|w| actual == Some(w))
}

fn contains_ci(wanted: Option<&str>, haystack: &str) -> bool {
    wanted.is_none_or(|w| haystack.to_lowercase().contains(&w.to_lowercase()))
}

fn paginate<T>(rows: Vec<T>, offset: i64, limit: i64) -> Fetched<T> {
    let total = i64::try_from(rows.len()).unwrap_or(i64::MAX);
    let rows = rows
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(0))
        .take(usize::try_from(limit).unwrap_or(0))
        .collect();
    Fetched { rows, total }
}

#[async_trait]
impl SearchStore for MemoryStore {
    async fn fetch_sellers(
        &self,
        query: &SellerQuery,
    ) -> Result<Fetched<SellerRecord>, StoreError> {
        self.begin_fetch()?;
        let mut rows: Vec<SellerRecord> = self
            .sellers
            .iter()
            .filter(|s| eq_filter(query.category.as_deref(), s.category.as_deref()))
            .filter(|s| eq_filter(query.product_type.as_deref(), s.product_type.as_deref()))
            .filter(|s| eq_filter(query.service_mode.as_deref(), s.service_mode.as_deref()))
            .filter(|s| contains_ci(query.name_contains.as_deref(), &s.business_name))
            .cloned()
            .collect();

        match query.order {
            StoreOrder::NewestFirst => {
                rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            }
            StoreOrder::NameAsc => {
                rows.sort_by(|a, b| a.business_name.cmp(&b.business_name).then(a.id.cmp(&b.id)));
            }
            StoreOrder::Natural | StoreOrder::PriceAsc | StoreOrder::PriceDesc => {
                rows.sort_by_key(|s| s.id);
            }
        }

        Ok(paginate(rows, query.offset, query.limit))
    }

    async fn fetch_listings(
        &self,
        query: &ListingQuery,
    ) -> Result<Fetched<ListingRecord>, StoreError> {
        self.begin_fetch()?;
        let mut rows: Vec<ListingRecord> = self
            .listings
            .iter()
            .filter(|l| eq_filter(query.category.as_deref(), l.category.as_deref()))
            .filter(|l| eq_filter(query.product_type.as_deref(), l.product_type.as_deref()))
            .filter(|l| eq_filter(query.service_mode.as_deref(), l.service_mode.as_deref()))
            .filter(|l| contains_ci(query.title_contains.as_deref(), &l.title))
            .filter(|l| query.min_price.is_none_or(|min| l.price >= Decimal::from(min)))
            .filter(|l| query.max_price.is_none_or(|max| l.price <= Decimal::from(max)))
            .cloned()
            .collect();

        match query.order {
            StoreOrder::NewestFirst => {
                rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            }
            StoreOrder::PriceAsc => {
                rows.sort_by(|a, b| a.price.cmp(&b.price).then(a.id.cmp(&b.id)));
            }
            StoreOrder::PriceDesc => {
                rows.sort_by(|a, b| b.price.cmp(&a.price).then(a.id.cmp(&b.id)));
            }
            StoreOrder::NameAsc => rows.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id))),
            StoreOrder::Natural => rows.sort_by_key(|l| l.id),
        }

        Ok(paginate(rows, query.offset, query.limit))
    }

    async fn fetch_categories(
        &self,
        query: &CatalogQuery,
    ) -> Result<Fetched<CategoryRecord>, StoreError> {
        self.begin_fetch()?;
        let mut rows: Vec<CategoryRecord> = self
            .categories
            .iter()
            .filter(|c| contains_ci(query.name_contains.as_deref(), &c.name))
            .cloned()
            .collect();
        match query.order {
            StoreOrder::NewestFirst => {
                rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            }
            StoreOrder::NameAsc => rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id))),
            _ => rows.sort_by_key(|c| c.id),
        }
        Ok(paginate(rows, query.offset, query.limit))
    }

    async fn fetch_product_types(
        &self,
        query: &CatalogQuery,
    ) -> Result<Fetched<ProductTypeRecord>, StoreError> {
        self.begin_fetch()?;
        let mut rows: Vec<ProductTypeRecord> = self
            .product_types
            .iter()
            .filter(|p| contains_ci(query.name_contains.as_deref(), &p.name))
            .cloned()
            .collect();
        match query.order {
            StoreOrder::NewestFirst => {
                rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            }
            StoreOrder::NameAsc => rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id))),
            _ => rows.sort_by_key(|p| p.id),
        }
        Ok(paginate(rows, query.offset, query.limit))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected("memory store set to fail".to_string()));
        }
        Ok(())
    }
}
