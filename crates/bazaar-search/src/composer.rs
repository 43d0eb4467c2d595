//! Per-entity query composers.
//!
//! Each composer expects parameters that already went through
//! [`SearchParameters::normalized`]. Store errors propagate unchanged.

use std::cmp::Ordering;

use bazaar_core::records::GeoRecord;
use bazaar_core::{
    distance, CatalogQuery, DistanceUnit, Fetched, ListingQuery, SearchParameters,
    SearchResultEnvelope, SellerQuery, SortBy, StoreError, StoreOrder,
};

use crate::store::SearchStore;

/// Approved sellers. Price bounds and price orderings do not apply.
///
/// # Errors
///
/// Returns the store's error if the fetch fails.
pub async fn compose_sellers<S: SearchStore>(
    store: &S,
    params: &SearchParameters,
) -> Result<SearchResultEnvelope, StoreError> {
    let query = SellerQuery {
        category: params.category.clone(),
        product_type: params.product_type.clone(),
        service_mode: params.service_mode.clone(),
        name_contains: params.free_text_query.clone(),
        order: match params.effective_sort() {
            SortBy::Newest => StoreOrder::NewestFirst,
            _ => StoreOrder::Natural,
        },
        offset: params.offset(),
        limit: params.page_size,
    };

    let ranked = rank_by_distance(store.fetch_sellers(&query).await?, params);

    Ok(SearchResultEnvelope {
        sellers: ranked.rows,
        total_results: ranked.total,
        ..SearchResultEnvelope::empty()
    })
}

/// Published listings, including price bounds and price orderings.
///
/// # Errors
///
/// Returns the store's error if the fetch fails.
pub async fn compose_listings<S: SearchStore>(
    store: &S,
    params: &SearchParameters,
) -> Result<SearchResultEnvelope, StoreError> {
    let query = ListingQuery {
        category: params.category.clone(),
        product_type: params.product_type.clone(),
        service_mode: params.service_mode.clone(),
        title_contains: params.free_text_query.clone(),
        min_price: params.price_range.lower_bound(),
        max_price: params.price_range.upper_bound(),
        order: match params.effective_sort() {
            SortBy::Newest => StoreOrder::NewestFirst,
            SortBy::PriceAsc => StoreOrder::PriceAsc,
            SortBy::PriceDesc => StoreOrder::PriceDesc,
            SortBy::Relevance | SortBy::Proximity => StoreOrder::Natural,
        },
        offset: params.offset(),
        limit: params.page_size,
    };

    let ranked = rank_by_distance(store.fetch_listings(&query).await?, params);

    Ok(SearchResultEnvelope {
        listings: ranked.rows,
        total_results: ranked.total,
        ..SearchResultEnvelope::empty()
    })
}

/// Categories by name, optionally text filtered.
///
/// # Errors
///
/// Returns the store's error if the fetch fails.
pub async fn compose_categories<S: SearchStore>(
    store: &S,
    params: &SearchParameters,
) -> Result<SearchResultEnvelope, StoreError> {
    let fetched = store.fetch_categories(&catalog_query(params)).await?;

    Ok(SearchResultEnvelope {
        categories: fetched.rows,
        total_results: fetched.total,
        ..SearchResultEnvelope::empty()
    })
}

/// Product types by name, optionally text filtered.
///
/// # Errors
///
/// Returns the store's error if the fetch fails.
pub async fn compose_product_types<S: SearchStore>(
    store: &S,
    params: &SearchParameters,
) -> Result<SearchResultEnvelope, StoreError> {
    let fetched = store.fetch_product_types(&catalog_query(params)).await?;

    Ok(SearchResultEnvelope {
        product_types: fetched.rows,
        total_results: fetched.total,
        ..SearchResultEnvelope::empty()
    })
}

fn catalog_query(params: &SearchParameters) -> CatalogQuery {
    CatalogQuery {
        name_contains: params.free_text_query.clone(),
        order: match params.effective_sort() {
            SortBy::Newest => StoreOrder::NewestFirst,
            _ => StoreOrder::NameAsc,
        },
        offset: params.offset(),
        limit: params.page_size,
    }
}

/// Attach `distance_from_user`, apply the distance cutoff and proximity sort.
///
/// Runs on the fetched page only. With a cutoff active the total is the number
/// of rows kept on this page, so pagination past a cutoff is approximate.
#[allow(clippy::cast_precision_loss)]
fn rank_by_distance<T: GeoRecord>(fetched: Fetched<T>, params: &SearchParameters) -> Fetched<T> {
    let Some(origin) = params.user_location else {
        return fetched;
    };

    let mut rows = fetched.rows;
    for row in &mut rows {
        let d = row
            .location()
            .map(|location| distance(origin, location, DistanceUnit::Kilometers));
        row.set_distance_from_user(d);
    }

    let mut total = fetched.total;
    if params.max_distance > 0 {
        let radius = params.max_distance as f64;
        rows.retain(|row| row.distance_from_user().is_some_and(|d| d <= radius));
        total = i64::try_from(rows.len()).unwrap_or(i64::MAX);
    }

    if params.effective_sort() == SortBy::Proximity {
        rows.sort_by(|a, b| nulls_last(a.distance_from_user(), b.distance_from_user()));
    }

    Fetched { rows, total }
}

fn nulls_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
#[path = "composer_test.rs"]
mod tests;
