//! Filtered, ordered, paginated reads backing marketplace search.
//!
//! Each fetch returns one page of rows plus the count of every row matching
//! the same predicate. Distance ranking is not done here.

use bazaar_core::store::like_pattern;
use bazaar_core::{
    CatalogQuery, CategoryRecord, Fetched, ListingQuery, ListingRecord, ProductTypeRecord,
    SellerQuery, SellerRecord, StoreOrder,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

const SELLER_COLUMNS: &str = "s.id, s.public_id, s.business_name, s.description, \
     s.category, s.product_type, s.service_mode, s.latitude, s.longitude, s.created_at";

const SELLER_PREDICATE: &str = "s.status = 'approved' \
     AND ($1::TEXT IS NULL OR s.category = $1) \
     AND ($2::TEXT IS NULL OR s.product_type = $2) \
     AND ($3::TEXT IS NULL OR s.service_mode = $3) \
     AND ($4::TEXT IS NULL OR s.business_name ILIKE $4)";

const LISTING_COLUMNS: &str = "l.id, l.public_id, l.seller_id, l.title, l.description, \
     l.price, l.category, l.product_type, l.service_mode, l.latitude, l.longitude, \
     l.created_at";

const LISTING_PREDICATE: &str = "l.status = 'published' \
     AND ($1::TEXT IS NULL OR l.category = $1) \
     AND ($2::TEXT IS NULL OR l.product_type = $2) \
     AND ($3::TEXT IS NULL OR l.service_mode = $3) \
     AND ($4::TEXT IS NULL OR l.title ILIKE $4) \
     AND ($5::BIGINT IS NULL OR l.price >= $5) \
     AND ($6::BIGINT IS NULL OR l.price <= $6)";

const CATALOG_PREDICATE: &str = "($1::TEXT IS NULL OR c.name ILIKE $1)";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SellerRow {
    pub id: i64,
    pub public_id: Uuid,
    pub business_name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub product_type: Option<String>,
    pub service_mode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl From<SellerRow> for SellerRecord {
    fn from(row: SellerRow) -> Self {
        Self {
            id: row.id,
            public_id: row.public_id,
            business_name: row.business_name,
            description: row.description,
            category: row.category,
            product_type: row.product_type,
            service_mode: row.service_mode,
            latitude: row.latitude,
            longitude: row.longitude,
            created_at: row.created_at,
            distance_from_user: None,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ListingRow {
    pub id: i64,
    pub public_id: Uuid,
    pub seller_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Option<String>,
    pub product_type: Option<String>,
    pub service_mode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl From<ListingRow> for ListingRecord {
    fn from(row: ListingRow) -> Self {
        Self {
            id: row.id,
            public_id: row.public_id,
            seller_id: row.seller_id,
            title: row.title,
            description: row.description,
            price: row.price,
            category: row.category,
            product_type: row.product_type,
            service_mode: row.service_mode,
            latitude: row.latitude,
            longitude: row.longitude,
            created_at: row.created_at,
            distance_from_user: None,
        }
    }
}

/// A row from either `categories` or `product_types`; both share one shape.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CatalogRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CatalogRow> for CategoryRecord {
    fn from(row: CatalogRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

impl From<CatalogRow> for ProductTypeRecord {
    fn from(row: CatalogRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

/// Render an `ORDER BY` body. Every ordering ends on the primary key so pages are stable.
///
/// `has_price` is false for tables without a `price` column; price orderings
/// then degrade to natural order.
fn order_clause(order: StoreOrder, alias: &str, name_column: &str, has_price: bool) -> String {
    match order {
        StoreOrder::NewestFirst => format!("{alias}.created_at DESC, {alias}.id DESC"),
        StoreOrder::PriceAsc if has_price => format!("{alias}.price ASC, {alias}.id ASC"),
        StoreOrder::PriceDesc if has_price => format!("{alias}.price DESC, {alias}.id ASC"),
        StoreOrder::NameAsc => format!("{alias}.{name_column} ASC, {alias}.id ASC"),
        StoreOrder::Natural | StoreOrder::PriceAsc | StoreOrder::PriceDesc => {
            format!("{alias}.id ASC")
        }
    }
}

/// Fetch one page of approved sellers.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either query fails.
pub async fn fetch_sellers(
    pool: &PgPool,
    query: &SellerQuery,
) -> Result<Fetched<SellerRecord>, DbError> {
    let pattern = query.name_contains.as_deref().map(like_pattern);
    let sql = format!(
        "SELECT {SELLER_COLUMNS} FROM sellers s WHERE {SELLER_PREDICATE} \
         ORDER BY {} LIMIT $5 OFFSET $6",
        order_clause(query.order, "s", "business_name", false)
    );

    let rows = sqlx::query_as::<_, SellerRow>(&sql)
        .bind(query.category.as_deref())
        .bind(query.product_type.as_deref())
        .bind(query.service_mode.as_deref())
        .bind(pattern.as_deref())
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(pool)
        .await?;

    let count_sql = format!("SELECT COUNT(*) FROM sellers s WHERE {SELLER_PREDICATE}");
    let total = sqlx::query_scalar::<_, i64>(&count_sql)
        .bind(query.category.as_deref())
        .bind(query.product_type.as_deref())
        .bind(query.service_mode.as_deref())
        .bind(pattern.as_deref())
        .fetch_one(pool)
        .await?;

    Ok(Fetched {
        rows: rows.into_iter().map(SellerRecord::from).collect(),
        total,
    })
}

/// Fetch one page of published listings.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either query fails.
pub async fn fetch_listings(
    pool: &PgPool,
    query: &ListingQuery,
) -> Result<Fetched<ListingRecord>, DbError> {
    let pattern = query.title_contains.as_deref().map(like_pattern);
    let sql = format!(
        "SELECT {LISTING_COLUMNS} FROM listings l WHERE {LISTING_PREDICATE} \
         ORDER BY {} LIMIT $7 OFFSET $8",
        order_clause(query.order, "l", "title", true)
    );

    let rows = sqlx::query_as::<_, ListingRow>(&sql)
        .bind(query.category.as_deref())
        .bind(query.product_type.as_deref())
        .bind(query.service_mode.as_deref())
        .bind(pattern.as_deref())
        .bind(query.min_price)
        .bind(query.max_price)
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(pool)
        .await?;

    let count_sql = format!("SELECT COUNT(*) FROM listings l WHERE {LISTING_PREDICATE}");
    let total = sqlx::query_scalar::<_, i64>(&count_sql)
        .bind(query.category.as_deref())
        .bind(query.product_type.as_deref())
        .bind(query.service_mode.as_deref())
        .bind(pattern.as_deref())
        .bind(query.min_price)
        .bind(query.max_price)
        .fetch_one(pool)
        .await?;

    Ok(Fetched {
        rows: rows.into_iter().map(ListingRecord::from).collect(),
        total,
    })
}

/// Fetch one page of categories.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either query fails.
pub async fn fetch_categories(
    pool: &PgPool,
    query: &CatalogQuery,
) -> Result<Fetched<CategoryRecord>, DbError> {
    let fetched = fetch_catalog(pool, "categories", query).await?;
    Ok(Fetched {
        rows: fetched.rows.into_iter().map(CategoryRecord::from).collect(),
        total: fetched.total,
    })
}

/// Fetch one page of product types.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either query fails.
pub async fn fetch_product_types(
    pool: &PgPool,
    query: &CatalogQuery,
) -> Result<Fetched<ProductTypeRecord>, DbError> {
    let fetched = fetch_catalog(pool, "product_types", query).await?;
    Ok(Fetched {
        rows: fetched.rows.into_iter().map(ProductTypeRecord::from).collect(),
        total: fetched.total,
    })
}

/// `table` is one of the two fixed catalog table names, never user input.
async fn fetch_catalog(
    pool: &PgPool,
    table: &'static str,
    query: &CatalogQuery,
) -> Result<Fetched<CatalogRow>, DbError> {
    let pattern = query.name_contains.as_deref().map(like_pattern);
    let sql = format!(
        "SELECT c.id, c.name, c.slug, c.description, c.created_at \
         FROM {table} c WHERE {CATALOG_PREDICATE} \
         ORDER BY {} LIMIT $2 OFFSET $3",
        order_clause(query.order, "c", "name", false)
    );

    let rows = sqlx::query_as::<_, CatalogRow>(&sql)
        .bind(pattern.as_deref())
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(pool)
        .await?;

    let count_sql = format!("SELECT COUNT(*) FROM {table} c WHERE {CATALOG_PREDICATE}");
    let total = sqlx::query_scalar::<_, i64>(&count_sql)
        .bind(pattern.as_deref())
        .fetch_one(pool)
        .await?;

    Ok(Fetched { rows, total })
}
