use bazaar_core::CatalogFile;
use sqlx::PgPool;

use crate::DbError;

/// Counts of catalog rows upserted by [`seed_catalog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories: usize,
    pub product_types: usize,
}

/// Upsert categories and product types from the catalog file, keyed by slug.
///
/// All upserts run inside a single transaction; if any operation fails
/// the entire batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_catalog(pool: &PgPool, catalog: &CatalogFile) -> Result<SeedSummary, DbError> {
    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();

    for category in &catalog.categories {
        sqlx::query(
            "INSERT INTO categories (name, slug, description) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (slug) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 description = EXCLUDED.description, \
                 updated_at = NOW()",
        )
        .bind(&category.name)
        .bind(category.slug())
        .bind(&category.description)
        .execute(&mut *tx)
        .await?;
        summary.categories += 1;
    }

    for product_type in &catalog.product_types {
        sqlx::query(
            "INSERT INTO product_types (name, slug, description) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (slug) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 description = EXCLUDED.description, \
                 updated_at = NOW()",
        )
        .bind(&product_type.name)
        .bind(product_type.slug())
        .bind(&product_type.description)
        .execute(&mut *tx)
        .await?;
        summary.product_types += 1;
    }

    tx.commit().await?;
    tracing::info!(
        categories = summary.categories,
        product_types = summary.product_types,
        "catalog seeded"
    );
    Ok(summary)
}
