//! Store-level query descriptions handed to a search backend.
//!
//! These describe what the remote table store should filter, order and page;
//! they carry no geo semantics, which are applied after the fetch.

use thiserror::Error;

/// Server-side ordering the store can apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreOrder {
    /// Primary-key order.
    #[default]
    Natural,
    NewestFirst,
    PriceAsc,
    PriceDesc,
    NameAsc,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SellerQuery {
    pub category: Option<String>,
    pub product_type: Option<String>,
    pub service_mode: Option<String>,
    /// Case-insensitive substring of the business name.
    pub name_contains: Option<String>,
    pub order: StoreOrder,
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub category: Option<String>,
    pub product_type: Option<String>,
    pub service_mode: Option<String>,
    /// Case-insensitive substring of the title.
    pub title_contains: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub order: StoreOrder,
    pub offset: i64,
    pub limit: i64,
}

/// Query over the categories or product types collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub name_contains: Option<String>,
    pub order: StoreOrder,
    pub offset: i64,
    pub limit: i64,
}

/// One page of rows plus the store's count of all matching rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub rows: Vec<T>,
    pub total: i64,
}

impl<T> Default for Fetched<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            total: 0,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store rejected the query: {0}")]
    Rejected(String),
    #[error("store backend failed: {0}")]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Escape `%`, `_` and `\` so user text matches literally inside a `LIKE` pattern.
#[must_use]
pub fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_wraps_and_escapes() {
        assert_eq!(like_pattern("oak"), "%oak%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn default_fetched_is_empty() {
        let fetched: Fetched<i64> = Fetched::default();
        assert!(fetched.rows.is_empty());
        assert_eq!(fetched.total, 0);
    }
}
