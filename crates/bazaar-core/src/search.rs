//! Structured search parameters threaded through the whole search pipeline.

use serde::{Deserialize, Deserializer, Serialize};

/// Filter value meaning "no filter applied".
pub const ALL_SENTINEL: &str = "all";

pub const DEFAULT_MIN_PRICE: i64 = 0;
pub const DEFAULT_MAX_PRICE: i64 = 1000;
pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const DEFAULT_MAX_DISTANCE: i64 = 0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Sellers,
    #[default]
    Listings,
    Categories,
    ProductTypes,
}

impl EntityType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Sellers => "sellers",
            EntityType::Listings => "listings",
            EntityType::Categories => "categories",
            EntityType::ProductTypes => "product_types",
        }
    }

    /// Parse the URL spelling; unknown values yield `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sellers" => Some(EntityType::Sellers),
            "listings" => Some(EntityType::Listings),
            "categories" => Some(EntityType::Categories),
            "product_types" => Some(EntityType::ProductTypes),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Relevance,
    Proximity,
    Newest,
    PriceAsc,
    PriceDesc,
}

impl SortBy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::Proximity => "proximity",
            SortBy::Newest => "newest",
            SortBy::PriceAsc => "price_asc",
            SortBy::PriceDesc => "price_desc",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "relevance" => Some(SortBy::Relevance),
            "proximity" => Some(SortBy::Proximity),
            "newest" => Some(SortBy::Newest),
            "price_asc" => Some(SortBy::PriceAsc),
            "price_desc" => Some(SortBy::PriceDesc),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: i64,
    pub max: i64,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_PRICE,
            max: DEFAULT_MAX_PRICE,
        }
    }
}

impl PriceRange {
    /// Lower bound to push to the store, if it constrains anything.
    #[must_use]
    pub fn lower_bound(self) -> Option<i64> {
        (self.min > DEFAULT_MIN_PRICE).then_some(self.min)
    }

    /// Upper bound to push to the store. The default maximum is the top of the
    /// price slider and means "no cap".
    #[must_use]
    pub fn upper_bound(self) -> Option<i64> {
        (self.max != DEFAULT_MAX_PRICE).then_some(self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParameters {
    pub entity_type: EntityType,
    pub free_text_query: Option<String>,
    pub category: Option<String>,
    pub product_type: Option<String>,
    pub service_mode: Option<String>,
    pub price_range: PriceRange,
    pub user_location: Option<Coordinates>,
    /// Radius in kilometers; 0 means unbounded.
    pub max_distance: i64,
    pub sort_by: SortBy,
    pub page: i64,
    pub page_size: i64,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            entity_type: EntityType::default(),
            free_text_query: None,
            category: None,
            product_type: None,
            service_mode: None,
            price_range: PriceRange::default(),
            user_location: None,
            max_distance: DEFAULT_MAX_DISTANCE,
            sort_by: SortBy::default(),
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchParameters {
    /// Copy with sentinel and blank filters stripped and pagination clamped.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            entity_type: self.entity_type,
            free_text_query: normalize_text(self.free_text_query.as_deref()),
            category: normalize_filter(self.category.as_deref()),
            product_type: normalize_filter(self.product_type.as_deref()),
            service_mode: normalize_filter(self.service_mode.as_deref()),
            price_range: self.price_range,
            user_location: self.user_location,
            max_distance: self.max_distance.max(0),
            sort_by: self.sort_by,
            page: self.page.max(1),
            page_size: if self.page_size < 1 {
                DEFAULT_PAGE_SIZE
            } else {
                self.page_size
            },
        }
    }

    /// Ordering actually applied: proximity needs a location to anchor it.
    #[must_use]
    pub fn effective_sort(&self) -> SortBy {
        match (self.sort_by, self.user_location) {
            (SortBy::Proximity, None) => SortBy::Relevance,
            (sort, _) => sort,
        }
    }

    /// Row offset of the first record on the current page, saturating at
    /// `i64::MAX` for page numbers past the addressable range.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.page_size.max(1))
    }

    /// Merge a partial update into these parameters.
    ///
    /// Pagination restarts at page 1 unless the update names a page itself.
    pub fn apply(&mut self, update: &SearchParamsUpdate) {
        if let Some(entity_type) = update.entity_type {
            self.entity_type = entity_type;
        }
        if let Some(q) = &update.free_text_query {
            self.free_text_query.clone_from(q);
        }
        if let Some(category) = &update.category {
            self.category.clone_from(category);
        }
        if let Some(product_type) = &update.product_type {
            self.product_type.clone_from(product_type);
        }
        if let Some(service_mode) = &update.service_mode {
            self.service_mode.clone_from(service_mode);
        }
        if let Some(min) = update.min_price {
            self.price_range.min = min;
        }
        if let Some(max) = update.max_price {
            self.price_range.max = max;
        }
        if let Some(location) = update.user_location {
            self.user_location = location;
            if location.is_none() {
                self.max_distance = DEFAULT_MAX_DISTANCE;
            }
        }
        if let Some(max_distance) = update.max_distance {
            self.max_distance = max_distance;
        }
        if let Some(sort_by) = update.sort_by {
            self.sort_by = sort_by;
        }
        if let Some(page_size) = update.page_size {
            self.page_size = page_size;
        }
        self.page = update.page.unwrap_or(DEFAULT_PAGE);
    }
}

fn normalize_filter(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != ALL_SENTINEL)
        .map(ToOwned::to_owned)
}

fn normalize_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
}

/// A partial [`SearchParameters`].
///
/// `None` means "not mentioned". For clearable fields the inner `Option`
/// distinguishes "set to this value" from "cleared".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParamsUpdate {
    pub entity_type: Option<EntityType>,
    #[serde(deserialize_with = "double_option")]
    pub free_text_query: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub category: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub product_type: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub service_mode: Option<Option<String>>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    #[serde(deserialize_with = "double_option")]
    pub user_location: Option<Option<Coordinates>>,
    pub max_distance: Option<i64>,
    pub sort_by: Option<SortBy>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl SearchParamsUpdate {
    /// This update with `page` pinned to 1 unless it already names a page.
    #[must_use]
    pub fn resetting_page(mut self) -> Self {
        if self.page.is_none() {
            self.page = Some(DEFAULT_PAGE);
        }
        self
    }
}

impl From<&SearchParameters> for SearchParamsUpdate {
    fn from(p: &SearchParameters) -> Self {
        Self {
            entity_type: Some(p.entity_type),
            free_text_query: Some(p.free_text_query.clone()),
            category: Some(p.category.clone()),
            product_type: Some(p.product_type.clone()),
            service_mode: Some(p.service_mode.clone()),
            min_price: Some(p.price_range.min),
            max_price: Some(p.price_range.max),
            user_location: Some(p.user_location),
            max_distance: Some(p.max_distance),
            sort_by: Some(p.sort_by),
            page: Some(p.page),
            page_size: Some(p.page_size),
        }
    }
}

/// Present-but-null deserializes to `Some(None)`; absence falls back to `Default`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
