//! Search result records and the uniform result envelope.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::search::Coordinates;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerRecord {
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
    /// Kilometers from the searching user; derived per request, never stored.
    #[serde(default)]
    pub distance_from_user: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
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
    /// Kilometers from the searching user; derived per request, never stored.
    #[serde(default)]
    pub distance_from_user: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTypeRecord {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Records with a stored position that can be ranked by distance.
pub trait GeoRecord {
    fn location(&self) -> Option<Coordinates>;
    fn distance_from_user(&self) -> Option<f64>;
    fn set_distance_from_user(&mut self, distance: Option<f64>);
}

macro_rules! impl_geo_record {
    ($ty:ty) => {
        impl GeoRecord for $ty {
            fn location(&self) -> Option<Coordinates> {
                match (self.latitude, self.longitude) {
                    (Some(latitude), Some(longitude)) => Some(Coordinates {
                        latitude,
                        longitude,
                    }),
                    _ => None,
                }
            }

            fn distance_from_user(&self) -> Option<f64> {
                self.distance_from_user
            }

            fn set_distance_from_user(&mut self, distance: Option<f64>) {
                self.distance_from_user = distance;
            }
        }
    };
}

impl_geo_record!(SellerRecord);
impl_geo_record!(ListingRecord);

/// Uniform search response: only the list for the requested entity type is populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResultEnvelope {
    pub sellers: Vec<SellerRecord>,
    pub listings: Vec<ListingRecord>,
    pub categories: Vec<CategoryRecord>,
    pub product_types: Vec<ProductTypeRecord>,
    pub total_results: i64,
}

impl SearchResultEnvelope {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no list carries any record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sellers.is_empty()
            && self.listings.is_empty()
            && self.categories.is_empty()
            && self.product_types.is_empty()
    }
}
