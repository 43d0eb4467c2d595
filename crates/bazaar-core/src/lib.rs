pub mod app_config;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod geo;
pub mod records;
pub mod search;
pub mod store;

pub use app_config::{AppConfig, Environment};
pub use catalog::{load_catalog, CatalogEntry, CatalogFile};
pub use codec::{decode, encode};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{distance, DistanceUnit};
pub use records::{
    CategoryRecord, ListingRecord, ProductTypeRecord, SearchResultEnvelope, SellerRecord,
};
pub use search::{
    Coordinates, EntityType, PriceRange, SearchParameters, SearchParamsUpdate, SortBy,
    ALL_SENTINEL,
};
pub use store::{CatalogQuery, Fetched, ListingQuery, SellerQuery, StoreError, StoreOrder};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
