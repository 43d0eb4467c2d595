//! Offline unit tests for bazaar-db pool configuration and row conversions.
//! These tests do not require a live database connection.

use bazaar_core::{AppConfig, Environment, ListingRecord, SellerRecord};
use bazaar_db::{ListingRow, PoolConfig, SellerRow};
use rust_decimal::Decimal;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        catalog_path: PathBuf::from("./config/catalog.yaml"),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        search_cache_ttl_secs: 30,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn seller_row_converts_without_distance() {
    let row = SellerRow {
        id: 3,
        public_id: uuid::Uuid::new_v4(),
        business_name: "Maple Works".to_string(),
        description: None,
        category: Some("Furniture".to_string()),
        product_type: None,
        service_mode: Some("delivery".to_string()),
        latitude: Some(45.5),
        longitude: Some(-73.6),
        created_at: chrono::Utc::now(),
    };

    let record = SellerRecord::from(row);
    assert_eq!(record.id, 3);
    assert_eq!(record.business_name, "Maple Works");
    assert_eq!(record.latitude, Some(45.5));
    assert!(record.distance_from_user.is_none());
}

#[test]
fn listing_row_keeps_price_precision() {
    let row = ListingRow {
        id: 11,
        public_id: uuid::Uuid::new_v4(),
        seller_id: 3,
        title: "Walnut desk".to_string(),
        description: Some("Solid walnut".to_string()),
        price: Decimal::new(14_999, 2),
        category: Some("Furniture".to_string()),
        product_type: None,
        service_mode: None,
        latitude: None,
        longitude: None,
        created_at: chrono::Utc::now(),
    };

    let record = ListingRecord::from(row);
    assert_eq!(record.price.to_string(), "149.99");
    assert_eq!(record.seller_id, 3);
    assert!(record.distance_from_user.is_none());
}
