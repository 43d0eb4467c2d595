use super::*;
use crate::search::PriceRange;

fn location(latitude: f64, longitude: f64) -> Coordinates {
    Coordinates {
        latitude,
        longitude,
    }
}

#[test]
fn decode_empty_yields_defaults() {
    assert_eq!(decode(""), SearchParameters::default());
    assert_eq!(decode("?"), SearchParameters::default());
}

#[test]
fn decode_reads_every_key() {
    let p = decode(
        "?type=sellers&q=oak+table&category=Furniture&product_type=handmade&mode=delivery\
         &minPrice=10&maxPrice=200&lat=37.77&lng=-122.41&distance=25&sort=proximity&page=2&limit=20",
    );
    assert_eq!(p.entity_type, EntityType::Sellers);
    assert_eq!(p.free_text_query.as_deref(), Some("oak table"));
    assert_eq!(p.category.as_deref(), Some("Furniture"));
    assert_eq!(p.product_type.as_deref(), Some("handmade"));
    assert_eq!(p.service_mode.as_deref(), Some("delivery"));
    assert_eq!(p.price_range, PriceRange { min: 10, max: 200 });
    assert_eq!(p.user_location, Some(location(37.77, -122.41)));
    assert_eq!(p.max_distance, 25);
    assert_eq!(p.sort_by, SortBy::Proximity);
    assert_eq!(p.page, 2);
    assert_eq!(p.page_size, 20);
}

#[test]
fn decode_percent_encoded_values() {
    let p = decode("q=caf%C3%A9%20au%20lait&category=Arts%20%26%20Crafts");
    assert_eq!(p.free_text_query.as_deref(), Some("café au lait"));
    assert_eq!(p.category.as_deref(), Some("Arts & Crafts"));
}

#[test]
fn decode_malformed_numbers_fall_back() {
    let p = decode("page=abc&limit=&minPrice=--4&maxPrice=x1");
    assert_eq!(p.page, 1);
    assert_eq!(p.page_size, 10);
    assert_eq!(p.price_range, PriceRange::default());
}

#[test]
fn decode_integer_prefix_like_parse_int() {
    let p = decode("page=3abc&limit=25.9&maxPrice=+300");
    assert_eq!(p.page, 3);
    assert_eq!(p.page_size, 25);
    assert_eq!(p.price_range.max, 300);
}

#[test]
fn decode_distance_requires_full_location() {
    let p = decode("lat=10.5&distance=30");
    assert!(p.user_location.is_none());
    assert_eq!(p.max_distance, 0);

    let p = decode("lat=10.5&lng=nope&distance=30");
    assert!(p.user_location.is_none());
    assert_eq!(p.max_distance, 0);
}

#[test]
fn decode_unknown_enums_fall_back() {
    let p = decode("type=widgets&sort=cheapest");
    assert_eq!(p.entity_type, EntityType::Listings);
    assert_eq!(p.sort_by, SortBy::Relevance);
}

#[test]
fn decode_first_duplicate_wins() {
    let p = decode("q=first&q=second");
    assert_eq!(p.free_text_query.as_deref(), Some("first"));
}

#[test]
fn encode_omits_defaults() {
    let update = SearchParamsUpdate::from(&SearchParameters::default());
    assert_eq!(encode(&update, ""), "");
}

#[test]
fn encode_carries_untouched_keys_forward() {
    let update = SearchParamsUpdate {
        sort_by: Some(SortBy::Newest),
        ..SearchParamsUpdate::default()
    };
    assert_eq!(
        encode(&update, "?q=lamp&utm_source=mail"),
        "q=lamp&utm_source=mail&sort=newest"
    );
}

#[test]
fn encode_replaces_existing_value_in_place() {
    let update = SearchParamsUpdate {
        category: Some(Some("Garden".to_string())),
        ..SearchParamsUpdate::default()
    };
    assert_eq!(
        encode(&update, "category=Furniture&page=3&category=Toys"),
        "category=Garden&page=3"
    );
}

#[test]
fn encode_deletes_keys_reset_to_default() {
    let update = SearchParamsUpdate {
        sort_by: Some(SortBy::Relevance),
        min_price: Some(0),
        category: Some(Some("all".to_string())),
        page: Some(1),
        ..SearchParamsUpdate::default()
    };
    assert_eq!(
        encode(&update, "sort=newest&minPrice=5&category=Toys&page=4&q=x"),
        "q=x"
    );
}

#[test]
fn encode_clearing_location_drops_distance() {
    let update = SearchParamsUpdate {
        user_location: Some(None),
        ..SearchParamsUpdate::default()
    };
    assert_eq!(
        encode(&update, "lat=1.5&lng=2.5&distance=10&q=bike"),
        "q=bike"
    );
}

#[test]
fn encode_escapes_reserved_characters() {
    let update = SearchParamsUpdate {
        free_text_query: Some(Some("tables & chairs".to_string())),
        ..SearchParamsUpdate::default()
    };
    let encoded = encode(&update, "");
    assert_eq!(encoded, "q=tables%20%26%20chairs");
    assert_eq!(
        decode(&encoded).free_text_query.as_deref(),
        Some("tables & chairs")
    );
}

#[test]
fn round_trip_non_default_parameters() {
    let p = SearchParameters {
        entity_type: EntityType::Sellers,
        free_text_query: Some("vintage lamp".to_string()),
        category: Some("Home & Garden".to_string()),
        product_type: Some("handmade".to_string()),
        service_mode: Some("pickup".to_string()),
        price_range: PriceRange { min: 15, max: 450 },
        user_location: Some(location(-33.8688, 151.2093)),
        max_distance: 40,
        sort_by: SortBy::PriceDesc,
        page: 5,
        page_size: 25,
    };
    let encoded = encode(&SearchParamsUpdate::from(&p), "");
    assert_eq!(decode(&encoded), p);
}

#[test]
fn round_trip_default_parameters() {
    let p = SearchParameters::default();
    let encoded = encode(&SearchParamsUpdate::from(&p), "");
    assert_eq!(decode(&encoded), p);
}

#[test]
fn round_trip_each_entity_and_sort() {
    for entity_type in [
        EntityType::Sellers,
        EntityType::Listings,
        EntityType::Categories,
        EntityType::ProductTypes,
    ] {
        for sort_by in [
            SortBy::Relevance,
            SortBy::Proximity,
            SortBy::Newest,
            SortBy::PriceAsc,
            SortBy::PriceDesc,
        ] {
            let p = SearchParameters {
                entity_type,
                sort_by,
                ..SearchParameters::default()
            };
            let encoded = encode(&SearchParamsUpdate::from(&p), "");
            assert_eq!(decode(&encoded), p, "{entity_type} / {sort_by}");
        }
    }
}
