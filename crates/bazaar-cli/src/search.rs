//! `search` and `url` subcommands.

use anyhow::{anyhow, bail, Context};
use bazaar_core::codec::{
    KEY_CATEGORY, KEY_DISTANCE, KEY_LAT, KEY_LIMIT, KEY_LNG, KEY_MAX_PRICE, KEY_MIN_PRICE,
    KEY_MODE, KEY_PAGE, KEY_PRODUCT_TYPE, KEY_QUERY, KEY_SORT, KEY_TYPE,
};
use bazaar_core::{decode, encode, Coordinates, EntityType, SearchParamsUpdate, SortBy};
use bazaar_search::SearchOrchestrator;
use sqlx::PgPool;

/// Parse a `KEY=VALUE` argument. The value may be empty.
pub(crate) fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    if key.is_empty() {
        return Err(format!("missing key in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn text(value: &str) -> Option<Option<String>> {
    Some((!value.is_empty()).then(|| value.to_string()))
}

fn integer(key: &str, value: &str) -> anyhow::Result<i64> {
    value
        .parse()
        .with_context(|| format!("{key} expects an integer, got `{value}`"))
}

fn coordinate(key: &str, value: &str) -> anyhow::Result<f64> {
    value
        .parse()
        .with_context(|| format!("{key} expects a number, got `{value}`"))
}

/// Build a partial update from codec key assignments.
///
/// `lat` and `lng` must be set together; both empty clears the location.
pub(crate) fn build_update(assignments: &[(String, String)]) -> anyhow::Result<SearchParamsUpdate> {
    let mut update = SearchParamsUpdate::default();
    let mut lat: Option<&str> = None;
    let mut lng: Option<&str> = None;

    for (key, value) in assignments {
        match key.as_str() {
            KEY_TYPE => {
                update.entity_type = Some(
                    EntityType::parse(value).ok_or_else(|| anyhow!("unknown type `{value}`"))?,
                );
            }
            KEY_QUERY => update.free_text_query = text(value),
            KEY_CATEGORY => update.category = text(value),
            KEY_PRODUCT_TYPE => update.product_type = text(value),
            KEY_MODE => update.service_mode = text(value),
            KEY_MIN_PRICE => update.min_price = Some(integer(key, value)?),
            KEY_MAX_PRICE => update.max_price = Some(integer(key, value)?),
            KEY_DISTANCE => update.max_distance = Some(integer(key, value)?),
            KEY_SORT => {
                update.sort_by =
                    Some(SortBy::parse(value).ok_or_else(|| anyhow!("unknown sort `{value}`"))?);
            }
            KEY_PAGE => update.page = Some(integer(key, value)?),
            KEY_LIMIT => update.page_size = Some(integer(key, value)?),
            KEY_LAT => lat = Some(value),
            KEY_LNG => lng = Some(value),
            other => bail!("unknown search key `{other}`"),
        }
    }

    match (lat, lng) {
        (None, None) => {}
        (Some(""), Some("")) => update.user_location = Some(None),
        (Some(lat), Some(lng)) => {
            update.user_location = Some(Some(Coordinates {
                latitude: coordinate(KEY_LAT, lat)?,
                longitude: coordinate(KEY_LNG, lng)?,
            }));
        }
        _ => bail!("{KEY_LAT} and {KEY_LNG} must be set together"),
    }

    Ok(update)
}

/// New query string after applying `assignments` to `current`. Pagination
/// restarts unless `page` is assigned.
pub(crate) fn run_url(current: &str, assignments: &[(String, String)]) -> anyhow::Result<String> {
    let update = build_update(assignments)?.resetting_page();
    Ok(encode(&update, current))
}

pub(crate) async fn run_search(pool: PgPool, query: &str) -> anyhow::Result<()> {
    let params = decode(query);
    tracing::info!(entity_type = %params.entity_type, "running search");

    let outcome = SearchOrchestrator::new(pool).search(&params).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if outcome.is_failed() {
        bail!("search failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignments(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn parse_assignment_allows_empty_value() {
        assert_eq!(
            parse_assignment("category="),
            Ok(("category".to_string(), String::new()))
        );
        assert!(parse_assignment("category").is_err());
        assert!(parse_assignment("=Furniture").is_err());
    }

    #[test]
    fn url_replaces_value_and_resets_page() {
        let next = run_url(
            "q=oak&category=Garden&page=3",
            &assignments(&[("category", "Furniture")]),
        )
        .expect("url");
        assert_eq!(next, "q=oak&category=Furniture");
    }

    #[test]
    fn url_keeps_explicit_page() {
        let next = run_url("q=oak", &assignments(&[("page", "2")])).expect("url");
        assert_eq!(next, "q=oak&page=2");
    }

    #[test]
    fn empty_value_clears_key() {
        let next = run_url("q=oak&mode=pickup", &assignments(&[("mode", "")])).expect("url");
        assert_eq!(next, "q=oak");
    }

    #[test]
    fn clearing_location_drops_distance() {
        let next = run_url(
            "lat=1&lng=2&distance=5&sort=proximity",
            &assignments(&[("lat", ""), ("lng", "")]),
        )
        .expect("url");
        assert_eq!(next, "sort=proximity");
    }

    #[test]
    fn half_a_location_is_rejected() {
        assert!(build_update(&assignments(&[("lat", "1.5")])).is_err());
    }

    #[test]
    fn unknown_keys_and_values_are_rejected() {
        assert!(build_update(&assignments(&[("colour", "red")])).is_err());
        assert!(build_update(&assignments(&[("type", "widgets")])).is_err());
        assert!(build_update(&assignments(&[("minPrice", "cheap")])).is_err());
    }

    #[test]
    fn typed_values_parse() {
        let update = build_update(&assignments(&[
            ("type", "sellers"),
            ("sort", "newest"),
            ("limit", "25"),
            ("lat", "40.5"),
            ("lng", "-73.9"),
        ]))
        .expect("update");
        assert_eq!(update.entity_type, Some(EntityType::Sellers));
        assert_eq!(update.sort_by, Some(SortBy::Newest));
        assert_eq!(update.page_size, Some(25));
        assert_eq!(
            update.user_location,
            Some(Some(Coordinates {
                latitude: 40.5,
                longitude: -73.9
            }))
        );
    }
}
