//! Query-string codec for [`SearchParameters`].
//!
//! Keys are a fixed contract with shareable URLs. Values equal to their
//! documented default are never written, so every search has one canonical
//! query string.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::search::{
    Coordinates, EntityType, SearchParameters, SearchParamsUpdate, SortBy, ALL_SENTINEL,
    DEFAULT_MAX_DISTANCE, DEFAULT_MAX_PRICE, DEFAULT_MIN_PRICE, DEFAULT_PAGE, DEFAULT_PAGE_SIZE,
};

pub const KEY_TYPE: &str = "type";
pub const KEY_QUERY: &str = "q";
pub const KEY_CATEGORY: &str = "category";
pub const KEY_PRODUCT_TYPE: &str = "product_type";
pub const KEY_MODE: &str = "mode";
pub const KEY_MIN_PRICE: &str = "minPrice";
pub const KEY_MAX_PRICE: &str = "maxPrice";
pub const KEY_LAT: &str = "lat";
pub const KEY_LNG: &str = "lng";
pub const KEY_DISTANCE: &str = "distance";
pub const KEY_SORT: &str = "sort";
pub const KEY_PAGE: &str = "page";
pub const KEY_LIMIT: &str = "limit";

/// Everything except unreserved characters gets escaped.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Decode a query string into fully defaulted parameters.
///
/// Never fails: malformed numbers fall back to their defaults, unknown
/// `type`/`sort` values fall back to the default variant, and `distance` is
/// ignored unless both `lat` and `lng` parse.
#[must_use]
pub fn decode(query: &str) -> SearchParameters {
    let pairs = parse_pairs(query);
    let get = |key: &str| -> Option<&str> {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };
    let text = |key: &str| get(key).filter(|v| !v.is_empty()).map(ToOwned::to_owned);
    let int = |key: &str, default: i64| get(key).and_then(parse_leading_int).unwrap_or(default);

    let user_location = match (
        get(KEY_LAT).and_then(parse_float),
        get(KEY_LNG).and_then(parse_float),
    ) {
        (Some(latitude), Some(longitude)) => Some(Coordinates {
            latitude,
            longitude,
        }),
        _ => None,
    };
    let max_distance = if user_location.is_some() {
        int(KEY_DISTANCE, DEFAULT_MAX_DISTANCE)
    } else {
        DEFAULT_MAX_DISTANCE
    };

    let mut params = SearchParameters {
        entity_type: get(KEY_TYPE)
            .and_then(EntityType::parse)
            .unwrap_or_default(),
        free_text_query: text(KEY_QUERY),
        category: text(KEY_CATEGORY),
        product_type: text(KEY_PRODUCT_TYPE),
        service_mode: text(KEY_MODE),
        user_location,
        max_distance,
        sort_by: get(KEY_SORT).and_then(SortBy::parse).unwrap_or_default(),
        page: int(KEY_PAGE, DEFAULT_PAGE),
        page_size: int(KEY_LIMIT, DEFAULT_PAGE_SIZE),
        ..SearchParameters::default()
    };
    params.price_range.min = int(KEY_MIN_PRICE, DEFAULT_MIN_PRICE);
    params.price_range.max = int(KEY_MAX_PRICE, DEFAULT_MAX_PRICE);
    params
}

/// Apply `update` to the `current` query string and return the new one.
///
/// Keys the update does not mention are carried forward in their original
/// order. Mentioned keys are written when they differ from the default and
/// removed otherwise. Clearing the location also removes `distance`.
#[must_use]
pub fn encode(update: &SearchParamsUpdate, current: &str) -> String {
    let mut pairs = parse_pairs(current);

    if let Some(entity_type) = update.entity_type {
        set_or_remove(
            &mut pairs,
            KEY_TYPE,
            (entity_type != EntityType::default()).then(|| entity_type.as_str().to_string()),
        );
    }
    if let Some(q) = &update.free_text_query {
        set_or_remove(&mut pairs, KEY_QUERY, non_empty(q.as_deref()));
    }
    if let Some(category) = &update.category {
        set_or_remove(&mut pairs, KEY_CATEGORY, filter_value(category.as_deref()));
    }
    if let Some(product_type) = &update.product_type {
        set_or_remove(&mut pairs, KEY_PRODUCT_TYPE, filter_value(product_type.as_deref()));
    }
    if let Some(mode) = &update.service_mode {
        set_or_remove(&mut pairs, KEY_MODE, filter_value(mode.as_deref()));
    }
    if let Some(min) = update.min_price {
        set_or_remove(&mut pairs, KEY_MIN_PRICE, non_default(min, DEFAULT_MIN_PRICE));
    }
    if let Some(max) = update.max_price {
        set_or_remove(&mut pairs, KEY_MAX_PRICE, non_default(max, DEFAULT_MAX_PRICE));
    }
    if let Some(distance) = update.max_distance {
        set_or_remove(&mut pairs, KEY_DISTANCE, non_default(distance, DEFAULT_MAX_DISTANCE));
    }
    match update.user_location {
        Some(Some(location)) => {
            set_or_remove(&mut pairs, KEY_LAT, Some(location.latitude.to_string()));
            set_or_remove(&mut pairs, KEY_LNG, Some(location.longitude.to_string()));
        }
        Some(None) => {
            set_or_remove(&mut pairs, KEY_LAT, None);
            set_or_remove(&mut pairs, KEY_LNG, None);
            set_or_remove(&mut pairs, KEY_DISTANCE, None);
        }
        None => {}
    }
    if let Some(sort_by) = update.sort_by {
        set_or_remove(
            &mut pairs,
            KEY_SORT,
            (sort_by != SortBy::default()).then(|| sort_by.as_str().to_string()),
        );
    }
    if let Some(page) = update.page {
        set_or_remove(&mut pairs, KEY_PAGE, non_default(page, DEFAULT_PAGE));
    }
    if let Some(limit) = update.page_size {
        set_or_remove(&mut pairs, KEY_LIMIT, non_default(limit, DEFAULT_PAGE_SIZE));
    }

    pairs
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k, QUERY_COMPONENT),
                utf8_percent_encode(v, QUERY_COMPONENT)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Split `a=1&b=2` into decoded pairs, tolerating a leading `?` and `+` for spaces.
fn parse_pairs(query: &str) -> Vec<(String, String)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Replace the first occurrence of `key` (dropping duplicates) or append it;
/// `None` removes every occurrence.
fn set_or_remove(pairs: &mut Vec<(String, String)>, key: &str, value: Option<String>) {
    match value {
        Some(value) => {
            if let Some(pos) = pairs.iter().position(|(k, _)| k == key) {
                pairs[pos].1 = value;
                let mut seen = false;
                pairs.retain(|(k, _)| {
                    if k != key {
                        return true;
                    }
                    let keep = !seen;
                    seen = true;
                    keep
                });
            } else {
                pairs.push((key.to_string(), value));
            }
        }
        None => pairs.retain(|(k, _)| k != key),
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(ToOwned::to_owned)
}

fn filter_value(value: Option<&str>) -> Option<String> {
    non_empty(value).filter(|v| v != ALL_SENTINEL)
}

fn non_default(value: i64, default: i64) -> Option<String> {
    (value != default).then(|| value.to_string())
}

/// Base-10 integer prefix parse: optional sign then digits, trailing garbage ignored.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (sign_len, rest) = match s.as_bytes().first() {
        Some(b'-' | b'+') => (1, &s[1..]),
        _ => (0, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    s[..sign_len + digits].parse::<i64>().ok()
}

fn parse_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
#[path = "codec_test.rs"]
mod tests;
