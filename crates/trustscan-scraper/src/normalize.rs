//! Normalization from raw payload records to [`trustscan_core::Business`].
//!
//! Field-by-field mapping with explicit defaulting: anything the payload
//! does not carry stays `None`, never an empty string or zero, so
//! consumers can tell "unknown" from "zero". Normalization never fails —
//! a record without a usable identifier comes back with an empty `id` and
//! is rejected by the pagination driver.

use serde_json::Value;

use trustscan_core::{
    Business, Consumer, Rating, Review, ReviewDate, SimilarBusinessUnit, StarBreakdown,
};

use crate::parse::RawRecord;

/// Normalizes one raw business node into the canonical schema.
///
/// `category_hint` is the category slug being scraped in category mode; it
/// seeds `categories`/`categoriesID` when the payload itself names none.
#[must_use]
pub fn normalize_business(
    raw: &RawRecord,
    base_url: &str,
    category_hint: Option<&str>,
) -> Business {
    let source_url = string_field(raw, "url")
        .or_else(|| string_field(raw, "@id"))
        .map(|u| join_url(base_url, &u));

    let agg = raw.get("aggregateRating");
    let rating_value = agg
        .and_then(|a| a.get("ratingValue"))
        .and_then(lenient_decimal_string);
    let review_count = agg.and_then(|a| a.get("reviewCount")).and_then(lenient_i64);

    let platform_host = host_of(base_url);
    let website = website_from_same_as(raw.get("sameAs"), platform_host.as_deref());

    let domain = website
        .as_deref()
        .and_then(host_of)
        .or_else(|| source_url.as_deref().and_then(domain_from_source_url));

    let id = string_field(raw, "@id")
        .or_else(|| domain.clone())
        .or_else(|| source_url.clone())
        .unwrap_or_default();

    let (categories, categories_id) = resolve_categories(raw, category_hint);

    let address = raw.get("address").map(flatten_address);

    let mut business = Business::empty(id);
    business.domain = domain;
    business.name = string_field(raw, "name");
    business.description = string_field(raw, "description");
    business.image = image_url(raw.get("image"));
    business.phone = string_field(raw, "telephone");
    business.email = string_field(raw, "email");
    business.website = website;
    business.source_url = source_url;
    business.categories = categories;
    business.categories_id = categories_id;
    business.similar_business_units = similar_units(raw.get("similarBusinessUnits"));

    if let Some(parts) = address {
        business.address = parts.street;
        business.city = parts.city;
        business.zip_code = parts.postal_code;
        business.country = parts.country;
    }

    business.rating = Some(Rating {
        best_rating: agg
            .and_then(|a| a.get("bestRating"))
            .and_then(lenient_decimal_string)
            .unwrap_or_else(|| "5".to_owned()),
        worst_rating: agg
            .and_then(|a| a.get("worstRating"))
            .and_then(lenient_decimal_string)
            .unwrap_or_else(|| "1".to_owned()),
        rating_value: rating_value.clone(),
        review_count: review_count.map(|c| c.to_string()),
    });

    // The ld+json payload exposes no star histogram; reflect only the total.
    business.data = Some(StarBreakdown {
        total: review_count.unwrap_or(0),
        ..StarBreakdown::default()
    });

    business.rating_value = rating_value;
    business.review_count = review_count;

    business
}

/// Normalizes one raw `Review` node. Returns `None` when the node is not
/// an object at all; individual missing fields are simply omitted.
#[must_use]
pub fn normalize_review(raw: &RawRecord) -> Option<Review> {
    let map = raw.as_object()?;

    let created_at = string_field(raw, "datePublished")
        .or_else(|| string_field(raw, "dateCreated"))
        .map(|d| normalize_timestamp(&d));

    Some(Review {
        id: string_field(raw, "@id").or_else(|| string_field(raw, "id")),
        text: string_field(raw, "reviewBody").or_else(|| string_field(raw, "description")),
        title: string_field(raw, "headline").or_else(|| string_field(raw, "name")),
        rating: raw
            .get("reviewRating")
            .and_then(|r| r.get("ratingValue"))
            .and_then(lenient_i64),
        date: ReviewDate { created_at },
        consumer: map.get("author").map(consumer_from_author).unwrap_or_default(),
    })
}

/// Derives the category slug from a display name: lowercase, spaces to
/// hyphens (the site's slug convention).
#[must_use]
pub(crate) fn slugify(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

// ---------------------------------------------------------------------------
// Category resolution
// ---------------------------------------------------------------------------

/// Resolves the parallel `categories`/`categoriesID` lists.
///
/// Explicit ids supplied by the payload win verbatim, but only when their
/// length matches the category names; a shorter or longer list is treated
/// as invalid and every id is re-derived from the names. When the payload
/// names no categories at all, the category hint (if any) seeds both lists.
fn resolve_categories(raw: &RawRecord, category_hint: Option<&str>) -> (Vec<String>, Vec<String>) {
    let categories = match raw.get("category").or_else(|| raw.get("keywords")) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_owned()],
        _ => Vec::new(),
    };

    if categories.is_empty() {
        return match category_hint {
            Some(hint) => (vec![hint.replace('-', " ")], vec![hint.to_owned()]),
            None => (Vec::new(), Vec::new()),
        };
    }

    let explicit: Option<Vec<String>> = raw
        .get("categoriesID")
        .or_else(|| raw.get("categoryIds"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        });

    let ids = match explicit {
        Some(ids) if ids.len() == categories.len() => ids,
        _ => categories.iter().map(|c| slugify(c)).collect(),
    };

    (categories, ids)
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

struct AddressParts {
    street: Option<String>,
    city: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
}

/// Flattens a postal-address node. Accepts a single object or a list
/// (first entry wins); `addressCountry` may be a code string or a nested
/// object with a `name`.
fn flatten_address(address: &Value) -> AddressParts {
    let node = match address {
        Value::Array(items) => items.first().unwrap_or(address),
        _ => address,
    };

    let country = match node.get("addressCountry") {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Some(other) => string_field(other, "name"),
        None => None,
    };

    AddressParts {
        street: string_field(node, "streetAddress"),
        city: string_field(node, "addressLocality"),
        postal_code: string_field(node, "postalCode"),
        country,
    }
}

/// Picks the company website from `sameAs`: the first entry that does not
/// point back at the review platform itself.
fn website_from_same_as(same_as: Option<&Value>, platform_host: Option<&str>) -> Option<String> {
    match same_as {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .find(|entry| platform_host.is_none_or(|host| !entry.contains(host)))
            .map(str::to_owned),
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        _ => None,
    }
}

/// An image node is either a bare URL string or an object with a `url`.
fn image_url(image: Option<&Value>) -> Option<String> {
    match image {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Some(Value::Object(_)) => image.and_then(|i| string_field(i, "url")),
        Some(Value::Array(items)) => image_url(items.first()),
        _ => None,
    }
}

fn similar_units(raw: Option<&Value>) -> Vec<SimilarBusinessUnit> {
    let Some(Value::Array(items)) = raw else {
        return Vec::new();
    };
    items
        .iter()
        .filter(|item| item.is_object())
        .map(|item| SimilarBusinessUnit {
            id: string_field(item, "@id").or_else(|| string_field(item, "id")),
            display_name: string_field(item, "displayName").or_else(|| string_field(item, "name")),
            domain: string_field(item, "identifyingName")
                .or_else(|| string_field(item, "domain")),
        })
        .collect()
}

fn consumer_from_author(author: &Value) -> Consumer {
    Consumer {
        id: string_field(author, "@id").or_else(|| string_field(author, "identifier")),
        display_name: string_field(author, "name"),
        image_url: image_url(author.get("image")),
        is_verified: author
            .get("isVerified")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        number_of_reviews: author.get("numberOfReviews").and_then(lenient_i64),
        country_code: string_field(author, "countryCode"),
    }
}

/// Non-empty string field lookup; trims surrounding whitespace.
fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Accepts a JSON number or a numeric string.
fn lenient_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Coerces a rating-like value to its decimal-string form: strings pass
/// through trimmed, numbers are rendered as written in the payload.
fn lenient_decimal_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Joins a path-relative URL onto the platform base.
fn join_url(base_url: &str, url: &str) -> String {
    if url.starts_with('/') {
        format!("{}{url}", base_url.trim_end_matches('/'))
    } else {
        url.to_owned()
    }
}

/// Extracts the hostname of a URL.
fn host_of(url: &str) -> Option<String> {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
}

/// Review-page URLs carry the reviewed company's domain as the last path
/// segment (`…/review/example.com`); prefer that over the platform host.
fn domain_from_source_url(url: &str) -> Option<String> {
    if let Some(idx) = url.find("/review/") {
        let rest = &url[idx + "/review/".len()..];
        let domain = rest.split(['/', '?', '#']).next().unwrap_or(rest);
        if !domain.is_empty() {
            return Some(domain.to_owned());
        }
    }
    host_of(url)
}

/// Re-renders a parseable RFC 3339 timestamp in canonical form; anything
/// else passes through unchanged.
fn normalize_timestamp(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map_or_else(|_| raw.to_owned(), |dt| dt.to_rfc3339())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
