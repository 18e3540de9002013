//! Post-fetch record filtering.
//!
//! [`matches`] is a pure, total function over a single business; every
//! configured constraint is an independent AND-combined predicate and an
//! unset constraint always passes. No I/O happens here.

use trustscan_core::{Business, FilterConfig};

/// Evaluates the configured predicate set against one business.
#[must_use]
pub fn matches(business: &Business, filters: &FilterConfig) -> bool {
    meets_min_trust(business, filters.min_trust_score)
        && matches_country(business, filters.country.as_deref())
        && has_min_reviews(business, filters.min_review_count)
        && is_verified(business, filters.verified_only)
}

/// Compares the parsed `ratingValue` against the threshold. A missing or
/// non-numeric rating fails this predicate only — the record is dropped
/// when the predicate is active, but evaluation never errors.
fn meets_min_trust(business: &Business, min_trust_score: Option<f64>) -> bool {
    let Some(threshold) = min_trust_score else {
        return true;
    };
    business
        .rating_value
        .as_deref()
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .is_some_and(|rating| rating >= threshold)
}

fn matches_country(business: &Business, country: Option<&str>) -> bool {
    let Some(wanted) = country else {
        return true;
    };
    business
        .country
        .as_deref()
        .is_some_and(|c| c.eq_ignore_ascii_case(wanted))
}

fn has_min_reviews(business: &Business, minimum: Option<i64>) -> bool {
    let Some(minimum) = minimum else {
        return true;
    };
    business.review_count.is_some_and(|count| count >= minimum)
}

/// Listing records carry no first-class verification signal — the flag
/// lives on each review's consumer. When reviews have not been fetched the
/// predicate passes through unfiltered; when they have, at least one
/// verified-consumer review must exist.
fn is_verified(business: &Business, verified_only: bool) -> bool {
    if !verified_only {
        return true;
    }
    match &business.reviews {
        None => true,
        Some(reviews) => reviews.iter().any(|r| r.consumer.is_verified),
    }
}
