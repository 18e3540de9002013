//! Canonical output schema for scraped business profiles.
//!
//! ## Observed shape from live review pages
//!
//! ### Optional fields
//! The embedded `application/ld+json` payload varies a lot between listing
//! and detail pages; most attributes are simply not there on listing cards.
//! Every optional attribute is modeled as `Option<T>` and skipped during
//! serialization when absent, so a consumer can tell "unknown" apart from
//! "zero"/"empty".
//!
//! ### `ratingValue`
//! Serialized as a decimal **string** (`"4.5"`), matching the nested
//! `rating` block where the site itself reports strings. Parsed back to a
//! number only inside the filter engine.
//!
//! ### `reviews` / `lastReviews`
//! `Option<Vec<Review>>`, not `Vec<Review>`: `None` means the reviews were
//! never fetched (enrichment disabled), while `Some(vec![])` means the
//! review fetch ran and genuinely found nothing. Only `None` is omitted
//! from the output.
//!
//! ### `categories` / `categoriesID`
//! Parallel lists, always the same length. When the payload supplies no
//! explicit ids they are derived from the names with the site's slug
//! convention (lowercase, spaces to hyphens).

use serde::{Deserialize, Serialize};

/// Canonical normalized record for one reviewed company/domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    /// Stable unique identifier. Sourced from the payload's `@id` when
    /// present, otherwise the company domain or source URL.
    pub id: String,

    /// Domain of the reviewed company (e.g., `"example.com"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Aggregate trust score as a decimal string, 0–5 scale on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    /// Review platforms usually do not expose company emails; kept in the
    /// schema for payloads that do carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Ordered category display names.
    #[serde(default)]
    pub categories: Vec<String>,

    /// Category slugs, parallel to `categories` (same length and order).
    #[serde(rename = "categoriesID", default)]
    pub categories_id: Vec<String>,

    /// Nested aggregate-rating block; values are strings on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,

    /// Star-distribution counts. All-zero with only `total` populated when
    /// the payload exposes no histogram.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<StarBreakdown>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub similar_business_units: Vec<SimilarBusinessUnit>,

    /// Most recent reviews (first 3 of `reviews`); populated only after
    /// enrichment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviews: Option<Vec<Review>>,

    /// Full fetched review list; populated only after enrichment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<Review>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<AiSummary>,

    /// URL of the page this record was extracted from. Also the target for
    /// the per-business review fetch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// Nested aggregate-rating block. The site reports these as strings
/// (`"bestRating": "5"`), so they stay strings here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub best_rating: String,
    pub worst_rating: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<String>,
}

/// Star-distribution counts, one through five, plus the total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarBreakdown {
    pub one: i64,
    pub two: i64,
    pub three: i64,
    pub four: i64,
    pub five: i64,
    pub total: i64,
}

/// Summary of a related business unit from the payload's
/// `similarBusinessUnits` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarBusinessUnit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// One consumer review, attached during enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Star rating, 1–5.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    pub date: ReviewDate,
    pub consumer: Consumer,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// The author of a [`Review`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consumer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Whether the platform marks this consumer as verified. Listing pages
    /// carry no such signal; defaults to `false`.
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_reviews: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

/// Deterministic text summary attached during enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSummary {
    pub summary: String,
    pub status: String,
    pub lang: String,
    pub updated_at: String,
}

/// Full output of one scrape run: ordered businesses (discovery order
/// across pages) plus the source-reported total and the number of pages
/// actually fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub businesses: Vec<Business>,
    pub total: i64,
    pub pages: u32,
}

impl Business {
    /// Creates an otherwise-empty record with the given identifier. Used by
    /// the normalizer as the starting point for field-by-field mapping.
    #[must_use]
    pub fn empty(id: String) -> Self {
        Self {
            id,
            domain: None,
            name: None,
            rating_value: None,
            review_count: None,
            description: None,
            image: None,
            country: None,
            address: None,
            city: None,
            zip_code: None,
            website: None,
            email: None,
            phone: None,
            categories: Vec::new(),
            categories_id: Vec::new(),
            rating: None,
            data: None,
            similar_business_units: Vec::new(),
            last_reviews: None,
            reviews: None,
            ai_summary: None,
            source_url: None,
        }
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
