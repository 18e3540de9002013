//! Run-request types: what to scrape and which records to keep.
//!
//! A [`RunRequest`] mirrors the JSON input file consumed by the CLI. It is
//! validated into a [`SearchTarget`] (exactly one mode per run) and a
//! [`FilterConfig`] (post-fetch record predicates plus pagination bounds).

use serde::Deserialize;

use crate::error::RequestError;

/// What one scrape run is pointed at. Exactly one variant per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTarget {
    /// Listing pages of one category.
    Category {
        category_id: String,
        country: Option<String>,
    },
    /// Keyword search result pages.
    Keyword {
        query: String,
        country: Option<String>,
    },
    /// A single business's review page.
    Detail { domain: String },
}

/// Post-fetch filter constraints plus pagination bounds. Every constraint
/// is optional; an unset constraint always passes.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    /// Minimum aggregate trust score (0–10 accepted, site reports 0–5).
    pub min_trust_score: Option<f64>,
    pub verified_only: bool,
    /// ISO country code, compared case-insensitively.
    pub country: Option<String>,
    pub min_review_count: Option<i64>,
    /// Review language requested during enrichment.
    pub language: Option<String>,
    /// Fetch every available result page (bounded by a safety cap).
    pub all_pages: bool,
    /// Page budget when `all_pages` is false.
    pub max_pages: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_trust_score: None,
            verified_only: false,
            country: None,
            min_review_count: None,
            language: None,
            all_pages: false,
            max_pages: 1,
        }
    }
}

/// The JSON run request as read from the input file.
///
/// Field names follow the wire convention of the input format
/// (`searchType`, `categoryId`, ...). `maxPages` also accepts the legacy
/// `pages` alias.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    pub search_type: String,

    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,

    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub language: Option<String>,

    #[serde(default, alias = "trustscore")]
    pub min_trust_score: Option<f64>,
    #[serde(default)]
    pub verified_only: bool,
    #[serde(default, alias = "minReviews")]
    pub min_review_count: Option<i64>,

    #[serde(default)]
    pub all_pages: bool,
    #[serde(default, alias = "pages")]
    pub max_pages: Option<u32>,

    #[serde(default)]
    pub include_reviews: bool,
    #[serde(default)]
    pub max_reviews_per_company: Option<usize>,
}

impl RunRequest {
    /// Resolves the search target for this request.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::UnsupportedSearchType`] for an unknown
    /// `searchType`, or [`RequestError::MissingField`] when the
    /// mode-specific field (`categoryId`, `keyword`, `domain`) is absent
    /// or empty.
    pub fn target(&self) -> Result<SearchTarget, RequestError> {
        let country = non_empty(self.country.as_deref());
        match self.search_type.to_lowercase().as_str() {
            "category" => {
                let category_id =
                    non_empty(self.category_id.as_deref()).ok_or(RequestError::MissingField {
                        search_type: "category",
                        field: "categoryId",
                    })?;
                Ok(SearchTarget::Category {
                    category_id,
                    country,
                })
            }
            "keyword" => {
                let query =
                    non_empty(self.keyword.as_deref()).ok_or(RequestError::MissingField {
                        search_type: "keyword",
                        field: "keyword",
                    })?;
                Ok(SearchTarget::Keyword { query, country })
            }
            "detail" => {
                let domain =
                    non_empty(self.domain.as_deref()).ok_or(RequestError::MissingField {
                        search_type: "detail",
                        field: "domain",
                    })?;
                Ok(SearchTarget::Detail { domain })
            }
            other => Err(RequestError::UnsupportedSearchType(other.to_owned())),
        }
    }

    /// Resolves the filter configuration for this request.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidValue`] when `minTrustScore` is
    /// outside the 0–10 range or `maxPages` is zero.
    pub fn filters(&self) -> Result<FilterConfig, RequestError> {
        if let Some(score) = self.min_trust_score {
            if !(0.0..=10.0).contains(&score) {
                return Err(RequestError::InvalidValue {
                    field: "minTrustScore",
                    reason: format!("{score} is outside the 0-10 range"),
                });
            }
        }
        let max_pages = self.max_pages.unwrap_or(1);
        if max_pages == 0 {
            return Err(RequestError::InvalidValue {
                field: "maxPages",
                reason: "must be at least 1".to_owned(),
            });
        }

        Ok(FilterConfig {
            min_trust_score: self.min_trust_score,
            verified_only: self.verified_only,
            country: non_empty(self.country.as_deref()),
            min_review_count: self.min_review_count,
            language: non_empty(self.language.as_deref()),
            all_pages: self.all_pages,
            max_pages,
        })
    }
}

/// Treats empty / whitespace-only strings as absent.
fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
#[path = "request_test.rs"]
mod tests;
