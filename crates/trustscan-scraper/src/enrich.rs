//! Per-business review enrichment.
//!
//! A secondary fetch against the business's review page attaches the full
//! review list, the `lastReviews` subset, and a deterministic text
//! summary. Enrichment failures never drop a business from the result set;
//! they downgrade to a per-record warning and the record ships without
//! reviews.

use std::sync::atomic::{AtomicBool, Ordering};

use futures::stream::{self, StreamExt};

use trustscan_core::{AiSummary, Business};

use crate::client::TrustpilotClient;
use crate::error::ScrapeError;
use crate::normalize::normalize_review;
use crate::parse;

/// How many of the fetched reviews land in `lastReviews`.
const LAST_REVIEWS_LEN: usize = 3;

/// Whether and how to enrich filtered businesses with reviews.
#[derive(Debug, Clone, Default)]
pub struct EnrichPolicy {
    pub enabled: bool,
    /// Per-business cap on attached reviews; unlimited when `None`.
    pub max_reviews: Option<usize>,
}

impl EnrichPolicy {
    /// Policy that leaves every business untouched.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }
}

/// Enriches a batch of businesses through a bounded worker pool.
///
/// Fetches run concurrently up to `concurrency`; completion order does not
/// matter because the output is re-joined by index, so the discovery order
/// of the input is preserved. A set cancellation flag skips the remaining
/// fetches and returns the businesses as they are.
pub(crate) async fn enrich_all(
    client: &TrustpilotClient,
    businesses: Vec<Business>,
    language: Option<&str>,
    max_reviews: Option<usize>,
    concurrency: usize,
    cancel: &AtomicBool,
) -> Vec<Business> {
    let mut enriched: Vec<(usize, Business)> = stream::iter(businesses.into_iter().enumerate())
        .map(|(idx, mut business)| async move {
            if cancel.load(Ordering::SeqCst) {
                return (idx, business);
            }
            if let Err(e) = enrich_business(client, &mut business, language, max_reviews).await {
                tracing::warn!(
                    business = %business.id,
                    error = %e,
                    "review enrichment failed — record kept without reviews"
                );
            }
            (idx, business)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    enriched.sort_by_key(|(idx, _)| *idx);
    enriched.into_iter().map(|(_, business)| business).collect()
}

/// Fetches and attaches reviews plus the text summary for one business.
///
/// When `language` is set the review page is requested with a `languages`
/// query; a 400/404 answer to that scoped request falls back to all
/// languages before giving up.
///
/// # Errors
///
/// Propagates fetch errors from the review-page request. A business with
/// neither a source URL nor a domain cannot be enriched and is left
/// unchanged without error.
pub(crate) async fn enrich_business(
    client: &TrustpilotClient,
    business: &mut Business,
    language: Option<&str>,
    max_reviews: Option<usize>,
) -> Result<(), ScrapeError> {
    let Some(page_url) = review_page_url(client, business) else {
        tracing::debug!(business = %business.id, "no source URL or domain — skipping enrichment");
        return Ok(());
    };

    let html = match client.fetch_page(&with_language(&page_url, language)).await {
        Ok(html) => html,
        // The site answers 400/404 when it does not know the language code.
        Err(
            ScrapeError::NotFound { .. }
            | ScrapeError::UnexpectedStatus { status: 400, .. },
        ) if language.is_some() => {
            tracing::debug!(
                business = %business.id,
                language = language.unwrap_or_default(),
                "language-scoped review fetch rejected — falling back to all languages"
            );
            client.fetch_page(&page_url).await?
        }
        Err(e) => return Err(e),
    };

    let mut reviews: Vec<_> = parse::parse_reviews(&html)
        .iter()
        .filter_map(normalize_review)
        .collect();
    if let Some(limit) = max_reviews {
        reviews.truncate(limit);
    }

    business.last_reviews = Some(reviews.iter().take(LAST_REVIEWS_LEN).cloned().collect());
    business.reviews = Some(reviews);
    business.ai_summary = Some(build_ai_summary(business, language));

    Ok(())
}

/// Resolves the page to fetch reviews from: the record's own source URL
/// when known, otherwise the review URL for its domain.
fn review_page_url(client: &TrustpilotClient, business: &Business) -> Option<String> {
    business
        .source_url
        .clone()
        .or_else(|| business.domain.as_deref().map(|d| client.review_url(d)))
}

/// Appends the `languages` query parameter when a language is requested.
fn with_language(url: &str, language: Option<&str>) -> String {
    match language {
        Some(lang) => {
            let sep = if url.contains('?') { '&' } else { '?' };
            format!("{url}{sep}languages={lang}")
        }
        None => url.to_owned(),
    }
}

/// Builds the deterministic text summary from the fields already on the
/// record. No external model is involved; `status` is always `"success"`.
fn build_ai_summary(business: &Business, language: Option<&str>) -> AiSummary {
    let mut parts: Vec<String> = Vec::new();

    match &business.name {
        Some(name) => parts.push(format!("{name} is a business listed on Trustpilot")),
        None => parts.push("This business is listed on Trustpilot".to_owned()),
    }

    if !business.categories.is_empty() {
        let mut sectors: Vec<&str> = business.categories.iter().map(String::as_str).collect();
        sectors.sort_unstable();
        sectors.dedup();
        parts.push(format!("operating in the {} sector", sectors.join(", ")));
    }

    if business.country.is_some() {
        let location: Vec<&str> = [business.city.as_deref(), business.country.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !location.is_empty() {
            parts.push(format!("and appears to be based in {}", location.join(", ")));
        }
    }

    let rating = business
        .rating_value
        .as_deref()
        .and_then(|raw| raw.trim().parse::<f64>().ok());
    match (rating, business.review_count) {
        (Some(rating), Some(count)) => parts.push(format!(
            "with an average rating of {rating:.1} from {count} reviews"
        )),
        (Some(rating), None) => {
            parts.push(format!("and an average rating of {rating:.1}"));
        }
        _ => {}
    }

    let mut summary = parts.join(", ");
    if !summary.ends_with('.') {
        summary.push('.');
    }

    AiSummary {
        summary,
        status: "success".to_owned(),
        lang: language.unwrap_or("en").to_owned(),
        updated_at: chrono::Utc::now().to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summarized(business: &Business) -> String {
        build_ai_summary(business, None).summary
    }

    #[test]
    fn with_language_appends_first_query_param() {
        assert_eq!(
            with_language("https://x/review/a.com", Some("de")),
            "https://x/review/a.com?languages=de"
        );
    }

    #[test]
    fn with_language_appends_to_existing_query() {
        assert_eq!(
            with_language("https://x/review/a.com?foo=1", Some("de")),
            "https://x/review/a.com?foo=1&languages=de"
        );
    }

    #[test]
    fn with_language_none_leaves_url_unchanged() {
        assert_eq!(
            with_language("https://x/review/a.com", None),
            "https://x/review/a.com"
        );
    }

    #[test]
    fn summary_covers_name_sector_location_and_rating() {
        let mut business = Business::empty("alpha.com".to_owned());
        business.name = Some("Alpha".to_owned());
        business.categories = vec!["Pet Stores".to_owned()];
        business.city = Some("Berlin".to_owned());
        business.country = Some("DE".to_owned());
        business.rating_value = Some("4.5".to_owned());
        business.review_count = Some(128);

        assert_eq!(
            summarized(&business),
            "Alpha is a business listed on Trustpilot, operating in the Pet Stores sector, \
             and appears to be based in Berlin, DE, with an average rating of 4.5 from 128 reviews."
        );
    }

    #[test]
    fn summary_without_name_uses_generic_opening() {
        let business = Business::empty("x".to_owned());
        assert_eq!(summarized(&business), "This business is listed on Trustpilot.");
    }

    #[test]
    fn summary_rating_without_count() {
        let mut business = Business::empty("x".to_owned());
        business.rating_value = Some("4".to_owned());
        assert_eq!(
            summarized(&business),
            "This business is listed on Trustpilot, and an average rating of 4.0."
        );
    }

    #[test]
    fn summary_lang_defaults_to_en() {
        let business = Business::empty("x".to_owned());
        assert_eq!(build_ai_summary(&business, None).lang, "en");
        assert_eq!(build_ai_summary(&business, Some("de")).lang, "de");
    }

    #[test]
    fn summary_deduplicates_sectors() {
        let mut business = Business::empty("x".to_owned());
        business.categories = vec!["Banking".to_owned(), "Banking".to_owned()];
        assert_eq!(
            summarized(&business),
            "This business is listed on Trustpilot, operating in the Banking sector."
        );
    }
}
