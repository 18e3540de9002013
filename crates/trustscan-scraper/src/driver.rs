//! Sequential pagination driver.
//!
//! Drives repeated fetch → parse → normalize → filter → enrich cycles
//! across listing pages until one of the stop conditions holds, then
//! assembles the final [`ResultSet`]. Pages are fetched strictly one after
//! another — page N+1 is only requested once page N's records are fully
//! processed — which keeps at most one listing request outstanding and
//! makes dedup and output order deterministic. Only the per-business
//! review fetches inside a page fan out (see [`crate::enrich`]).
//!
//! Stop conditions are evaluated in fixed order after each page so the
//! stop-reason precedence is deterministic:
//!
//! 1. the parsed page yields zero records;
//! 2. `all_pages` is false and the configured page budget is spent;
//! 3. the source-derived total page count has been reached.
//!
//! A page fetch that fails after retry exhaustion — or an external
//! cancellation — ends the run early; everything gathered so far is
//! preserved and the failure travels alongside the partial result instead
//! of replacing it.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use trustscan_core::{AppConfig, Business, FilterConfig, ResultSet, SearchTarget};

use crate::client::TrustpilotClient;
use crate::enrich::{enrich_all, EnrichPolicy};
use crate::error::ScrapeError;
use crate::filter;
use crate::normalize::normalize_business;
use crate::parse;

/// Hard cap on pages per run. Prevents runaway pagination when the source
/// reports an absurd total.
const MAX_PAGES: u32 = 100;

/// What one run produced: the assembled result set, plus the failure that
/// ended the run early (if any). A failure never discards the records
/// gathered before it.
#[derive(Debug)]
pub struct RunOutcome {
    pub result: ResultSet,
    pub failure: Option<ScrapeError>,
}

impl RunOutcome {
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.failure.is_some()
    }

    /// `"complete"` or `"partial"`, as written into the output envelope.
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        if self.is_partial() {
            "partial"
        } else {
            "complete"
        }
    }
}

/// Orchestrates one scrape run against a [`SearchTarget`].
pub struct ScrapeRunner {
    client: TrustpilotClient,
    inter_request_delay_ms: u64,
    enrich_concurrency: usize,
}

impl ScrapeRunner {
    #[must_use]
    pub fn new(
        client: TrustpilotClient,
        inter_request_delay_ms: u64,
        enrich_concurrency: usize,
    ) -> Self {
        Self {
            client,
            inter_request_delay_ms,
            enrich_concurrency,
        }
    }

    /// Builds a runner (and its HTTP client) from the shared config.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScrapeError> {
        Ok(Self::new(
            TrustpilotClient::from_config(config)?,
            config.inter_request_delay_ms,
            config.enrich_concurrency,
        ))
    }

    /// Runs the full pipeline for one target.
    ///
    /// `cancel` is checked between pages and before each enrichment fetch;
    /// setting it ends the run with [`ScrapeError::Cancelled`] and the
    /// partial result gathered so far.
    pub async fn run(
        &self,
        target: &SearchTarget,
        filters: &FilterConfig,
        enrich: &EnrichPolicy,
        cancel: &AtomicBool,
    ) -> RunOutcome {
        match target {
            SearchTarget::Detail { domain } => {
                self.run_detail(domain, filters, enrich, cancel).await
            }
            SearchTarget::Category { .. } | SearchTarget::Keyword { .. } => {
                self.run_listing(target, filters, enrich, cancel).await
            }
        }
    }

    /// Detail mode: no pagination loop, a single
    /// fetch/parse/normalize/filter/enrich cycle with `pages = 1`.
    async fn run_detail(
        &self,
        domain: &str,
        filters: &FilterConfig,
        enrich: &EnrichPolicy,
        cancel: &AtomicBool,
    ) -> RunOutcome {
        let url = self.client.review_url(domain);

        let html = match self.client.fetch_page(&url).await {
            Ok(html) => html,
            // An unknown domain is an empty-but-complete run, not a failure.
            Err(ScrapeError::NotFound { .. }) => {
                tracing::warn!(domain, "no review page for domain");
                return detail_outcome(Vec::new(), None);
            }
            Err(e) => return detail_outcome(Vec::new(), Some(e)),
        };

        let parsed = match parse::parse_detail(&html, &url) {
            Ok(parsed) => parsed,
            Err(e) => return detail_outcome(Vec::new(), Some(e)),
        };

        let mut businesses: Vec<Business> = parsed
            .records
            .iter()
            .map(|raw| normalize_business(raw, self.client.base_url(), None))
            .filter(|b| !b.id.is_empty())
            .filter(|b| filter::matches(b, filters))
            .collect();

        if enrich.enabled && !businesses.is_empty() {
            businesses = enrich_all(
                &self.client,
                businesses,
                filters.language.as_deref(),
                enrich.max_reviews,
                self.enrich_concurrency,
                cancel,
            )
            .await;
        }

        detail_outcome(businesses, None)
    }

    /// Category/keyword mode: the sequential page loop.
    async fn run_listing(
        &self,
        target: &SearchTarget,
        filters: &FilterConfig,
        enrich: &EnrichPolicy,
        cancel: &AtomicBool,
    ) -> RunOutcome {
        let category_hint = match target {
            SearchTarget::Category { category_id, .. } => Some(category_id.as_str()),
            SearchTarget::Keyword { .. } | SearchTarget::Detail { .. } => None,
        };

        let mut businesses: Vec<Business> = Vec::new();
        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut failure: Option<ScrapeError> = None;
        let mut reported_total: Option<i64> = None;
        let mut total_pages: u32 = 1;
        let mut pages_fetched: u32 = 0;
        let mut page: u32 = 1;

        loop {
            if cancel.load(Ordering::SeqCst) {
                tracing::warn!(page, "cancellation requested — stopping with partial results");
                failure = Some(ScrapeError::Cancelled);
                break;
            }
            if page > MAX_PAGES {
                failure = Some(ScrapeError::PaginationLimit {
                    context: target_label(target),
                    max_pages: MAX_PAGES,
                });
                break;
            }

            if page > 1 && self.inter_request_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.inter_request_delay_ms)).await;
            }

            let url = self.listing_url(target, page);
            let html = match self.client.fetch_page(&url).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::error!(
                        page,
                        error = %e,
                        "page fetch failed after retries — stopping with partial results"
                    );
                    failure = Some(e);
                    break;
                }
            };

            let parsed = match parse::parse_listing(&html, &url) {
                Ok(parsed) => parsed,
                // Without the first page there is no pagination meta to
                // continue from; later pages are dropped and the loop advances.
                Err(e) if page == 1 => {
                    failure = Some(e);
                    break;
                }
                Err(e) => {
                    tracing::warn!(page, error = %e, "unreadable page dropped");
                    if !filters.all_pages && page >= filters.max_pages {
                        break;
                    }
                    if page >= total_pages {
                        break;
                    }
                    page += 1;
                    continue;
                }
            };

            pages_fetched += 1;
            if reported_total.is_none() {
                reported_total = Some(parsed.total);
                total_pages = parsed.total_pages;
            }

            let records_on_page = parsed.records.len();
            let mut survivors: Vec<Business> = Vec::new();
            for raw in &parsed.records {
                let business = normalize_business(raw, self.client.base_url(), category_hint);
                if business.id.is_empty() {
                    tracing::debug!(page, "record without usable identifier skipped");
                    continue;
                }
                // First occurrence wins, also across pages.
                if !seen_ids.insert(business.id.clone()) {
                    tracing::debug!(id = %business.id, page, "duplicate business dropped");
                    continue;
                }
                if filter::matches(&business, filters) {
                    survivors.push(business);
                }
            }
            let kept = survivors.len();

            if enrich.enabled && !survivors.is_empty() {
                survivors = enrich_all(
                    &self.client,
                    survivors,
                    filters.language.as_deref(),
                    enrich.max_reviews,
                    self.enrich_concurrency,
                    cancel,
                )
                .await;
            }
            businesses.extend(survivors);

            tracing::info!(page, records = records_on_page, kept, "listing page processed");

            // Stop conditions, evaluated in fixed order.
            if records_on_page == 0 {
                break;
            }
            if !filters.all_pages && page >= filters.max_pages {
                break;
            }
            if page >= total_pages {
                break;
            }
            page += 1;
        }

        RunOutcome {
            result: ResultSet {
                businesses,
                total: reported_total.unwrap_or(0),
                pages: pages_fetched,
            },
            failure,
        }
    }

    fn listing_url(&self, target: &SearchTarget, page: u32) -> String {
        match target {
            SearchTarget::Category {
                category_id,
                country,
            } => self
                .client
                .category_url(category_id, country.as_deref(), page),
            SearchTarget::Keyword { query, country } => {
                self.client.search_url(query, country.as_deref(), page)
            }
            SearchTarget::Detail { domain } => self.client.review_url(domain),
        }
    }
}

fn detail_outcome(businesses: Vec<Business>, failure: Option<ScrapeError>) -> RunOutcome {
    #[allow(clippy::cast_possible_wrap)]
    let total = businesses.len() as i64;
    RunOutcome {
        result: ResultSet {
            businesses,
            total,
            pages: 1,
        },
        failure,
    }
}

fn target_label(target: &SearchTarget) -> String {
    match target {
        SearchTarget::Category { category_id, .. } => format!("category {category_id}"),
        SearchTarget::Keyword { query, .. } => format!("search \"{query}\""),
        SearchTarget::Detail { domain } => format!("domain {domain}"),
    }
}
