use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;

use crate::error::ScrapeError;
use crate::retry::retry_with_backoff;

/// HTTP client for the review platform's public pages.
///
/// Handles rate limiting (429), not-found (404), and other non-2xx
/// responses as typed errors, and builds the listing/search/review URLs
/// the pagination driver fetches.
///
/// Transient errors (429, network failures, 5xx) are automatically retried
/// with exponential backoff up to `max_retries` additional attempts. When
/// proxies are configured, a random pool member handles each attempt, so a
/// retry usually leaves through a different exit.
pub struct TrustpilotClient {
    /// One `reqwest::Client` per configured proxy; a single direct client
    /// when no proxies are configured.
    clients: Vec<Client>,
    base_url: String,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

impl TrustpilotClient {
    /// Creates a client with configured timeout, `User-Agent`, proxy pool,
    /// and retry policy.
    ///
    /// `max_retries` is the number of additional attempts after the first
    /// failure for retriable errors. Set to `0` to disable retries.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if an underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config or proxy URL).
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        proxy_urls: &[String],
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScrapeError> {
        let mut clients = Vec::with_capacity(proxy_urls.len().max(1));
        if proxy_urls.is_empty() {
            clients.push(build_client(timeout_secs, user_agent, None)?);
        } else {
            for proxy in proxy_urls {
                clients.push(build_client(timeout_secs, user_agent, Some(proxy))?);
            }
        }

        Ok(Self {
            clients,
            base_url: base_url.trim_end_matches('/').to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Builds a client from the shared [`trustscan_core::AppConfig`].
    ///
    /// # Errors
    ///
    /// Propagates any error from [`TrustpilotClient::new`].
    pub fn from_config(config: &trustscan_core::AppConfig) -> Result<Self, ScrapeError> {
        Self::new(
            &config.base_url,
            config.request_timeout_secs,
            &config.user_agent,
            &config.proxy_urls,
            config.max_retries,
            config.retry_backoff_base_secs,
        )
    }

    /// The platform origin this client is pointed at, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches one page and returns its raw body, with automatic retry on
    /// transient errors.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::RateLimited`] — HTTP 429 after all retries exhausted.
    /// - [`ScrapeError::NotFound`] — HTTP 404 (not retried).
    /// - [`ScrapeError::UnexpectedStatus`] — any other non-2xx status
    ///   (5xx retried, 4xx not).
    /// - [`ScrapeError::Http`] — network or TLS failure after all retries exhausted.
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.to_owned();
            async move {
                let response = self.pick_client().get(&url).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);

                    return Err(ScrapeError::RateLimited {
                        domain: extract_domain(&url),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ScrapeError::NotFound { url });
                }

                if !status.is_success() {
                    return Err(ScrapeError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                Ok(response.text().await?)
            }
        })
        .await
    }

    /// URL of one category listing page, e.g.
    /// `https://host/categories/pet_stores?page=2&country=DE`.
    #[must_use]
    pub fn category_url(&self, category_id: &str, country: Option<&str>, page: u32) -> String {
        let mut url = format!("{}/categories/{category_id}?page={page}", self.base_url);
        if let Some(code) = country {
            url.push_str("&country=");
            url.push_str(&encode_query(code));
        }
        url
    }

    /// URL of one keyword search result page. The query is percent-encoded.
    #[must_use]
    pub fn search_url(&self, query: &str, country: Option<&str>, page: u32) -> String {
        let mut url = format!(
            "{}/search?query={}&page={page}",
            self.base_url,
            encode_query(query)
        );
        if let Some(code) = country {
            url.push_str("&country=");
            url.push_str(&encode_query(code));
        }
        url
    }

    /// URL of a single business's review page, e.g. `https://host/review/example.com`.
    #[must_use]
    pub fn review_url(&self, domain: &str) -> String {
        format!("{}/review/{domain}", self.base_url)
    }

    /// Picks the pool member for one attempt. Random selection spreads
    /// consecutive attempts across proxies.
    fn pick_client(&self) -> &Client {
        if self.clients.len() == 1 {
            &self.clients[0]
        } else {
            &self.clients[rand::random_range(0..self.clients.len())]
        }
    }
}

/// Builds one `reqwest::Client`, optionally routed through a proxy.
fn build_client(
    timeout_secs: u64,
    user_agent: &str,
    proxy_url: Option<&str>,
) -> Result<Client, ScrapeError> {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent);
    if let Some(url) = proxy_url {
        builder = builder.proxy(reqwest::Proxy::all(url)?);
    }
    Ok(builder.build()?)
}

/// Percent-encodes a query-string value.
fn encode_query(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

/// Extracts the hostname from a URL for use in error messages.
///
/// Falls back to the full URL string if parsing fails.
fn extract_domain(url: &str) -> String {
    // Avoid pulling in the `url` crate for this minor operation.
    // Strip scheme and take up to the first `/`.
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    without_scheme
        .split('/')
        .next()
        .unwrap_or(url)
        .to_owned()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
