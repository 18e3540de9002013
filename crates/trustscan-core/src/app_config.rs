/// Runtime configuration shared by the scraper and the CLI.
///
/// Every field has an environment default; see [`crate::config`] for the
/// variable names.
#[derive(Clone)]
pub struct AppConfig {
    /// Origin of the review platform, without a trailing slash.
    pub base_url: String,
    /// Default tracing filter when `RUST_LOG` is not set.
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure for retriable errors.
    pub max_retries: u32,
    /// Base delay for exponential backoff: `backoff_base_secs * 2^attempt`.
    pub retry_backoff_base_secs: u64,
    /// Delay between listing-page requests (applied after every page
    /// except the first).
    pub inter_request_delay_ms: u64,
    /// Upper bound on concurrent per-business review fetches.
    pub enrich_concurrency: usize,
    /// Proxy URLs to rotate through; empty means direct connections.
    pub proxy_urls: Vec<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("base_url", &self.base_url)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .field("enrich_concurrency", &self.enrich_concurrency)
            // Proxy URLs can embed credentials; log only how many there are.
            .field("proxy_urls", &format!("[{} configured]", self.proxy_urls.len()))
            .finish()
    }
}
