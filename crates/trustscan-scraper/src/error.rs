use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("no embedded structured data payload in page: {url}")]
    MissingPayload { url: String },

    #[error("malformed structured data payload for {context}: {source}")]
    MalformedPayload {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("pagination limit reached for {context}: exceeded {max_pages} pages")]
    PaginationLimit { context: String, max_pages: u32 },

    #[error("run cancelled")]
    Cancelled,
}
