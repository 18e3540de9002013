pub mod client;
pub mod driver;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod parse;
pub mod retry;

pub use client::TrustpilotClient;
pub use driver::{RunOutcome, ScrapeRunner};
pub use enrich::EnrichPolicy;
pub use error::ScrapeError;
pub use parse::{ParsedPage, RawRecord};
