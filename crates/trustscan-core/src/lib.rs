pub mod app_config;
pub mod config;
pub mod error;
pub mod request;
pub mod types;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, RequestError};
pub use request::{FilterConfig, RunRequest, SearchTarget};
pub use types::{
    AiSummary, Business, Consumer, Rating, ResultSet, Review, ReviewDate, SimilarBusinessUnit,
    StarBreakdown,
};
