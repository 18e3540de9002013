use thiserror::Error;

/// Errors produced while loading [`crate::AppConfig`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Errors produced while validating a [`crate::RunRequest`].
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("unsupported searchType: {0}")]
    UnsupportedSearchType(String),

    #[error("searchType \"{search_type}\" requires the \"{field}\" field")]
    MissingField {
        search_type: &'static str,
        field: &'static str,
    },

    #[error("invalid value for \"{field}\": {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },
}
