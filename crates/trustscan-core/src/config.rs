use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable carries an unparseable value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a variable carries an unparseable value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let base_url = or_default("TRUSTSCAN_BASE_URL", "https://www.trustpilot.com")
        .trim_end_matches('/')
        .to_owned();
    let log_level = or_default("TRUSTSCAN_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("TRUSTSCAN_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default(
        "TRUSTSCAN_USER_AGENT",
        "trustscan/0.1 (business-profile-extraction)",
    );
    let max_retries = parse_u32("TRUSTSCAN_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("TRUSTSCAN_RETRY_BACKOFF_BASE_SECS", "5")?;
    let inter_request_delay_ms = parse_u64("TRUSTSCAN_INTER_REQUEST_DELAY_MS", "250")?;
    let enrich_concurrency = parse_usize("TRUSTSCAN_ENRICH_CONCURRENCY", "4")?;

    let proxy_urls = parse_proxy_list(&or_default("TRUSTSCAN_PROXIES", ""));

    Ok(AppConfig {
        base_url,
        log_level,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        inter_request_delay_ms,
        enrich_concurrency,
        proxy_urls,
    })
}

/// Splits a comma-separated proxy list, dropping empty entries.
fn parse_proxy_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
