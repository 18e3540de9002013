use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use trustscan_core::RunRequest;
use trustscan_scraper::{EnrichPolicy, ScrapeRunner};

mod export;

#[derive(Debug, Parser)]
#[command(name = "trustscan")]
#[command(about = "Extract normalized business profiles from review-platform pages")]
struct Cli {
    /// Path to the JSON run request (searchType, filters, pagination).
    #[arg(long, default_value = "data/input.json")]
    input: PathBuf,

    /// Path where the JSON result envelope is written.
    #[arg(long, default_value = "data/output.json")]
    output: PathBuf,

    /// Enable debug logging.
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = trustscan_core::load_app_config_from_env()?;
    init_tracing(cli.verbose, &config.log_level);
    tracing::debug!(?config, "configuration loaded");

    let raw = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read input file {}", cli.input.display()))?;
    let request: RunRequest = serde_json::from_str(&raw)
        .with_context(|| format!("invalid run request in {}", cli.input.display()))?;

    let target = request.target()?;
    let filters = request.filters()?;
    let enrich = EnrichPolicy {
        enabled: request.include_reviews,
        max_reviews: request.max_reviews_per_company,
    };
    tracing::info!(?target, "starting scrape run");

    let runner = ScrapeRunner::from_config(&config)?;

    // Ctrl-C flips the flag; the driver drains to a partial result instead
    // of dropping what it already gathered.
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("cancellation requested — finishing the current page");
                cancel.store(true, Ordering::SeqCst);
            }
        });
    }

    let outcome = runner.run(&target, &filters, &enrich, &cancel).await;

    export::write_outcome(&cli.output, &outcome)?;

    match &outcome.failure {
        Some(cause) => {
            tracing::error!(
                businesses = outcome.result.businesses.len(),
                pages = outcome.result.pages,
                %cause,
                "run ended early — partial results written"
            );
            anyhow::bail!(
                "partial run ({} businesses over {} pages): {cause}",
                outcome.result.businesses.len(),
                outcome.result.pages
            );
        }
        None => {
            tracing::info!(
                businesses = outcome.result.businesses.len(),
                pages = outcome.result.pages,
                total = outcome.result.total,
                "run complete"
            );
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool, log_level: &str) {
    let default = if verbose { "debug" } else { log_level };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
