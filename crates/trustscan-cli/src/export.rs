//! JSON result-envelope writer.
//!
//! Serializes the run outcome to the configured output path: the business
//! array plus the `total`/`pages` counters, a `status` of
//! `"complete"`/`"partial"`, and the failure cause on partial runs.
//! Written pretty-printed; parent directories are created as needed.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use trustscan_core::Business;
use trustscan_scraper::RunOutcome;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputEnvelope<'a> {
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    total: i64,
    pages: u32,
    businesses: &'a [Business],
}

/// Writes the outcome envelope to `path`.
///
/// # Errors
///
/// Fails when the parent directory cannot be created, the file cannot be
/// opened, or serialization fails.
pub fn write_outcome(path: &Path, outcome: &RunOutcome) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create output directory {}", parent.display()))?;
        }
    }

    let envelope = OutputEnvelope {
        status: outcome.status_label(),
        error: outcome.failure.as_ref().map(ToString::to_string),
        total: outcome.result.total,
        pages: outcome.result.pages,
        businesses: &outcome.result.businesses,
    };

    let file = File::create(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &envelope)
        .with_context(|| format!("failed to serialize results to {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        businesses = outcome.result.businesses.len(),
        status = envelope.status,
        "wrote result envelope"
    );
    Ok(())
}
