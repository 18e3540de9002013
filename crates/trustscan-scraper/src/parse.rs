//! Embedded structured-data extraction from review-platform pages.
//!
//! Listing, search, and review pages embed `application/ld+json` script
//! blocks. Listing pages carry a sequence of `Organization` /
//! `LocalBusiness` nodes plus an `ItemList` with the total result count;
//! detail pages carry a single business node; review pages additionally
//! carry `Review` nodes.
//!
//! This module only locates and decodes the payload. Raw nested structures
//! pass through unchanged as [`RawRecord`]s; all field mapping lives in
//! [`crate::normalize`].

use regex::Regex;
use serde_json::Value;

use crate::error::ScrapeError;

/// Businesses shown per listing page; fixed by the source site.
pub(crate) const PAGE_SIZE: u32 = 20;

/// A business record exactly as it appears in the page payload,
/// pre-normalization. Shape varies by mode; never escapes the pipeline
/// except into the normalizer.
pub type RawRecord = Value;

/// One parsed page: the raw business records it carries plus the
/// pagination metadata derived from the payload.
#[derive(Debug)]
pub struct ParsedPage {
    pub records: Vec<RawRecord>,
    /// Source-reported total result count. Falls back to the number of
    /// records on this page when the payload carries no `ItemList`.
    pub total: i64,
    /// Total pages available, derived from `total` and [`PAGE_SIZE`].
    /// `1` when the payload reports no total.
    pub total_pages: u32,
}

/// Parses one category/search listing page.
///
/// # Errors
///
/// - [`ScrapeError::MissingPayload`] — the page has no ld+json script blocks.
/// - [`ScrapeError::MalformedPayload`] — blocks exist but none decode as JSON.
pub fn parse_listing(html: &str, url: &str) -> Result<ParsedPage, ScrapeError> {
    let blocks = decode_payload_blocks(html, url)?;

    let mut records = Vec::new();
    let mut reported_total: Option<i64> = None;

    for block in &blocks {
        for node in block_items(block) {
            if is_business_node(node) {
                records.push(node.clone());
            } else if let Some(total) = item_list_total(node) {
                // First ItemList wins; listing pages carry exactly one.
                reported_total.get_or_insert(total);
            }
        }
    }

    let total_pages = reported_total.map_or(1, pages_for_total);
    #[allow(clippy::cast_possible_wrap)]
    let total = reported_total.unwrap_or(records.len() as i64);

    Ok(ParsedPage {
        records,
        total,
        total_pages,
    })
}

/// Parses a single business detail page. Yields at most one record; an
/// empty record list means the page rendered without business data.
///
/// # Errors
///
/// Same conditions as [`parse_listing`].
pub fn parse_detail(html: &str, url: &str) -> Result<ParsedPage, ScrapeError> {
    let blocks = decode_payload_blocks(html, url)?;

    let record = blocks
        .iter()
        .flat_map(|block| block_items(block))
        .find(|node| is_business_node(node))
        .cloned();

    let records: Vec<RawRecord> = record.into_iter().collect();
    #[allow(clippy::cast_possible_wrap)]
    let total = records.len() as i64;

    Ok(ParsedPage {
        records,
        total,
        total_pages: 1,
    })
}

/// Extracts every `Review`-typed node from a review page's payload,
/// wherever it nests (top level, `@graph`, or inside the business node's
/// `review` list). Returns an empty list when the page has no usable
/// payload — review extraction failures are never fatal.
#[must_use]
pub fn parse_reviews(html: &str) -> Vec<RawRecord> {
    let (_, blocks, _) = extract_payload_blocks(html);
    let mut reviews = Vec::new();
    for block in &blocks {
        collect_review_nodes(block, &mut reviews);
    }
    reviews
}

/// Locates and decodes the ld+json blocks, mapping payload absence and
/// total decode failure onto the crate error taxonomy.
fn decode_payload_blocks(html: &str, url: &str) -> Result<Vec<Value>, ScrapeError> {
    let (script_count, blocks, last_err) = extract_payload_blocks(html);

    if script_count == 0 {
        return Err(ScrapeError::MissingPayload {
            url: url.to_owned(),
        });
    }
    if blocks.is_empty() {
        // Blocks were present but none decoded; surface the last decode error.
        if let Some(source) = last_err {
            return Err(ScrapeError::MalformedPayload {
                context: url.to_owned(),
                source,
            });
        }
        return Err(ScrapeError::MissingPayload {
            url: url.to_owned(),
        });
    }
    Ok(blocks)
}

/// Scans `html` for `<script type="application/ld+json">` blocks and
/// decodes each body as JSON. Returns the raw block count, the decoded
/// values, and the last decode error (if any block failed).
fn extract_payload_blocks(html: &str) -> (usize, Vec<Value>, Option<serde_json::Error>) {
    let script_re = Regex::new(
        r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#,
    )
    .expect("valid ld+json script regex");

    let mut count = 0usize;
    let mut blocks = Vec::new();
    let mut last_err = None;

    for cap in script_re.captures_iter(html) {
        count += 1;
        let raw = cap.get(1).map_or("", |m| m.as_str()).trim();
        if raw.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => blocks.push(value),
            Err(e) => {
                tracing::debug!(error = %e, "skipping undecodable ld+json block");
                last_err = Some(e);
            }
        }
    }

    (count, blocks, last_err)
}

/// Flattens one decoded block into its item nodes: a top-level array
/// yields its elements, an object with `@graph` yields the graph entries,
/// any other object yields itself.
fn block_items(block: &Value) -> Vec<&Value> {
    match block {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => map
            .get("@graph")
            .and_then(Value::as_array)
            .map_or_else(|| vec![block], |graph| graph.iter().collect()),
        _ => Vec::new(),
    }
}

/// Whether a node's `@type` (string or array, case-insensitive) marks it
/// as a business record.
fn is_business_node(node: &Value) -> bool {
    type_matches(node, |t| t == "organization" || t == "localbusiness")
}

/// Reads an `ItemList` node's `numberOfItems`, accepting a JSON number or
/// a numeric string.
fn item_list_total(node: &Value) -> Option<i64> {
    if !type_matches(node, |t| t == "itemlist") {
        return None;
    }
    let raw = node.get("numberOfItems")?;
    raw.as_i64()
        .or_else(|| raw.as_str().and_then(|s| s.parse::<i64>().ok()))
}

fn type_matches(node: &Value, predicate: impl Fn(&str) -> bool) -> bool {
    let Some(node_type) = node.get("@type") else {
        return false;
    };
    match node_type {
        Value::String(s) => predicate(&s.to_lowercase()),
        Value::Array(values) => values
            .iter()
            .filter_map(Value::as_str)
            .any(|s| predicate(&s.to_lowercase())),
        _ => false,
    }
}

/// Recursively collects `Review`-typed nodes.
fn collect_review_nodes(value: &Value, out: &mut Vec<RawRecord>) {
    match value {
        Value::Object(map) => {
            if type_matches(value, |t| t == "review") {
                out.push(value.clone());
            }
            for child in map.values() {
                collect_review_nodes(child, out);
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_review_nodes(child, out);
            }
        }
        _ => {}
    }
}

/// Pages needed to cover `total` results at [`PAGE_SIZE`] per page.
fn pages_for_total(total: i64) -> u32 {
    if total <= 0 {
        return 1;
    }
    let per_page = i64::from(PAGE_SIZE);
    let pages = (total + per_page - 1) / per_page;
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
