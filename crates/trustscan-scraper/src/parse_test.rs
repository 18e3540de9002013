use super::*;

fn listing_html(payload: &str) -> String {
    format!(
        "<html><head><script type=\"application/ld+json\">{payload}</script></head><body></body></html>"
    )
}

fn business_json(id: &str, name: &str) -> String {
    format!(
        r#"{{"@type": "Organization", "@id": "{id}", "name": "{name}", "url": "https://reviews.example.org/review/{id}"}}"#
    )
}

#[test]
fn listing_page_yields_business_records() {
    let payload = format!(
        "[{}, {}]",
        business_json("alpha.com", "Alpha"),
        business_json("beta.com", "Beta")
    );
    let page = parse_listing(&listing_html(&payload), "https://x/categories/c?page=1").unwrap();
    assert_eq!(page.records.len(), 2);
    assert_eq!(page.records[0]["name"], "Alpha");
    assert_eq!(page.records[1]["name"], "Beta");
}

#[test]
fn listing_page_reads_total_from_item_list() {
    let payload = format!(
        r#"[{}, {{"@type": "ItemList", "numberOfItems": 87}}]"#,
        business_json("alpha.com", "Alpha")
    );
    let page = parse_listing(&listing_html(&payload), "https://x").unwrap();
    assert_eq!(page.total, 87);
    // 87 results at 20 per page.
    assert_eq!(page.total_pages, 5);
}

#[test]
fn listing_page_accepts_numeric_string_total() {
    let payload = format!(
        r#"[{}, {{"@type": "ItemList", "numberOfItems": "40"}}]"#,
        business_json("alpha.com", "Alpha")
    );
    let page = parse_listing(&listing_html(&payload), "https://x").unwrap();
    assert_eq!(page.total, 40);
    assert_eq!(page.total_pages, 2);
}

#[test]
fn listing_page_without_item_list_falls_back_to_record_count() {
    let payload = format!("[{}]", business_json("alpha.com", "Alpha"));
    let page = parse_listing(&listing_html(&payload), "https://x").unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.total_pages, 1);
}

#[test]
fn listing_page_skips_non_business_nodes() {
    let payload = format!(
        r#"[{{"@type": "BreadcrumbList", "itemListElement": []}}, {}]"#,
        business_json("alpha.com", "Alpha")
    );
    let page = parse_listing(&listing_html(&payload), "https://x").unwrap();
    assert_eq!(page.records.len(), 1);
}

#[test]
fn business_nodes_inside_graph_are_found() {
    let payload = format!(r#"{{"@graph": [{}]}}"#, business_json("alpha.com", "Alpha"));
    let page = parse_listing(&listing_html(&payload), "https://x").unwrap();
    assert_eq!(page.records.len(), 1);
}

#[test]
fn type_array_is_recognized() {
    let payload = r#"{"@type": ["Organization", "Corporation"], "name": "Alpha"}"#;
    let page = parse_listing(&listing_html(payload), "https://x").unwrap();
    assert_eq!(page.records.len(), 1);
}

#[test]
fn local_business_type_is_recognized() {
    let payload = r#"{"@type": "LocalBusiness", "name": "Corner Cafe"}"#;
    let page = parse_listing(&listing_html(payload), "https://x").unwrap();
    assert_eq!(page.records.len(), 1);
}

#[test]
fn page_without_payload_is_missing_payload() {
    let err = parse_listing("<html><body>plain page</body></html>", "https://x").unwrap_err();
    assert!(matches!(err, ScrapeError::MissingPayload { .. }));
}

#[test]
fn page_with_only_undecodable_payload_is_malformed() {
    let html = listing_html("{not json at all");
    let err = parse_listing(&html, "https://x").unwrap_err();
    assert!(matches!(err, ScrapeError::MalformedPayload { .. }));
}

#[test]
fn undecodable_block_is_skipped_when_another_decodes() {
    let html = format!(
        "<script type=\"application/ld+json\">{{broken</script>\
         <script type=\"application/ld+json\">{}</script>",
        business_json("alpha.com", "Alpha")
    );
    let page = parse_listing(&html, "https://x").unwrap();
    assert_eq!(page.records.len(), 1);
}

#[test]
fn detail_page_yields_single_record() {
    let payload = format!(
        "[{}, {}]",
        business_json("alpha.com", "Alpha"),
        business_json("beta.com", "Beta")
    );
    let page = parse_detail(&listing_html(&payload), "https://x/review/alpha.com").unwrap();
    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0]["name"], "Alpha");
    assert_eq!(page.total, 1);
    assert_eq!(page.total_pages, 1);
}

#[test]
fn detail_page_without_business_node_is_empty() {
    let payload = r#"{"@type": "BreadcrumbList"}"#;
    let page = parse_detail(&listing_html(payload), "https://x/review/gone.com").unwrap();
    assert!(page.records.is_empty());
    assert_eq!(page.total, 0);
    assert_eq!(page.total_pages, 1);
}

#[test]
fn reviews_are_collected_from_nested_payload() {
    let payload = r#"{
        "@type": "Organization",
        "name": "Alpha",
        "review": [
            {"@type": "Review", "headline": "Great", "reviewRating": {"ratingValue": 5}},
            {"@type": "Review", "headline": "Fine", "reviewRating": {"ratingValue": 3}}
        ]
    }"#;
    let reviews = parse_reviews(&listing_html(payload));
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0]["headline"], "Great");
}

#[test]
fn reviews_from_page_without_payload_are_empty() {
    assert!(parse_reviews("<html></html>").is_empty());
}

#[test]
fn pages_for_total_rounds_up() {
    assert_eq!(pages_for_total(1), 1);
    assert_eq!(pages_for_total(20), 1);
    assert_eq!(pages_for_total(21), 2);
    assert_eq!(pages_for_total(100), 5);
}

#[test]
fn pages_for_total_handles_degenerate_totals() {
    assert_eq!(pages_for_total(0), 1);
    assert_eq!(pages_for_total(-5), 1);
}

#[test]
fn script_attributes_in_any_order_are_matched() {
    let html = format!(
        "<script data-qa=\"ld\" type='application/ld+json' async>{}</script>",
        business_json("alpha.com", "Alpha")
    );
    let page = parse_listing(&html, "https://x").unwrap();
    assert_eq!(page.records.len(), 1);
}
