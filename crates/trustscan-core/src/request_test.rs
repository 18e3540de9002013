use super::*;

fn request_json(json: &str) -> RunRequest {
    serde_json::from_str(json).expect("valid request JSON")
}

#[test]
fn category_request_resolves_target() {
    let request = request_json(r#"{"searchType": "category", "categoryId": "pet_stores"}"#);
    let target = request.target().unwrap();
    assert_eq!(
        target,
        SearchTarget::Category {
            category_id: "pet_stores".to_owned(),
            country: None,
        }
    );
}

#[test]
fn category_request_carries_country() {
    let request = request_json(
        r#"{"searchType": "category", "categoryId": "pet_stores", "country": "DE"}"#,
    );
    let target = request.target().unwrap();
    assert_eq!(
        target,
        SearchTarget::Category {
            category_id: "pet_stores".to_owned(),
            country: Some("DE".to_owned()),
        }
    );
}

#[test]
fn category_request_without_category_id_is_rejected() {
    let request = request_json(r#"{"searchType": "category"}"#);
    let err = request.target().unwrap_err();
    assert!(
        matches!(err, RequestError::MissingField { field: "categoryId", .. }),
        "expected MissingField(categoryId), got: {err:?}"
    );
}

#[test]
fn keyword_request_resolves_target() {
    let request = request_json(r#"{"searchType": "keyword", "keyword": "coffee"}"#);
    assert_eq!(
        request.target().unwrap(),
        SearchTarget::Keyword {
            query: "coffee".to_owned(),
            country: None,
        }
    );
}

#[test]
fn keyword_request_without_keyword_is_rejected() {
    let request = request_json(r#"{"searchType": "keyword", "keyword": "  "}"#);
    let err = request.target().unwrap_err();
    assert!(matches!(
        err,
        RequestError::MissingField { field: "keyword", .. }
    ));
}

#[test]
fn detail_request_resolves_target() {
    let request = request_json(r#"{"searchType": "detail", "domain": "example.com"}"#);
    assert_eq!(
        request.target().unwrap(),
        SearchTarget::Detail {
            domain: "example.com".to_owned(),
        }
    );
}

#[test]
fn search_type_is_case_insensitive() {
    let request = request_json(r#"{"searchType": "Detail", "domain": "example.com"}"#);
    assert!(request.target().is_ok());
}

#[test]
fn unknown_search_type_is_rejected() {
    let request = request_json(r#"{"searchType": "firehose"}"#);
    assert!(matches!(
        request.target().unwrap_err(),
        RequestError::UnsupportedSearchType(ref t) if t == "firehose"
    ));
}

#[test]
fn filters_default_to_single_page_and_no_constraints() {
    let request = request_json(r#"{"searchType": "detail", "domain": "example.com"}"#);
    let filters = request.filters().unwrap();
    assert_eq!(filters, FilterConfig::default());
    assert_eq!(filters.max_pages, 1);
    assert!(!filters.all_pages);
}

#[test]
fn filters_accept_pages_alias_for_max_pages() {
    let request =
        request_json(r#"{"searchType": "category", "categoryId": "x", "pages": 3}"#);
    assert_eq!(request.filters().unwrap().max_pages, 3);
}

#[test]
fn filters_accept_min_reviews_alias() {
    let request =
        request_json(r#"{"searchType": "category", "categoryId": "x", "minReviews": 25}"#);
    assert_eq!(request.filters().unwrap().min_review_count, Some(25));
}

#[test]
fn filters_reject_out_of_range_trust_score() {
    let request = request_json(
        r#"{"searchType": "category", "categoryId": "x", "minTrustScore": 11.0}"#,
    );
    assert!(matches!(
        request.filters().unwrap_err(),
        RequestError::InvalidValue { field: "minTrustScore", .. }
    ));
}

#[test]
fn filters_accept_trustscore_alias() {
    let request =
        request_json(r#"{"searchType": "category", "categoryId": "x", "trustscore": 3.5}"#);
    assert_eq!(request.filters().unwrap().min_trust_score, Some(3.5));
}

#[test]
fn filters_reject_zero_max_pages() {
    let request =
        request_json(r#"{"searchType": "category", "categoryId": "x", "maxPages": 0}"#);
    assert!(matches!(
        request.filters().unwrap_err(),
        RequestError::InvalidValue { field: "maxPages", .. }
    ));
}

#[test]
fn empty_country_is_treated_as_absent() {
    let request = request_json(
        r#"{"searchType": "category", "categoryId": "x", "country": ""}"#,
    );
    assert!(request.filters().unwrap().country.is_none());
}
