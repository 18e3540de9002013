use super::*;

fn minimal_business() -> Business {
    Business::empty("example.com".to_owned())
}

#[test]
fn absent_optionals_are_omitted_from_json() {
    let json = serde_json::to_value(minimal_business()).unwrap();
    let obj = json.as_object().unwrap();

    assert!(obj.contains_key("id"));
    assert!(
        !obj.contains_key("ratingValue"),
        "absent ratingValue must be omitted, not null"
    );
    assert!(!obj.contains_key("reviewCount"));
    assert!(!obj.contains_key("reviews"));
    assert!(!obj.contains_key("lastReviews"));
    assert!(!obj.contains_key("aiSummary"));
    assert!(!obj.contains_key("similarBusinessUnits"));
}

#[test]
fn fetched_but_empty_reviews_serialize_as_empty_array() {
    let mut business = minimal_business();
    business.reviews = Some(Vec::new());

    let json = serde_json::to_value(business).unwrap();
    assert_eq!(json["reviews"], serde_json::json!([]));
}

#[test]
fn categories_id_uses_exact_wire_name() {
    let mut business = minimal_business();
    business.categories = vec!["Pet Stores".to_owned()];
    business.categories_id = vec!["pet-stores".to_owned()];

    let json = serde_json::to_value(business).unwrap();
    assert_eq!(json["categoriesID"], serde_json::json!(["pet-stores"]));
    assert!(json.get("categoriesId").is_none());
}

#[test]
fn camel_case_field_names_on_the_wire() {
    let mut business = minimal_business();
    business.zip_code = Some("10115".to_owned());
    business.rating_value = Some("4.5".to_owned());
    business.source_url = Some("https://example.org/review/example.com".to_owned());

    let json = serde_json::to_value(business).unwrap();
    assert_eq!(json["zipCode"], "10115");
    assert_eq!(json["ratingValue"], "4.5");
    assert_eq!(json["sourceUrl"], "https://example.org/review/example.com");
}

#[test]
fn business_round_trips_through_json() {
    let mut business = minimal_business();
    business.name = Some("Example".to_owned());
    business.rating = Some(Rating {
        best_rating: "5".to_owned(),
        worst_rating: "1".to_owned(),
        rating_value: Some("4.2".to_owned()),
        review_count: Some("120".to_owned()),
    });
    business.data = Some(StarBreakdown {
        five: 80,
        four: 20,
        three: 10,
        two: 5,
        one: 5,
        total: 120,
    });

    let json = serde_json::to_string(&business).unwrap();
    let back: Business = serde_json::from_str(&json).unwrap();
    assert_eq!(back, business);
}

#[test]
fn consumer_verification_defaults_to_false() {
    let consumer: Consumer = serde_json::from_str(r#"{"displayName":"Jane"}"#).unwrap();
    assert!(!consumer.is_verified);
    assert_eq!(consumer.display_name.as_deref(), Some("Jane"));
}
