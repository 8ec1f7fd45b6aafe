use firecrawl_bridge::services::body_merger::{apply_custom_properties, drop_zero_delay};
use firecrawl_bridge::{BridgeErrorKind, OverridePayload, RequestBody, RequestBodyMerger};
use serde_json::{json, Value};

fn body(value: Value) -> RequestBody {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

#[test]
fn body_without_custom_body_is_returned_unchanged() {
    let merger = RequestBodyMerger::default();
    let input = body(json!({"url": "https://a.com", "limit": 5, "integration": "n8n"}));
    assert_eq!(merger.merge(input.clone()), input);
}

#[test]
fn override_keys_win_and_custom_body_is_removed() {
    let merger = RequestBodyMerger::default();
    let merged = merger.merge(body(json!({
        "url": "https://a.com",
        "limit": 10,
        "customBody": {"limit": 3, "formats": ["html"]}
    })));
    assert_eq!(
        Value::Object(merged),
        json!({"url": "https://a.com", "limit": 3, "formats": ["html"]})
    );
}

#[test]
fn protected_integration_key_survives_override() {
    let merger = RequestBodyMerger::default();
    let merged = merger.merge(body(json!({
        "integration": "firecrawl-bridge",
        "customBody": {"integration": "spoofed", "url": "https://b.com"}
    })));
    assert_eq!(merged["integration"], json!("firecrawl-bridge"));
    assert_eq!(merged["url"], json!("https://b.com"));
}

#[test]
fn unset_protected_key_can_be_filled_by_override() {
    let merger = RequestBodyMerger::default();
    let merged = merger.merge(body(json!({
        "integration": "",
        "customBody": {"integration": "mine"}
    })));
    assert_eq!(merged["integration"], json!("mine"));
}

#[test]
fn non_object_custom_body_is_left_alone() {
    let merger = RequestBodyMerger::default();
    let input = body(json!({"url": "https://a.com", "customBody": "not an object"}));
    assert_eq!(merger.merge(input.clone()), input);
}

#[test]
fn merge_is_idempotent() {
    let merger = RequestBodyMerger::new(["integration", "origin"]);
    let once = merger.merge(body(json!({
        "integration": "tag",
        "origin": "cli",
        "customBody": {"origin": "x", "timeout": 1000, "customBody": {"nested": true}}
    })));
    assert!(!once.contains_key("customBody"));
    let twice = merger.merge(once.clone());
    assert_eq!(once, twice);
    assert_eq!(once["origin"], json!("cli"));
}

#[test]
fn override_payload_rejects_bad_json_and_non_objects() {
    let err = OverridePayload::parse("{\"limit\": ").expect_err("bad json");
    assert_eq!(err.kind, BridgeErrorKind::InvalidJson);
    let err = OverridePayload::parse("[1, 2]").expect_err("array");
    assert_eq!(err.kind, BridgeErrorKind::InvalidJson);
    assert!(OverridePayload::parse("   ").expect("blank").as_map().is_empty());
}

#[test]
fn override_payload_embeds_under_reserved_key() {
    let payload = OverridePayload::parse("{\"limit\": 2}").expect("payload");
    let mut target = RequestBody::new();
    payload.embed(&mut target);
    assert_eq!(Value::Object(target), json!({"customBody": {"limit": 2}}));
}

#[test]
fn custom_properties_are_applied_and_wrapper_removed() {
    let mut target = body(json!({
        "url": "https://a.com",
        "additionalFields": {"customProperties": "{\"zeroDataRetention\": true}"}
    }));
    assert!(apply_custom_properties(&mut target));
    assert_eq!(
        Value::Object(target),
        json!({"url": "https://a.com", "zeroDataRetention": true})
    );
}

#[test]
fn malformed_custom_properties_are_skipped() {
    let mut target = body(json!({
        "url": "https://a.com",
        "additionalFields": {"customProperties": "{oops"}
    }));
    assert!(!apply_custom_properties(&mut target));
    assert_eq!(Value::Object(target), json!({"url": "https://a.com"}));
}

#[test]
fn zero_delay_is_dropped_but_positive_delay_kept() {
    let mut zero = body(json!({"delay": 0, "limit": 1}));
    drop_zero_delay(&mut zero);
    assert!(!zero.contains_key("delay"));

    let mut positive = body(json!({"delay": 2}));
    drop_zero_delay(&mut positive);
    assert_eq!(positive["delay"], json!(2));
}
