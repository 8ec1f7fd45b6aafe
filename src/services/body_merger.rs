//! Pre-send body assembly: the `customBody` override merge and the smaller
//! clean-up steps that run on the generated body before it is serialised.

use crate::constants::body::{
    ADDITIONAL_FIELDS_KEY, CUSTOM_BODY_KEY, CUSTOM_PROPERTIES_KEY, INTEGRATION_KEY,
};
use crate::errors::BridgeError;
use crate::utils::merge::merge_shallow;
use serde_json::{Map, Value};

pub type RequestBody = Map<String, Value>;

/// Merges the reserved `customBody` object over a generated request body.
///
/// Keys listed as protected keep the value they had before the merge, provided
/// that value was set (truthy). An override can still fill a protected key that
/// was unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBodyMerger {
    protected_keys: Vec<String>,
}

impl Default for RequestBodyMerger {
    fn default() -> Self {
        Self::new([INTEGRATION_KEY])
    }
}

impl RequestBodyMerger {
    pub fn new<I, S>(protected_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut keys: Vec<String> = Vec::new();
        for key in protected_keys {
            let key: String = key.into();
            let key = key.trim();
            if key.is_empty() || keys.iter().any(|existing| existing == key) {
                continue;
            }
            keys.push(key.to_string());
        }
        Self {
            protected_keys: keys,
        }
    }

    pub fn protected_keys(&self) -> &[String] {
        &self.protected_keys
    }

    /// Returns the body unchanged when `customBody` is absent or not an object.
    pub fn merge(&self, mut body: RequestBody) -> RequestBody {
        if !matches!(body.get(CUSTOM_BODY_KEY), Some(Value::Object(_))) {
            return body;
        }
        let Some(Value::Object(overlay)) = body.remove(CUSTOM_BODY_KEY) else {
            return body;
        };

        let captured: Vec<(String, Value)> = self
            .protected_keys
            .iter()
            .filter_map(|key| {
                body.get(key)
                    .filter(|value| is_truthy(value))
                    .map(|value| (key.clone(), value.clone()))
            })
            .collect();

        merge_shallow(&mut body, &overlay);
        // The override itself may carry a nested customBody; it never survives.
        body.remove(CUSTOM_BODY_KEY);

        for (key, value) in captured {
            body.insert(key, value);
        }
        body
    }
}

/// A user-entered override object, parsed at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct OverridePayload(Map<String, Value>);

impl OverridePayload {
    pub fn parse(raw: &str) -> Result<Self, BridgeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self(Map::new()));
        }
        let value: Value = serde_json::from_str(trimmed).map_err(|err| {
            BridgeError::invalid_json(format!("Custom body is not valid JSON: {}", err))
                .with_hint("Pass a JSON object, e.g. {\"url\": \"https://example.com\"}")
        })?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, BridgeError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(BridgeError::invalid_json(format!(
                "Custom body must be a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Places the override under the reserved key for [`RequestBodyMerger::merge`].
    pub fn embed(self, body: &mut RequestBody) {
        body.insert(CUSTOM_BODY_KEY.to_string(), Value::Object(self.0));
    }
}

/// Applies `additionalFields.customProperties` (JSON text) onto the body.
///
/// Malformed text is skipped. The `additionalFields` wrapper is always removed.
/// Returns whether any custom property was applied.
pub fn apply_custom_properties(body: &mut RequestBody) -> bool {
    let Some(wrapper) = body.remove(ADDITIONAL_FIELDS_KEY) else {
        return false;
    };
    let raw = match wrapper.get(CUSTOM_PROPERTIES_KEY) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Object(map)) => {
            merge_shallow(body, map);
            return !map.is_empty();
        }
        _ => return false,
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => {
            merge_shallow(body, &map);
            !map.is_empty()
        }
        _ => false,
    }
}

/// A crawl `delay` of zero means "no delay" and is not sent.
pub fn drop_zero_delay(body: &mut RequestBody) {
    let is_zero = body
        .get("delay")
        .and_then(Value::as_f64)
        .map(|delay| delay == 0.0)
        .unwrap_or(false);
    if is_zero {
        body.remove("delay");
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_custom_properties, drop_zero_delay, OverridePayload, RequestBodyMerger};
    use crate::errors::BridgeErrorKind;
    use serde_json::{json, Map, Value};

    fn body(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("object body")
    }

    #[test]
    fn new_dedupes_and_skips_blank_keys() {
        let merger = RequestBodyMerger::new(["integration", " ", "integration", "origin"]);
        assert_eq!(merger.protected_keys(), ["integration", "origin"]);
    }

    #[test]
    fn falsy_protected_value_does_not_block_override() {
        let merger = RequestBodyMerger::default();
        let out = merger.merge(body(json!({
            "integration": "",
            "customBody": {"integration": "from-override"}
        })));
        assert_eq!(out["integration"], json!("from-override"));
    }

    #[test]
    fn nested_custom_body_inside_override_is_dropped() {
        let merger = RequestBodyMerger::default();
        let out = merger.merge(body(json!({
            "customBody": {"url": "https://a.dev", "customBody": {"x": 1}}
        })));
        assert_eq!(Value::Object(out), json!({"url": "https://a.dev"}));
    }

    #[test]
    fn empty_protected_list_lets_override_win_everywhere() {
        let merger = RequestBodyMerger::new(Vec::<String>::new());
        let out = merger.merge(body(json!({
            "integration": "cli",
            "customBody": {"integration": "other"}
        })));
        assert_eq!(out["integration"], json!("other"));
    }

    #[test]
    fn override_payload_rejects_non_objects_and_bad_json() {
        let err = OverridePayload::parse("[1, 2]").expect_err("array must fail");
        assert_eq!(err.kind, BridgeErrorKind::InvalidJson);
        assert!(err.message.contains("array"));

        let err = OverridePayload::parse("{\"url\": ").expect_err("truncated json must fail");
        assert_eq!(err.kind, BridgeErrorKind::InvalidJson);
    }

    #[test]
    fn override_payload_blank_text_is_empty_object() {
        let payload = OverridePayload::parse("  ").expect("blank");
        assert!(payload.as_map().is_empty());
    }

    #[test]
    fn custom_properties_are_assigned_and_wrapper_removed() {
        let mut target = body(json!({
            "url": "https://a.dev",
            "additionalFields": {"customProperties": "{\"maxAge\": 3600, \"url\": \"https://b.dev\"}"}
        }));
        assert!(apply_custom_properties(&mut target));
        assert_eq!(
            Value::Object(target),
            json!({"url": "https://b.dev", "maxAge": 3600})
        );
    }

    #[test]
    fn malformed_custom_properties_are_skipped() {
        let mut target = body(json!({
            "url": "https://a.dev",
            "additionalFields": {"customProperties": "{not json"}
        }));
        assert!(!apply_custom_properties(&mut target));
        assert_eq!(Value::Object(target), json!({"url": "https://a.dev"}));
    }

    #[test]
    fn zero_delay_is_removed_but_positive_kept() {
        let mut zero = body(json!({"delay": 0, "limit": 5}));
        drop_zero_delay(&mut zero);
        assert_eq!(Value::Object(zero), json!({"limit": 5}));

        let mut positive = body(json!({"delay": 250}));
        drop_zero_delay(&mut positive);
        assert_eq!(positive["delay"], json!(250));
    }
}
