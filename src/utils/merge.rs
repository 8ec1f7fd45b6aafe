use serde_json::{Map, Value};

pub fn is_plain_object(value: &Value) -> bool {
    matches!(value, Value::Object(_))
}

/// Object-spread semantics: every key of `overlay` replaces the key in `base`.
pub fn merge_shallow(base: &mut Map<String, Value>, overlay: &Map<String, Value>) {
    for (key, value) in overlay.iter() {
        base.insert(key.clone(), value.clone());
    }
}

/// Recursively merges objects; non-null overlay values win, nested objects merge.
/// Used to layer the request defaults beneath an operation body.
pub fn merge_deep(base: &Value, overlay: &Value) -> Value {
    if !is_plain_object(base) || !is_plain_object(overlay) {
        if !overlay.is_null() {
            return overlay.clone();
        }
        return base.clone();
    }

    let mut result = match base {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };

    if let Value::Object(overlay_map) = overlay {
        for (key, value) in overlay_map.iter() {
            let merged = match result.get(key) {
                Some(existing) if is_plain_object(existing) && is_plain_object(value) => {
                    merge_deep(existing, value)
                }
                _ => value.clone(),
            };
            result.insert(key.clone(), merged);
        }
    }

    Value::Object(result)
}

#[cfg(test)]
mod tests {
    use super::{merge_deep, merge_shallow};
    use serde_json::json;

    #[test]
    fn merge_shallow_replaces_nested_objects_wholesale() {
        let mut base = json!({"a": 1, "nested": {"x": 1, "y": 2}})
            .as_object()
            .cloned()
            .expect("object");
        let overlay = json!({"nested": {"x": 9}, "b": true})
            .as_object()
            .cloned()
            .expect("object");
        merge_shallow(&mut base, &overlay);
        assert_eq!(
            serde_json::Value::Object(base),
            json!({"a": 1, "nested": {"x": 9}, "b": true})
        );
    }

    #[test]
    fn merge_deep_keeps_untouched_nested_keys() {
        let defaults = json!({"integration": "cli", "scrapeOptions": {"onlyMainContent": true}});
        let body = json!({"url": "https://example.com", "scrapeOptions": {"mobile": true}});
        assert_eq!(
            merge_deep(&defaults, &body),
            json!({
                "integration": "cli",
                "url": "https://example.com",
                "scrapeOptions": {"onlyMainContent": true, "mobile": true}
            })
        );
    }

    #[test]
    fn merge_deep_null_overlay_keeps_base() {
        assert_eq!(merge_deep(&json!({"a": 1}), &json!(null)), json!({"a": 1}));
    }
}
