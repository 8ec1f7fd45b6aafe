use crate::errors::BridgeError;
use crate::services::body_merger::json_type_name;
use jsonschema::JSONSchema;
use serde_json::Value;

/// Parses a user-entered JSON Schema (text or inline object) and checks that it
/// compiles. Blank text means "no schema".
pub fn parse_json_schema(raw: &Value, label: &str) -> Result<Option<Value>, BridgeError> {
    let schema = match raw {
        Value::Null => return Ok(None),
        Value::String(text) if text.trim().is_empty() => return Ok(None),
        Value::String(text) => serde_json::from_str::<Value>(text).map_err(|err| {
            BridgeError::invalid_json(format!("{} is not valid JSON: {}", label, err))
        })?,
        other => other.clone(),
    };

    if !schema.is_object() && !schema.is_boolean() {
        return Err(BridgeError::invalid_json(format!(
            "{} must be a JSON object, got {}",
            label,
            json_type_name(&schema)
        )));
    }

    if let Err(err) = JSONSchema::compile(&schema) {
        return Err(
            BridgeError::invalid_json(format!("{} is not a valid JSON Schema: {}", label, err))
                .with_details(serde_json::json!({ "schema": schema.clone() })),
        );
    }
    Ok(Some(schema))
}

#[cfg(test)]
mod tests {
    use super::parse_json_schema;
    use crate::errors::BridgeErrorKind;
    use serde_json::json;

    #[test]
    fn parses_schema_text() {
        let raw = json!("{\"type\": \"object\", \"properties\": {\"title\": {\"type\": \"string\"}}}");
        let schema = parse_json_schema(&raw, "schema").expect("schema").expect("some");
        assert_eq!(schema["properties"]["title"]["type"], json!("string"));
    }

    #[test]
    fn blank_text_means_no_schema() {
        assert_eq!(parse_json_schema(&json!("  "), "schema").expect("ok"), None);
        assert_eq!(parse_json_schema(&json!(null), "schema").expect("ok"), None);
    }

    #[test]
    fn rejects_malformed_text_and_non_objects() {
        let err = parse_json_schema(&json!("{\"type\":"), "schema").expect_err("bad json");
        assert_eq!(err.kind, BridgeErrorKind::InvalidJson);
        let err = parse_json_schema(&json!("[1]"), "schema").expect_err("array");
        assert!(err.message.contains("array"));
    }

    #[test]
    fn rejects_schema_that_does_not_compile() {
        let err = parse_json_schema(&json!({"type": 12}), "schema").expect_err("invalid schema");
        assert_eq!(err.kind, BridgeErrorKind::InvalidJson);
    }
}
