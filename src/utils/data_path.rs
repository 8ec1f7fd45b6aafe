use crate::errors::BridgeError;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Parses a body path such as `scrapeOptions.formats` or `urls[0]`.
pub fn parse_path(path: &str) -> Result<Vec<PathSegment>, BridgeError> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(BridgeError::invalid_params("Body path must be a non-empty string"));
    }
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_brackets = false;
    for ch in trimmed.chars() {
        match ch {
            '.' if !in_brackets => {
                push_segment(&mut segments, &current);
                current.clear();
            }
            '[' => {
                push_segment(&mut segments, &current);
                current.clear();
                in_brackets = true;
            }
            ']' => {
                push_segment(&mut segments, &current);
                current.clear();
                in_brackets = false;
            }
            _ => current.push(ch),
        }
    }
    if in_brackets {
        return Err(BridgeError::invalid_params(format!(
            "Body path '{}' has an unclosed bracket",
            path
        )));
    }
    push_segment(&mut segments, &current);
    if segments.is_empty() {
        return Err(BridgeError::invalid_params(format!(
            "Body path '{}' has no segments",
            path
        )));
    }
    Ok(segments)
}

fn push_segment(segments: &mut Vec<PathSegment>, raw: &str) {
    let trimmed = raw.trim().trim_matches('"').trim_matches('\'').trim();
    if trimmed.is_empty() {
        return;
    }
    match trimmed.parse::<usize>() {
        Ok(index) => segments.push(PathSegment::Index(index)),
        Err(_) => segments.push(PathSegment::Key(trimmed.to_string())),
    }
}

/// Writes `value` at `path`, creating intermediate objects (or padding arrays
/// with nulls) as needed. A non-container in the way is replaced.
pub fn set_path_value(
    target: &mut Map<String, Value>,
    path: &str,
    value: Value,
) -> Result<(), BridgeError> {
    let segments = parse_path(path)?;
    let (first, rest) = match segments.split_first() {
        Some(split) => split,
        None => return Ok(()),
    };
    let PathSegment::Key(root_key) = first else {
        return Err(BridgeError::invalid_params(format!(
            "Body path '{}' must start with a key",
            path
        )));
    };
    if rest.is_empty() {
        target.insert(root_key.clone(), value);
        return Ok(());
    }
    let slot = target.entry(root_key.clone()).or_insert(Value::Null);
    write_nested(slot, rest, value);
    Ok(())
}

fn write_nested(slot: &mut Value, segments: &[PathSegment], value: Value) {
    let Some((head, tail)) = segments.split_first() else {
        *slot = value;
        return;
    };
    match head {
        PathSegment::Key(key) => {
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(map) = slot {
                let child = map.entry(key.clone()).or_insert(Value::Null);
                write_nested(child, tail, value);
            }
        }
        PathSegment::Index(index) => {
            if !slot.is_array() {
                *slot = Value::Array(Vec::new());
            }
            if let Value::Array(items) = slot {
                while items.len() <= *index {
                    items.push(Value::Null);
                }
                write_nested(&mut items[*index], tail, value);
            }
        }
    }
}
