use crate::constants::media::PLACEHOLDER_MIME_TYPE;
use base64::Engine;
use bytes::Bytes;
use serde_json::Value;

/// Attachment carried by an output item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryData {
    pub data: Bytes,
    pub mime_type: String,
    pub file_name: Option<String>,
    pub file_type: Option<String>,
    pub file_extension: Option<String>,
}

impl BinaryData {
    /// What the transport attaches before the real content type is applied.
    pub fn placeholder(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            mime_type: PLACEHOLDER_MIME_TYPE.to_string(),
            file_name: None,
            file_type: None,
            file_extension: None,
        }
    }

    pub fn is_placeholder_type(&self) -> bool {
        self.mime_type == PLACEHOLDER_MIME_TYPE
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn to_json(&self, include_data: bool) -> Value {
        let mut out = serde_json::json!({
            "mimeType": self.mime_type,
            "fileName": self.file_name,
            "fileType": self.file_type,
            "fileExtension": self.file_extension,
            "fileSize": self.data.len(),
        });
        if include_data {
            if let Value::Object(map) = &mut out {
                map.insert(
                    "data".to_string(),
                    Value::String(base64::engine::general_purpose::STANDARD.encode(&self.data)),
                );
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputItem {
    pub json: Value,
    pub binary: Option<BinaryData>,
}

impl OutputItem {
    pub fn json(json: Value) -> Self {
        Self { json, binary: None }
    }

    pub fn with_binary(json: Value, binary: BinaryData) -> Self {
        Self {
            json,
            binary: Some(binary),
        }
    }

    pub fn to_json(&self, include_data: bool) -> Value {
        match &self.binary {
            Some(binary) => serde_json::json!({
                "json": self.json,
                "binary": { "data": binary.to_json(include_data) },
            }),
            None => serde_json::json!({ "json": self.json }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BinaryData, OutputItem};
    use serde_json::json;

    #[test]
    fn placeholder_defaults_to_text_plain_without_name() {
        let data = BinaryData::placeholder(vec![1u8, 2, 3]);
        assert!(data.is_placeholder_type());
        assert_eq!(data.file_name, None);
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn to_json_encodes_data_only_on_request() {
        let item = OutputItem::with_binary(json!({}), BinaryData::placeholder(&b"hi"[..]));
        let without = item.to_json(false);
        assert!(without["binary"]["data"].get("data").is_none());
        let with = item.to_json(true);
        assert_eq!(with["binary"]["data"]["data"], json!("aGk="));
        assert_eq!(with["binary"]["data"]["fileSize"], json!(2));
    }
}
