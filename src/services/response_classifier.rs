//! Post-receive handling of binary responses.
//!
//! A response is binary unless its content type is on the textual deny-list.
//! `application/pdf` is on that list, so PDFs stay on the text path.

use crate::constants::media::DEFAULT_FILE_STEM;
use crate::pipeline::items::{BinaryData, OutputItem};
use crate::utils::media_type::MediaType;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Used by [`ResponseClassifier::finalize`] when the response has no `content-type`.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

static TEXT_CONTENT_TYPES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"application/json",
        r"application/xml",
        r"application/xhtml\+xml",
        r"application/atom\+xml",
        r"application/rss\+xml",
        r"application/rdf\+xml",
        r"application/ld\+json",
        r"application/pdf",
        r"^text/",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("text content type regex"))
    .collect()
});

/// How a content type is tested against the textual list.
///
/// `Exact` is the default and narrows the older rule "binary iff no pattern
/// matches": a type that only contains a listed type as a substring, such as
/// `application/jsonl` or `application/json-patch+json`, is binary under
/// `Exact` and text under `Pattern`. Set `FIRECRAWL_CONTENT_TYPE_MATCH=pattern`
/// to keep the older behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Compare the parsed essence against the textual list.
    #[default]
    Exact,
    /// Unanchored patterns over the raw header.
    Pattern,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub is_binary: bool,
    pub mime_type: String,
    pub top_level_type: String,
    pub extension: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseClassifier {
    mode: MatchMode,
}

impl ResponseClassifier {
    pub fn new(mode: MatchMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn is_binary(&self, content_type: &str) -> bool {
        match self.mode {
            MatchMode::Exact => !MediaType::parse(content_type).is_textual(),
            MatchMode::Pattern => !TEXT_CONTENT_TYPES
                .iter()
                .any(|re| re.is_match(content_type)),
        }
    }

    pub fn classify(&self, content_type: &str) -> Classification {
        let media = MediaType::parse(content_type);
        Classification {
            is_binary: self.is_binary(content_type),
            mime_type: content_type.to_string(),
            top_level_type: media.top_level().to_string(),
            extension: media.extension().to_string(),
        }
    }

    /// Corrects a transport placeholder in place.
    ///
    /// Binary responses re-tag a `text/plain` placeholder with the response's
    /// content type, leaving the bytes untouched. Any placeholder without a
    /// file name gets `data.<extension>`.
    pub fn finalize_placeholder(&self, content_type: &str, placeholder: &mut BinaryData) {
        let classification = self.classify(content_type);
        if classification.is_binary && placeholder.is_placeholder_type() {
            placeholder.mime_type = classification.mime_type.clone();
            placeholder.file_type = Some(classification.top_level_type.clone());
            placeholder.file_extension = Some(classification.extension.clone());
        }
        if placeholder.file_name.is_none() {
            placeholder.file_name = Some(default_file_name(&classification.extension));
        }
    }

    /// Applies [`Self::finalize_placeholder`] to the first item's attachment.
    /// No attachment, no change.
    pub fn finalize(&self, headers: &HashMap<String, String>, items: &mut [OutputItem]) {
        let Some(placeholder) = items.first_mut().and_then(|item| item.binary.as_mut()) else {
            return;
        };
        let content_type = response_content_type(headers).unwrap_or(FALLBACK_CONTENT_TYPE);
        self.finalize_placeholder(content_type, placeholder);
    }
}

/// Case-insensitive `content-type` lookup.
pub fn response_content_type(headers: &HashMap<String, String>) -> Option<&str> {
    headers
        .get("content-type")
        .or_else(|| {
            headers
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
                .map(|(_, value)| value)
        })
        .map(String::as_str)
}

pub fn default_file_name(extension: &str) -> String {
    format!("{}.{}", DEFAULT_FILE_STEM, extension)
}

#[cfg(test)]
mod tests {
    use super::{default_file_name, response_content_type, MatchMode, ResponseClassifier};
    use std::collections::HashMap;

    #[test]
    fn pattern_mode_matches_substrings_like_the_raw_deny_list() {
        let pattern = ResponseClassifier::new(MatchMode::Pattern);
        let exact = ResponseClassifier::new(MatchMode::Exact);
        assert!(!pattern.is_binary("application/jsonl"));
        assert!(exact.is_binary("application/jsonl"));
        assert!(!pattern.is_binary("application/json-patch+json"));
        assert!(exact.is_binary("application/json-patch+json"));
    }

    #[test]
    fn pattern_mode_anchors_text_prefix() {
        let pattern = ResponseClassifier::new(MatchMode::Pattern);
        assert!(!pattern.is_binary("text/csv"));
        assert!(pattern.is_binary("x-text/csv"));
    }

    #[test]
    fn modes_agree_on_common_types() {
        let pattern = ResponseClassifier::new(MatchMode::Pattern);
        let exact = ResponseClassifier::default();
        for content_type in [
            "application/json; charset=utf-8",
            "application/ld+json",
            "application/pdf",
            "text/markdown",
            "image/png",
            "image/webp",
            "application/octet-stream",
            "application/zip",
        ] {
            assert_eq!(
                pattern.is_binary(content_type),
                exact.is_binary(content_type),
                "{}",
                content_type
            );
        }
    }

    #[test]
    fn content_type_lookup_ignores_header_case() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "image/gif".to_string());
        assert_eq!(response_content_type(&headers), Some("image/gif"));
        assert_eq!(response_content_type(&HashMap::new()), None);
    }

    #[test]
    fn default_file_name_uses_extension() {
        assert_eq!(default_file_name("png"), "data.png");
    }
}
