//! Best-effort media-type parsing for response `content-type` headers.
//!
//! Parsing never fails. A header without a `/` keeps the whole trimmed essence
//! as both its top-level type and its extension.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    essence: String,
    type_: String,
    subtype: Option<String>,
    params: BTreeMap<String, String>,
}

/// Exact essences that stay on the text path. `text/*` is handled separately.
const TEXTUAL_ESSENCES: &[&str] = &[
    "application/json",
    "application/xml",
    "application/xhtml+xml",
    "application/atom+xml",
    "application/rss+xml",
    "application/rdf+xml",
    "application/ld+json",
    "application/pdf",
];

impl MediaType {
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.split(';');
        let essence = parts.next().unwrap_or("").trim().to_string();
        let (type_, subtype) = match essence.split_once('/') {
            Some((head, tail)) => {
                let subtype = tail.split('/').next().unwrap_or(tail);
                (head.to_string(), Some(subtype.to_string()))
            }
            None => (essence.clone(), None),
        };

        let mut params = BTreeMap::new();
        for part in parts {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            let value = value.trim().trim_matches('"').to_string();
            params.insert(key, value);
        }

        Self {
            essence,
            type_,
            subtype,
            params,
        }
    }

    /// The trimmed first `;` segment, e.g. `image/png`.
    pub fn essence(&self) -> &str {
        &self.essence
    }

    /// Text before the first `/`, or the whole essence when there is none.
    pub fn top_level(&self) -> &str {
        &self.type_
    }

    pub fn subtype(&self) -> Option<&str> {
        self.subtype.as_deref()
    }

    /// Text between the first and second `/`, or the whole essence when there is no `/`.
    pub fn extension(&self) -> &str {
        self.subtype.as_deref().unwrap_or(&self.essence)
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn charset(&self) -> Option<&str> {
        self.param("charset")
    }

    /// Exact-essence check against the textual list (case-insensitive).
    pub fn is_textual(&self) -> bool {
        let essence = self.essence.to_lowercase();
        if essence.starts_with("text/") {
            return true;
        }
        TEXTUAL_ESSENCES.contains(&essence.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::MediaType;

    #[test]
    fn parse_splits_type_subtype_and_params() {
        let media = MediaType::parse(" multipart/form-data ; boundary=\"abc\"; Charset=UTF-8");
        assert_eq!(media.essence(), "multipart/form-data");
        assert_eq!(media.top_level(), "multipart");
        assert_eq!(media.extension(), "form-data");
        assert_eq!(media.param("boundary"), Some("abc"));
        assert_eq!(media.charset(), Some("UTF-8"));
    }

    #[test]
    fn parse_without_slash_falls_back_to_essence() {
        let media = MediaType::parse("garbage; charset=utf-8");
        assert_eq!(media.top_level(), "garbage");
        assert_eq!(media.extension(), "garbage");
        assert_eq!(media.subtype(), None);
    }

    #[test]
    fn parse_empty_header_yields_empty_parts() {
        let media = MediaType::parse("");
        assert_eq!(media.essence(), "");
        assert_eq!(media.top_level(), "");
        assert_eq!(media.extension(), "");
    }

    #[test]
    fn extension_stops_at_second_slash() {
        let media = MediaType::parse("application/vnd.api+json/extra");
        assert_eq!(media.top_level(), "application");
        assert_eq!(media.extension(), "vnd.api+json");
        assert_eq!(MediaType::parse("image/svg/xml").extension(), "svg");
        assert_eq!(MediaType::parse("image/").extension(), "");
    }

    #[test]
    fn is_textual_matches_exact_essence() {
        assert!(MediaType::parse("application/json; charset=utf-8").is_textual());
        assert!(MediaType::parse("text/csv").is_textual());
        assert!(MediaType::parse("application/pdf").is_textual());
        assert!(!MediaType::parse("application/jsonl").is_textual());
        assert!(!MediaType::parse("image/png").is_textual());
    }
}
