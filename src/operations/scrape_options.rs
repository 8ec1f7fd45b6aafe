use super::schema::parse_json_schema;
use super::{write, write_opt};
use crate::constants::limits::SUGGESTION_LIMIT;
use crate::errors::BridgeError;
use crate::services::body_merger::RequestBody;
use crate::utils::suggest::suggest;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const FORMAT_TYPES: &[&str] = &[
    "markdown",
    "html",
    "rawHtml",
    "links",
    "summary",
    "screenshot",
    "json",
    "changeTracking",
];

/// Page-level scrape settings. Scrape writes them at the body root; crawl and
/// search nest them under `scrapeOptions`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrapeOptions {
    pub formats: Vec<FormatInput>,
    pub only_main_content: Option<bool>,
    pub headers: Option<HeadersInput>,
    pub wait_for: Option<u64>,
    pub mobile: Option<bool>,
    pub skip_tls_verification: Option<bool>,
    pub timeout: Option<u64>,
    pub remove_base64_images: Option<bool>,
    pub block_ads: Option<bool>,
    pub store_in_cache: Option<bool>,
    pub proxy: Option<ProxyMode>,
    pub actions: Vec<Action>,
    pub location: Option<LocationSettings>,
    pub include_tags: Vec<String>,
    pub exclude_tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyMode {
    Basic,
    Stealth,
    Auto,
}

/// A format is either a bare name (`"markdown"`) or an object with options.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FormatInput {
    Name(String),
    Detailed(FormatFields),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatFields {
    #[serde(rename = "type")]
    pub kind: String,
    pub prompt: Option<String>,
    pub schema: Option<Value>,
    pub modes: Option<Vec<String>>,
    pub tag: Option<String>,
    pub full_page: Option<bool>,
    pub quality: Option<u8>,
    pub viewport_width: Option<u32>,
    pub viewport_height: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HeadersInput {
    Pairs(Vec<HeaderPair>),
    Map(Map<String, Value>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeaderPair {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    Wait {
        #[serde(skip_serializing_if = "Option::is_none")]
        milliseconds: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        selector: Option<String>,
    },
    Click {
        selector: String,
    },
    Screenshot {
        #[serde(rename = "fullPage", skip_serializing_if = "Option::is_none")]
        full_page: Option<bool>,
    },
    Write {
        text: String,
    },
    Press {
        key: String,
    },
    Scroll {
        #[serde(skip_serializing_if = "Option::is_none")]
        direction: Option<ScrollDirection>,
        #[serde(skip_serializing_if = "Option::is_none")]
        selector: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationSettings {
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub languages: Vec<String>,
}

fn default_country() -> String {
    "US".to_string()
}

impl ScrapeOptions {
    pub fn write_into(&self, body: &mut RequestBody, prefix: Option<&str>) -> Result<(), BridgeError> {
        let path = |field: &str| match prefix {
            Some(prefix) => format!("{}.{}", prefix, field),
            None => field.to_string(),
        };

        if !self.formats.is_empty() {
            let formats = self
                .formats
                .iter()
                .map(render_format)
                .collect::<Result<Vec<Value>, BridgeError>>()?;
            write(body, &path("formats"), Value::Array(formats))?;
        }
        write_opt(body, &path("onlyMainContent"), self.only_main_content)?;
        if let Some(headers) = &self.headers {
            let rendered = render_headers(headers);
            if !rendered.is_empty() {
                write(body, &path("headers"), Value::Object(rendered))?;
            }
        }
        write_opt(body, &path("waitFor"), self.wait_for)?;
        write_opt(body, &path("mobile"), self.mobile)?;
        write_opt(body, &path("skipTlsVerification"), self.skip_tls_verification)?;
        write_opt(body, &path("timeout"), self.timeout)?;
        write_opt(body, &path("removeBase64Images"), self.remove_base64_images)?;
        write_opt(body, &path("blockAds"), self.block_ads)?;
        write_opt(body, &path("storeInCache"), self.store_in_cache)?;
        write_opt(body, &path("proxy"), self.proxy)?;
        if !self.actions.is_empty() {
            write_opt(body, &path("actions"), Some(&self.actions))?;
        }
        write_opt(body, &path("location"), self.location.as_ref())?;
        if !self.include_tags.is_empty() {
            write_opt(body, &path("includeTags"), Some(&self.include_tags))?;
        }
        if !self.exclude_tags.is_empty() {
            write_opt(body, &path("excludeTags"), Some(&self.exclude_tags))?;
        }
        Ok(())
    }
}

fn render_format(format: &FormatInput) -> Result<Value, BridgeError> {
    let fields = match format {
        FormatInput::Name(name) => {
            return check_format_type(name).map(|name| Value::String(name.to_string()));
        }
        FormatInput::Detailed(fields) => fields,
    };
    let kind = check_format_type(&fields.kind)?;
    let mut out = Map::new();
    out.insert("type".to_string(), Value::String(kind.to_string()));

    match kind {
        "json" | "changeTracking" => {
            if let Some(prompt) = fields.prompt.as_deref().filter(|p| !p.trim().is_empty()) {
                out.insert("prompt".to_string(), Value::String(prompt.to_string()));
            }
            if let Some(raw) = &fields.schema {
                let label = format!("{} format schema", kind);
                if let Some(schema) = parse_json_schema(raw, &label)? {
                    out.insert("schema".to_string(), schema);
                }
            }
            if let Some(modes) = &fields.modes {
                out.insert("modes".to_string(), serde_json::json!(modes));
            }
            if let Some(tag) = fields.tag.as_deref().filter(|t| !t.trim().is_empty()) {
                out.insert("tag".to_string(), Value::String(tag.to_string()));
            }
        }
        "screenshot" => {
            if let Some(full_page) = fields.full_page {
                out.insert("fullPage".to_string(), Value::Bool(full_page));
            }
            if let Some(quality) = fields.quality {
                if quality > 100 {
                    return Err(BridgeError::invalid_params(
                        "Screenshot quality must be between 0 and 100",
                    ));
                }
                out.insert("quality".to_string(), serde_json::json!(quality));
            }
            // Viewport is only sent as a pair.
            if let (Some(width), Some(height)) = (fields.viewport_width, fields.viewport_height) {
                out.insert(
                    "viewport".to_string(),
                    serde_json::json!({ "width": width, "height": height }),
                );
            }
        }
        _ => return Ok(Value::String(kind.to_string())),
    }
    Ok(Value::Object(out))
}

fn check_format_type(raw: &str) -> Result<&'static str, BridgeError> {
    let wanted = raw.trim();
    if let Some(found) = FORMAT_TYPES
        .iter()
        .find(|known| known.eq_ignore_ascii_case(wanted))
    {
        return Ok(*found);
    }
    let suggestions = suggest(wanted, FORMAT_TYPES, SUGGESTION_LIMIT);
    let mut err = BridgeError::invalid_params(format!("Unknown scrape format: {}", wanted));
    if !suggestions.is_empty() {
        err = err.with_hint(format!("Did you mean: {}?", suggestions.join(", ")));
    }
    Err(err)
}

fn render_headers(headers: &HeadersInput) -> Map<String, Value> {
    let mut out = Map::new();
    match headers {
        HeadersInput::Pairs(pairs) => {
            for pair in pairs {
                let key = pair.key.trim();
                if key.is_empty() {
                    continue;
                }
                out.insert(key.to_string(), Value::String(pair.value.clone()));
            }
        }
        HeadersInput::Map(map) => {
            for (key, value) in map {
                let rendered = match value {
                    Value::String(text) => text.clone(),
                    Value::Null => continue,
                    other => other.to_string(),
                };
                out.insert(key.clone(), Value::String(rendered));
            }
        }
    }
    out
}
