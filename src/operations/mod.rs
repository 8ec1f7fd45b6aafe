//! Typed operation catalog and request-body builders.
//!
//! Each operation deserialises its parameters into an options struct and writes
//! the fields it owns to body paths. When `useCustomBody` is set the generated
//! fields are hidden: only identifying fields (url, query, ids) are written and
//! the user's override is embedded for the pre-send merge.

mod crawl;
mod extract;
mod map;
mod schema;
mod scrape;
mod scrape_options;
mod search;
mod status;

pub use scrape_options::{Action, FormatInput, LocationSettings, ProxyMode, ScrapeOptions};
pub use schema::parse_json_schema;

use crate::constants::body::ADDITIONAL_FIELDS_KEY;
use crate::constants::limits::SUGGESTION_LIMIT;
use crate::errors::BridgeError;
use crate::services::body_merger::{OverridePayload, RequestBody};
use crate::utils::data_path::set_path_value;
use crate::utils::merge::merge_deep;
use crate::utils::suggest::suggest;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Scrape,
    Crawl,
    GetCrawlStatus,
    Map,
    Search,
    Extract,
    GetExtractStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OperationSpec {
    pub operation: Operation,
    pub name: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    pub action: &'static str,
}

const CATALOG: &[OperationSpec] = &[
    OperationSpec {
        operation: Operation::Scrape,
        name: "scrape",
        method: HttpMethod::Post,
        path: "/scrape",
        action: "Scrape a url and get its content",
    },
    OperationSpec {
        operation: Operation::Crawl,
        name: "crawl",
        method: HttpMethod::Post,
        path: "/crawl",
        action: "Crawl a website",
    },
    OperationSpec {
        operation: Operation::GetCrawlStatus,
        name: "getCrawlStatus",
        method: HttpMethod::Get,
        path: "/crawl/{id}",
        action: "Get crawl status",
    },
    OperationSpec {
        operation: Operation::Map,
        name: "map",
        method: HttpMethod::Post,
        path: "/map",
        action: "Map a website and get urls",
    },
    OperationSpec {
        operation: Operation::Search,
        name: "search",
        method: HttpMethod::Post,
        path: "/search",
        action: "Search and optionally scrape search results",
    },
    OperationSpec {
        operation: Operation::Extract,
        name: "extract",
        method: HttpMethod::Post,
        path: "/extract",
        action: "Extract structured data from pages",
    },
    OperationSpec {
        operation: Operation::GetExtractStatus,
        name: "getExtractStatus",
        method: HttpMethod::Get,
        path: "/extract/{id}",
        action: "Get extract status",
    },
];

pub fn catalog() -> &'static [OperationSpec] {
    CATALOG
}

impl Operation {
    pub fn spec(self) -> &'static OperationSpec {
        let index = match self {
            Operation::Scrape => 0,
            Operation::Crawl => 1,
            Operation::GetCrawlStatus => 2,
            Operation::Map => 3,
            Operation::Search => 4,
            Operation::Extract => 5,
            Operation::GetExtractStatus => 6,
        };
        &CATALOG[index]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Status operations return the raw body wrapped as `{ "data": ... }`.
    pub fn wraps_response(self) -> bool {
        matches!(self, Operation::GetCrawlStatus | Operation::GetExtractStatus)
    }

    pub fn build_plan(self, params: &Value, defaults: &Value) -> Result<RequestPlan, BridgeError> {
        let controls: BodyControls = parse_params(self, params)?;
        let spec = self.spec();
        let mut path = spec.path.to_string();
        let mut generated = RequestBody::new();

        match self {
            Operation::Scrape => scrape::write_body(self, params, &controls, &mut generated)?,
            Operation::Crawl => crawl::write_body(self, params, &controls, &mut generated)?,
            Operation::Map => map::write_body(self, params, &controls, &mut generated)?,
            Operation::Search => search::write_body(self, params, &controls, &mut generated)?,
            Operation::Extract => extract::write_body(self, params, &controls, &mut generated)?,
            Operation::GetCrawlStatus | Operation::GetExtractStatus => {
                path = status::resolve_path(self, params)?;
            }
        }

        let body = match spec.method {
            HttpMethod::Get => None,
            HttpMethod::Post => Some(assemble_body(defaults, generated, &controls)?),
        };

        Ok(RequestPlan {
            operation: self,
            method: spec.method,
            path,
            body,
        })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Operation {
    type Err = BridgeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        if let Some(spec) = CATALOG
            .iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(wanted))
        {
            return Ok(spec.operation);
        }
        Err(unknown_operation_error(wanted))
    }
}

/// Everything needed to send one request, before pre-send steps run.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPlan {
    pub operation: Operation,
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<RequestBody>,
}

/// Parameters shared by every body-carrying operation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct BodyControls {
    pub(crate) use_custom_body: bool,
    pub(crate) custom_body: Option<Value>,
    pub(crate) additional_fields: Option<Value>,
}

fn assemble_body(
    defaults: &Value,
    generated: RequestBody,
    controls: &BodyControls,
) -> Result<RequestBody, BridgeError> {
    let merged = merge_deep(defaults, &Value::Object(generated));
    let mut body = match merged {
        Value::Object(map) => map,
        _ => RequestBody::new(),
    };

    if !controls.use_custom_body {
        return Ok(body);
    }

    let payload = match &controls.custom_body {
        None | Some(Value::Null) => OverridePayload::from_value(Value::Object(Default::default()))?,
        Some(Value::String(raw)) => OverridePayload::parse(raw)?,
        Some(other) => OverridePayload::from_value(other.clone())?,
    };
    payload.embed(&mut body);

    if let Some(fields) = controls.additional_fields.as_ref().filter(|v| !v.is_null()) {
        body.insert(ADDITIONAL_FIELDS_KEY.to_string(), fields.clone());
    }
    Ok(body)
}

pub(crate) fn parse_params<T: DeserializeOwned>(
    operation: Operation,
    params: &Value,
) -> Result<T, BridgeError> {
    let source = if params.is_null() {
        Value::Object(Default::default())
    } else {
        params.clone()
    };
    serde_json::from_value(source).map_err(|err| {
        BridgeError::invalid_params(format!("Invalid {} parameters: {}", operation, err))
    })
}

pub(crate) fn write(body: &mut RequestBody, path: &str, value: Value) -> Result<(), BridgeError> {
    set_path_value(body, path, value)
}

pub(crate) fn write_opt<T: serde::Serialize>(
    body: &mut RequestBody,
    path: &str,
    value: Option<T>,
) -> Result<(), BridgeError> {
    let Some(value) = value else {
        return Ok(());
    };
    let value = serde_json::to_value(value)
        .map_err(|err| BridgeError::internal(format!("Failed to encode {}: {}", path, err)))?;
    set_path_value(body, path, value)
}

/// Writes a trimmed string unless it is empty.
pub(crate) fn write_text(
    body: &mut RequestBody,
    path: &str,
    value: Option<&str>,
) -> Result<(), BridgeError> {
    match value.map(str::trim).filter(|text| !text.is_empty()) {
        Some(text) => set_path_value(body, path, Value::String(text.to_string())),
        None => Ok(()),
    }
}

pub(crate) fn require_text(
    operation: Operation,
    label: &str,
    value: Option<&str>,
) -> Result<String, BridgeError> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            BridgeError::invalid_params(format!(
                "{} requires a non-empty '{}'",
                operation, label
            ))
        })
}

pub(crate) fn unknown_operation_error(name: &str) -> BridgeError {
    let known: Vec<&str> = CATALOG.iter().map(|spec| spec.name).collect();
    let suggestions = suggest(name, &known, SUGGESTION_LIMIT);
    let mut hint = format!("Use one of: {}.", known.join(", "));
    if !suggestions.is_empty() {
        hint = format!("Did you mean: {}? {}", suggestions.join(", "), hint);
    }
    BridgeError::invalid_params(format!("Unknown operation: {}", name))
        .with_hint(hint)
        .with_details(serde_json::json!({
            "known_operations": known,
            "did_you_mean": suggestions,
        }))
}
