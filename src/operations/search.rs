use super::scrape_options::ScrapeOptions;
use super::{parse_params, require_text, write, write_text, BodyControls, Operation};
use crate::errors::BridgeError;
use crate::services::body_merger::RequestBody;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SearchParams {
    query: Option<String>,
    limit: u64,
    tbs: Option<String>,
    lang: String,
    country: String,
    scrape_options: Option<ScrapeOptions>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            query: None,
            limit: 50,
            tbs: None,
            lang: "en".to_string(),
            country: "us".to_string(),
            scrape_options: None,
        }
    }
}

pub(super) fn write_body(
    operation: Operation,
    params: &Value,
    controls: &BodyControls,
    body: &mut RequestBody,
) -> Result<(), BridgeError> {
    let parsed: SearchParams = parse_params(operation, params)?;
    // The query is never hidden by a custom body.
    let query = require_text(operation, "query", parsed.query.as_deref())?;
    write(body, "query", Value::String(query))?;
    if controls.use_custom_body {
        return Ok(());
    }

    if parsed.limit == 0 {
        return Err(BridgeError::invalid_params("search limit must be at least 1"));
    }
    write(body, "limit", Value::from(parsed.limit))?;
    write_text(body, "tbs", parsed.tbs.as_deref())?;
    write_text(body, "lang", Some(parsed.lang.as_str()))?;
    write_text(body, "country", Some(parsed.country.as_str()))?;
    if let Some(options) = &parsed.scrape_options {
        options.write_into(body, Some("scrapeOptions"))?;
    }
    Ok(())
}
