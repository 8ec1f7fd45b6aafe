use super::scrape_options::ScrapeOptions;
use super::{parse_params, require_text, write, write_text, BodyControls, Operation};
use crate::errors::BridgeError;
use crate::services::body_merger::RequestBody;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ScrapeParams {
    url: Option<String>,
    scrape_options: Option<ScrapeOptions>,
}

pub(super) fn write_body(
    operation: Operation,
    params: &Value,
    controls: &BodyControls,
    body: &mut RequestBody,
) -> Result<(), BridgeError> {
    let parsed: ScrapeParams = parse_params(operation, params)?;
    if controls.use_custom_body {
        return write_text(body, "url", parsed.url.as_deref());
    }

    let url = require_text(operation, "url", parsed.url.as_deref())?;
    write(body, "url", Value::String(url))?;
    if let Some(options) = &parsed.scrape_options {
        options.write_into(body, None)?;
    }
    Ok(())
}
