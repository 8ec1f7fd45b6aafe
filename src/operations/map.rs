use super::{parse_params, require_text, write, write_text, BodyControls, Operation};
use crate::errors::BridgeError;
use crate::services::body_merger::RequestBody;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MapParams {
    url: Option<String>,
    search: Option<String>,
    ignore_sitemap: bool,
    sitemap_only: bool,
    include_subdomains: bool,
    limit: u64,
    timeout: u64,
}

impl Default for MapParams {
    fn default() -> Self {
        Self {
            url: None,
            search: None,
            ignore_sitemap: true,
            sitemap_only: false,
            include_subdomains: false,
            limit: 5_000,
            timeout: 10_000,
        }
    }
}

pub(super) fn write_body(
    operation: Operation,
    params: &Value,
    controls: &BodyControls,
    body: &mut RequestBody,
) -> Result<(), BridgeError> {
    let parsed: MapParams = parse_params(operation, params)?;
    if controls.use_custom_body {
        return write_text(body, "url", parsed.url.as_deref());
    }

    let url = require_text(operation, "url", parsed.url.as_deref())?;
    if parsed.limit == 0 {
        return Err(BridgeError::invalid_params("map limit must be at least 1"));
    }
    write(body, "url", Value::String(url))?;
    write_text(body, "search", parsed.search.as_deref())?;
    write(body, "ignoreSitemap", Value::Bool(parsed.ignore_sitemap))?;
    write(body, "sitemapOnly", Value::Bool(parsed.sitemap_only))?;
    write(body, "includeSubdomains", Value::Bool(parsed.include_subdomains))?;
    write(body, "limit", Value::from(parsed.limit))?;
    write(body, "timeout", Value::from(parsed.timeout))?;
    Ok(())
}
