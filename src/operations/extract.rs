use super::schema::parse_json_schema;
use super::{parse_params, write, write_opt, write_text, BodyControls, Operation};
use crate::errors::BridgeError;
use crate::services::body_merger::RequestBody;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ExtractParams {
    urls: Vec<String>,
    prompt: Option<String>,
    schema: Option<Value>,
    enable_web_search: bool,
    ignore_sitemap: bool,
    include_subdomains: bool,
    show_sources: bool,
}

impl Default for ExtractParams {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            prompt: None,
            schema: None,
            enable_web_search: false,
            ignore_sitemap: true,
            include_subdomains: false,
            show_sources: false,
        }
    }
}

pub(super) fn write_body(
    operation: Operation,
    params: &Value,
    controls: &BodyControls,
    body: &mut RequestBody,
) -> Result<(), BridgeError> {
    let parsed: ExtractParams = parse_params(operation, params)?;
    if controls.use_custom_body {
        return Ok(());
    }

    let urls: Vec<String> = parsed
        .urls
        .iter()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect();
    if urls.is_empty() {
        return Err(BridgeError::invalid_params(format!(
            "{} requires at least one entry in 'urls'",
            operation
        )));
    }
    write_opt(body, "urls", Some(&urls))?;
    write_text(body, "prompt", parsed.prompt.as_deref())?;
    if let Some(raw) = &parsed.schema {
        if let Some(schema) = parse_json_schema(raw, "extract schema")? {
            write(body, "schema", schema)?;
        }
    }
    write(body, "enableWebSearch", Value::Bool(parsed.enable_web_search))?;
    write(body, "ignoreSitemap", Value::Bool(parsed.ignore_sitemap))?;
    write(body, "includeSubdomains", Value::Bool(parsed.include_subdomains))?;
    write(body, "showSources", Value::Bool(parsed.show_sources))?;
    Ok(())
}
