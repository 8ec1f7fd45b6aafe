use super::scrape_options::ScrapeOptions;
use super::{parse_params, require_text, write, write_opt, write_text, BodyControls, Operation};
use crate::errors::BridgeError;
use crate::services::body_merger::RequestBody;
use serde::Deserialize;
use serde_json::Value;

const DEFAULT_CRAWL_LIMIT: u64 = 500;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CrawlParams {
    url: Option<String>,
    prompt: Option<String>,
    limit: Option<u64>,
    delay: Option<u64>,
    max_concurrency: Option<u64>,
    exclude_paths: Vec<String>,
    include_paths: Vec<String>,
    crawl_options: CrawlToggles,
    scrape_options: Option<ScrapeOptions>,
    webhook: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CrawlToggles {
    ignore_sitemap: Option<bool>,
    ignore_query_parameters: Option<bool>,
    allow_external_links: Option<bool>,
    allow_subdomains: Option<bool>,
}

pub(super) fn write_body(
    operation: Operation,
    params: &Value,
    controls: &BodyControls,
    body: &mut RequestBody,
) -> Result<(), BridgeError> {
    let parsed: CrawlParams = parse_params(operation, params)?;
    if controls.use_custom_body {
        return write_text(body, "url", parsed.url.as_deref());
    }

    let url = require_text(operation, "url", parsed.url.as_deref())?;
    write(body, "url", Value::String(url))?;
    write_text(body, "prompt", parsed.prompt.as_deref())?;

    let limit = parsed.limit.unwrap_or(DEFAULT_CRAWL_LIMIT);
    if limit == 0 {
        return Err(BridgeError::invalid_params("crawl limit must be at least 1"));
    }
    write(body, "limit", Value::from(limit))?;
    // Zero is written here and stripped by the pre-send step.
    write(body, "delay", Value::from(parsed.delay.unwrap_or(0)))?;
    if let Some(max) = parsed.max_concurrency {
        if max == 0 {
            return Err(BridgeError::invalid_params(
                "crawl maxConcurrency must be at least 1",
            ));
        }
        write(body, "maxConcurrency", Value::from(max))?;
    }

    if !parsed.exclude_paths.is_empty() {
        write_opt(body, "excludePaths", Some(&parsed.exclude_paths))?;
    }
    if !parsed.include_paths.is_empty() {
        write_opt(body, "includePaths", Some(&parsed.include_paths))?;
    }

    let toggles = &parsed.crawl_options;
    write_opt(body, "ignoreSitemap", toggles.ignore_sitemap)?;
    write_opt(body, "ignoreQueryParameters", toggles.ignore_query_parameters)?;
    write_opt(body, "allowExternalLinks", toggles.allow_external_links)?;
    write_opt(body, "allowSubdomains", toggles.allow_subdomains)?;

    if let Some(options) = &parsed.scrape_options {
        options.write_into(body, Some("scrapeOptions"))?;
    }
    write_text(body, "webhook", parsed.webhook.as_deref())?;
    Ok(())
}
