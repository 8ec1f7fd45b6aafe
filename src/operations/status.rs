use super::{parse_params, require_text, Operation};
use crate::errors::BridgeError;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StatusParams {
    id: Option<String>,
    crawl_id: Option<String>,
    extract_id: Option<String>,
}

/// Fills the `{id}` segment of a status operation's path.
pub(super) fn resolve_path(operation: Operation, params: &Value) -> Result<String, BridgeError> {
    let parsed: StatusParams = parse_params(operation, params)?;
    let specific = match operation {
        Operation::GetCrawlStatus => parsed.crawl_id,
        Operation::GetExtractStatus => parsed.extract_id,
        _ => None,
    };
    let id = require_text(operation, "id", specific.or(parsed.id).as_deref())?;
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(BridgeError::invalid_params(format!(
            "Job id '{}' may only contain letters, digits, '-' and '_'",
            id
        )));
    }
    Ok(operation.spec().path.replace("{id}", &id))
}
