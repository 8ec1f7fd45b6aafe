//! Runs one operation end to end: plan, pre-send, transport, post-receive.

pub mod items;
pub mod transport;

use crate::config::BridgeConfig;
use crate::constants::limits::LOG_BODY_PREVIEW_BYTES;
use crate::constants::network::CREDENTIAL_CHECK_PATH;
use crate::errors::BridgeError;
use crate::operations::{HttpMethod, Operation, RequestPlan};
use crate::services::body_merger::{
    apply_custom_properties, drop_zero_delay, RequestBody, RequestBodyMerger,
};
use crate::services::logger::Logger;
use crate::services::response_classifier::{response_content_type, ResponseClassifier};
use crate::utils::media_type::MediaType;
use crate::utils::text::body_preview;
use items::{BinaryData, OutputItem};
use serde_json::Value;
use std::sync::Arc;
use transport::{HttpRequest, HttpResponse, Transport};

pub struct Executor {
    config: BridgeConfig,
    transport: Arc<dyn Transport>,
    logger: Logger,
    merger: RequestBodyMerger,
    classifier: ResponseClassifier,
}

impl Executor {
    pub fn new(config: BridgeConfig, transport: Arc<dyn Transport>, logger: Logger) -> Self {
        let merger = config.merger();
        let classifier = config.classifier();
        Self {
            logger: logger.child("pipeline"),
            config,
            transport,
            merger,
            classifier,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Builds the outbound request without sending it.
    pub fn prepare(&self, operation: Operation, params: &Value) -> Result<HttpRequest, BridgeError> {
        let plan: RequestPlan = operation.build_plan(params, &self.config.request_defaults())?;
        let url = self.config.endpoint(&plan.path)?;
        let body = plan.body.map(|body| Value::Object(self.pre_send(body)));
        self.logger.debug(
            "Prepared request",
            Some(&serde_json::json!({
                "operation": operation.name(),
                "method": plan.method.as_str(),
                "url": url.as_str(),
                "body": body,
            })),
        );
        Ok(HttpRequest {
            method: plan.method,
            url,
            body,
        })
    }

    /// Pre-send steps in the order the fields declare them: zero delay,
    /// custom properties, then the `customBody` merge.
    pub fn pre_send(&self, mut body: RequestBody) -> RequestBody {
        drop_zero_delay(&mut body);
        if apply_custom_properties(&mut body) {
            self.logger.debug("Applied custom properties", None);
        }
        self.merger.merge(body)
    }

    pub async fn execute(
        &self,
        operation: Operation,
        params: &Value,
    ) -> Result<Vec<OutputItem>, BridgeError> {
        let trace_id = params
            .get("trace_id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let request = self.prepare(operation, params)?;
        self.logger.info(
            "Sending request",
            Some(&serde_json::json!({
                "trace_id": trace_id,
                "operation": operation.name(),
                "method": request.method.as_str(),
                "url": request.url.as_str(),
            })),
        );
        let response = self.transport.send(request).await?;
        self.logger.info(
            "Received response",
            Some(&serde_json::json!({
                "trace_id": trace_id,
                "operation": operation.name(),
                "status": response.status,
                "content_type": response_content_type(&response.headers),
                "bytes": response.body.len(),
            })),
        );
        self.post_receive(operation, response)
    }

    /// Reads the team's credit usage to confirm the API key and base URL.
    /// A rejected key surfaces as `Denied`.
    pub async fn check_credentials(&self) -> Result<Value, BridgeError> {
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: self.config.endpoint(CREDENTIAL_CHECK_PATH)?,
            body: None,
        };
        self.logger.info(
            "Checking credentials",
            Some(&serde_json::json!({ "url": request.url.as_str() })),
        );
        let response = self.transport.send(request).await?;
        check_status(&response)?;
        Ok(serde_json::from_slice::<Value>(&response.body).unwrap_or_else(|_| {
            Value::String(body_preview(&response.body, LOG_BODY_PREVIEW_BYTES))
        }))
    }

    pub fn post_receive(
        &self,
        operation: Operation,
        response: HttpResponse,
    ) -> Result<Vec<OutputItem>, BridgeError> {
        check_status(&response)?;
        let mut items = vec![materialize(&response)];
        if operation.wraps_response() {
            for item in items.iter_mut() {
                item.json = serde_json::json!({ "data": item.json.take() });
            }
        }
        self.classifier.finalize(&response.headers, &mut items);
        if let Some(binary) = items.first().and_then(|item| item.binary.as_ref()) {
            self.logger.debug(
                "Attached binary data",
                Some(&serde_json::json!({
                    "mime_type": binary.mime_type,
                    "file_name": binary.file_name,
                    "bytes": binary.len(),
                })),
            );
        }
        Ok(items)
    }
}

/// Turns a response into the first output item. JSON bodies become the item's
/// JSON; anything else also gets a speculative `text/plain` attachment.
fn materialize(response: &HttpResponse) -> OutputItem {
    let media = MediaType::parse(response_content_type(&response.headers).unwrap_or(""));
    let essence = media.essence().to_lowercase();
    let looks_json = essence.ends_with("/json") || essence.ends_with("+json");
    if looks_json {
        if let Ok(parsed) = serde_json::from_slice::<Value>(&response.body) {
            return OutputItem::json(parsed);
        }
    }

    let json = if media.is_textual() {
        Value::String(String::from_utf8_lossy(&response.body).to_string())
    } else {
        Value::Object(Default::default())
    };
    OutputItem::with_binary(json, BinaryData::placeholder(response.body.clone()))
}

fn check_status(response: &HttpResponse) -> Result<(), BridgeError> {
    if response.is_success() {
        return Ok(());
    }
    let status = response.status;
    let body = serde_json::from_slice::<Value>(&response.body)
        .unwrap_or_else(|_| Value::String(body_preview(&response.body, LOG_BODY_PREVIEW_BYTES)));
    let remote_message = body
        .get("error")
        .and_then(Value::as_str)
        .map(|text| format!(": {}", text))
        .unwrap_or_default();
    let message = format!("Remote API returned HTTP {}{}", status, remote_message);
    Err(BridgeError::from_status(status, message)
        .with_details(serde_json::json!({ "status": status, "body": body })))
}
