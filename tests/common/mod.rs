#![allow(dead_code)]

use async_trait::async_trait;
use firecrawl_bridge::pipeline::transport::{HttpRequest, HttpResponse, Transport};
use firecrawl_bridge::services::logger::{LogLevel, Logger};
use firecrawl_bridge::{BridgeConfig, BridgeError, Executor};
use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;

pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Replays canned responses in order and records every request it sees.
#[derive(Default)]
pub struct MockTransport {
    responses: StdMutex<VecDeque<HttpResponse>>,
    requests: StdMutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn replying(responses: Vec<HttpResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: StdMutex::new(responses.into()),
            requests: StdMutex::new(Vec::new()),
        })
    }

    pub fn json(body: serde_json::Value) -> Arc<Self> {
        Self::replying(vec![HttpResponse::new(
            200,
            "application/json",
            body.to_string(),
        )])
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests().pop().expect("at least one request")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BridgeError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| BridgeError::internal("mock transport has no response queued"))
    }
}

pub fn quiet_logger() -> Logger {
    let mut logger = Logger::new("test");
    logger.set_level(LogLevel::Error);
    logger
}

pub fn executor(config: BridgeConfig, transport: Arc<MockTransport>) -> Executor {
    Executor::new(config, transport, quiet_logger())
}
