//! Request assembly and response classification for a hosted
//! scrape/crawl/map/search/extract REST API.

pub mod config;
pub mod constants;
pub mod errors;
pub mod operations;
pub mod pipeline;
pub mod services;
pub mod utils;

pub use config::BridgeConfig;
pub use errors::{BridgeError, BridgeErrorKind};
pub use operations::Operation;
pub use pipeline::items::{BinaryData, OutputItem};
pub use pipeline::Executor;
pub use services::body_merger::{OverridePayload, RequestBody, RequestBodyMerger};
pub use services::response_classifier::{Classification, MatchMode, ResponseClassifier};
