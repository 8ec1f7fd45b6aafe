pub mod body_merger;
pub mod logger;
pub mod response_classifier;
