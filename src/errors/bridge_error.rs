use crate::constants::{env, network::RETRYABLE_STATUS_CODES};
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeErrorKind {
    InvalidParams,
    InvalidJson,
    Denied,
    NotFound,
    Timeout,
    Retryable,
    Internal,
}

impl BridgeErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            BridgeErrorKind::InvalidParams => "INVALID_PARAMS",
            BridgeErrorKind::InvalidJson => "INVALID_JSON",
            BridgeErrorKind::Denied => "DENIED",
            BridgeErrorKind::NotFound => "NOT_FOUND",
            BridgeErrorKind::Timeout => "TIMEOUT",
            BridgeErrorKind::Retryable => "RETRYABLE",
            BridgeErrorKind::Internal => "INTERNAL",
        }
    }

    /// Kind for a non-2xx answer from the remote API.
    pub fn for_status(status: u16) -> Self {
        match status {
            401 | 403 => BridgeErrorKind::Denied,
            404 => BridgeErrorKind::NotFound,
            s if RETRYABLE_STATUS_CODES.contains(&s) || s >= 500 => BridgeErrorKind::Retryable,
            _ => BridgeErrorKind::InvalidParams,
        }
    }

    fn is_retryable(self) -> bool {
        matches!(self, BridgeErrorKind::Timeout | BridgeErrorKind::Retryable)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BridgeError {
    pub kind: BridgeErrorKind,
    pub code: &'static str,
    pub message: String,
    /// HTTP status of the remote response this error was built from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub retryable: bool,
}

impl BridgeError {
    pub fn new(kind: BridgeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: kind.code(),
            message: message.into(),
            status: None,
            hint: None,
            details: None,
            retryable: kind.is_retryable(),
        }
    }

    /// Maps a rejected API call. Auth failures carry a hint about the key.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let kind = BridgeErrorKind::for_status(status);
        let mut err = Self::new(kind, message);
        err.status = Some(status);
        if kind == BridgeErrorKind::Denied {
            err.hint = Some(format!("Check {} (sent as a Bearer token).", env::API_KEY));
        }
        err
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(BridgeErrorKind::InvalidParams, message)
    }

    /// User-entered JSON text that does not parse, or parses to the wrong shape.
    pub fn invalid_json(message: impl Into<String>) -> Self {
        Self::new(BridgeErrorKind::InvalidJson, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(BridgeErrorKind::Timeout, message)
    }

    pub fn retryable(message: impl Into<String>) -> Self {
        Self::new(BridgeErrorKind::Retryable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(BridgeErrorKind::Internal, message)
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for BridgeError {}

impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        BridgeError::internal(err.to_string())
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::invalid_json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{BridgeError, BridgeErrorKind};

    #[test]
    fn status_codes_map_to_kinds() {
        assert_eq!(BridgeErrorKind::for_status(401), BridgeErrorKind::Denied);
        assert_eq!(BridgeErrorKind::for_status(403), BridgeErrorKind::Denied);
        assert_eq!(BridgeErrorKind::for_status(404), BridgeErrorKind::NotFound);
        assert_eq!(BridgeErrorKind::for_status(429), BridgeErrorKind::Retryable);
        assert_eq!(BridgeErrorKind::for_status(502), BridgeErrorKind::Retryable);
        assert_eq!(BridgeErrorKind::for_status(400), BridgeErrorKind::InvalidParams);
    }

    #[test]
    fn from_status_records_status_and_auth_hint() {
        let err = BridgeError::from_status(401, "Remote API returned HTTP 401");
        assert_eq!(err.code, "DENIED");
        assert_eq!(err.status, Some(401));
        assert!(!err.retryable);
        assert!(err.hint.unwrap_or_default().contains("FIRECRAWL_API_KEY"));

        let err = BridgeError::from_status(503, "Remote API returned HTTP 503");
        assert!(err.retryable);
        assert_eq!(err.hint, None);
    }
}
