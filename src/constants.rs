pub mod network {
    pub const DEFAULT_BASE_URL: &str = "https://api.firecrawl.dev/v2";
    pub const TIMEOUT_API_REQUEST_MS: u64 = 30_000;
    pub const USER_AGENT: &str = "firecrawl-bridge/0.3.0";
    pub const CREDENTIAL_CHECK_PATH: &str = "/team/credit-usage";
    pub const RETRYABLE_STATUS_CODES: &[u16] = &[408, 429, 500, 502, 503, 504];
}

pub mod body {
    pub const CUSTOM_BODY_KEY: &str = "customBody";
    pub const ADDITIONAL_FIELDS_KEY: &str = "additionalFields";
    pub const CUSTOM_PROPERTIES_KEY: &str = "customProperties";
    pub const INTEGRATION_KEY: &str = "integration";
    pub const DEFAULT_INTEGRATION_TAG: &str = "firecrawl-bridge";
}

pub mod media {
    pub const PLACEHOLDER_MIME_TYPE: &str = "text/plain";
    pub const DEFAULT_FILE_STEM: &str = "data";
}

pub mod limits {
    pub const LOG_BODY_PREVIEW_BYTES: usize = 256;
    pub const SUGGESTION_LIMIT: usize = 3;
}

pub mod env {
    pub const API_KEY: &str = "FIRECRAWL_API_KEY";
    pub const BASE_URL: &str = "FIRECRAWL_BASE_URL";
    pub const TIMEOUT_MS: &str = "FIRECRAWL_TIMEOUT_MS";
    pub const INTEGRATION: &str = "FIRECRAWL_INTEGRATION";
    pub const PROTECTED_KEYS: &str = "FIRECRAWL_PROTECTED_KEYS";
    pub const CONTENT_TYPE_MATCH: &str = "FIRECRAWL_CONTENT_TYPE_MATCH";
    pub const LOG_LEVEL: &str = "FIRECRAWL_LOG_LEVEL";
    pub const LOG_LEVEL_FALLBACK: &str = "LOG_LEVEL";
}

pub mod protocols {
    pub const ALLOWED_HTTP: &[&str] = &["http", "https"];
}
