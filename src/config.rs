use crate::constants::{body, env, network, protocols::ALLOWED_HTTP};
use crate::errors::BridgeError;
use crate::services::body_merger::RequestBodyMerger;
use crate::services::response_classifier::{MatchMode, ResponseClassifier};
use serde_json::Value;
use url::Url;

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub base_url: Url,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
    pub integration_tag: String,
    pub protected_keys: Vec<String>,
    pub match_mode: MatchMode,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(network::DEFAULT_BASE_URL).expect("default base url"),
            api_key: None,
            timeout_ms: network::TIMEOUT_API_REQUEST_MS,
            integration_tag: body::DEFAULT_INTEGRATION_TAG.to_string(),
            protected_keys: vec![body::INTEGRATION_KEY.to_string()],
            match_mode: MatchMode::default(),
        }
    }
}

impl BridgeConfig {
    pub fn from_env() -> Result<Self, BridgeError> {
        let mut config = Self::default();
        if let Some(raw) = read_env(env::BASE_URL) {
            config = config.with_base_url(&raw)?;
        }
        if let Some(raw) = read_env(env::API_KEY) {
            config = config.with_api_key(raw);
        }
        if let Some(raw) = read_env(env::TIMEOUT_MS) {
            let timeout_ms = raw.parse::<u64>().ok().filter(|ms| *ms > 0).ok_or_else(|| {
                BridgeError::invalid_params(format!(
                    "{} must be a positive integer (milliseconds)",
                    env::TIMEOUT_MS
                ))
            })?;
            config.timeout_ms = timeout_ms;
        }
        if let Some(raw) = read_env(env::INTEGRATION) {
            config.integration_tag = raw;
        }
        if let Ok(raw) = std::env::var(env::PROTECTED_KEYS) {
            config.protected_keys = raw
                .split(',')
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty())
                .collect();
        }
        if let Some(raw) = read_env(env::CONTENT_TYPE_MATCH) {
            config.match_mode = match raw.to_lowercase().as_str() {
                "exact" => MatchMode::Exact,
                "pattern" => MatchMode::Pattern,
                _ => {
                    return Err(BridgeError::invalid_params(format!(
                        "{} must be 'exact' or 'pattern'",
                        env::CONTENT_TYPE_MATCH
                    )))
                }
            };
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, raw: &str) -> Result<Self, BridgeError> {
        self.base_url = parse_base_url(raw)?;
        Ok(self)
    }

    /// A blank key leaves requests unauthenticated.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        let key: String = key.into();
        let trimmed = key.trim();
        self.api_key = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    pub fn with_protected_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.protected_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Appends `path` to the base URL, keeping any version prefix such as `/v2`.
    pub fn endpoint(&self, path: &str) -> Result<Url, BridgeError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{}/{}", base, path))
            .map_err(|err| BridgeError::invalid_params(format!("Invalid endpoint path: {}", err)))
    }

    /// Body every generated request starts from.
    pub fn request_defaults(&self) -> Value {
        let mut defaults = serde_json::Map::new();
        defaults.insert(
            body::INTEGRATION_KEY.to_string(),
            Value::String(self.integration_tag.clone()),
        );
        Value::Object(defaults)
    }

    pub fn merger(&self) -> RequestBodyMerger {
        RequestBodyMerger::new(self.protected_keys.iter().cloned())
    }

    pub fn classifier(&self) -> ResponseClassifier {
        ResponseClassifier::new(self.match_mode)
    }

    pub fn secrets(&self) -> Vec<String> {
        self.api_key.iter().cloned().collect()
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_base_url(raw: &str) -> Result<Url, BridgeError> {
    let url = Url::parse(raw.trim()).map_err(|err| {
        BridgeError::invalid_params(format!("Invalid base URL '{}': {}", raw.trim(), err))
    })?;
    if !ALLOWED_HTTP.contains(&url.scheme()) {
        return Err(BridgeError::invalid_params(format!(
            "Base URL scheme must be http or https, got '{}'",
            url.scheme()
        )));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::BridgeConfig;

    #[test]
    fn endpoint_keeps_version_prefix() {
        let config = BridgeConfig::default();
        assert_eq!(
            config.endpoint("/scrape").expect("endpoint").as_str(),
            "https://api.firecrawl.dev/v2/scrape"
        );
        let local = BridgeConfig::default()
            .with_base_url("http://localhost:3002/")
            .expect("base url");
        assert_eq!(
            local.endpoint("crawl/abc").expect("endpoint").as_str(),
            "http://localhost:3002/crawl/abc"
        );
    }

    #[test]
    fn with_base_url_rejects_other_schemes() {
        assert!(BridgeConfig::default()
            .with_base_url("ftp://example.com")
            .is_err());
        assert!(BridgeConfig::default().with_base_url("not a url").is_err());
    }

    #[test]
    fn blank_api_key_is_absent() {
        let config = BridgeConfig::default().with_api_key("   ");
        assert!(config.api_key.is_none());
        assert!(config.secrets().is_empty());
    }

    #[test]
    fn request_defaults_carry_integration_tag() {
        let config = BridgeConfig::default();
        assert_eq!(
            config.request_defaults(),
            serde_json::json!({"integration": "firecrawl-bridge"})
        );
    }
}
