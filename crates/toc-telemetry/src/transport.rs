//! Delivery of serialized log records.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use toc_types::TelemetrySettings;

use crate::TelemetryError;

/// Content type sent with every log record.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// What came back from the log sink.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code; not checked for success
    pub status: u16,

    /// Response headers in arrival order; values that are not valid UTF-8 are skipped
    pub headers: Vec<(String, String)>,
}

impl TransportResponse {
    /// Response with a status and no headers.
    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
        }
    }

    /// First value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Pluggable delivery of one JSON body.
#[async_trait]
pub trait LogTransport: Send + Sync {
    /// Deliver `body`. Any response counts as delivered.
    async fn post(&self, body: String) -> Result<TransportResponse, TelemetryError>;
}

/// Configuration for the HTTP log sink.
#[derive(Debug, Clone)]
pub struct RemoteLoggerConfig {
    /// Ingestion endpoint without query string
    pub endpoint: String,

    /// API key, sent as the `api_key` query parameter
    pub api_key: SecretString,

    /// Source id, sent as the `source` query parameter
    pub source: String,

    /// Request timeout
    pub timeout: Duration,
}

impl RemoteLoggerConfig {
    /// Create config for the Logflare ingestion API.
    pub fn logflare(api_key: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            endpoint: "https://api.logflare.app/logs".to_string(),
            api_key: SecretString::from(api_key.into()),
            source: source.into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Create config from loaded settings.
    pub fn from_settings(settings: &TelemetrySettings) -> Result<Self, TelemetryError> {
        settings.validate().map_err(TelemetryError::Config)?;

        let api_key = settings
            .api_key
            .clone()
            .ok_or_else(|| TelemetryError::Config("api_key is not set".to_string()))?;
        let source = settings
            .source
            .clone()
            .ok_or_else(|| TelemetryError::Config("source is not set".to_string()))?;

        Ok(Self {
            endpoint: settings.endpoint.clone(),
            api_key: SecretString::from(api_key),
            source,
            timeout: Duration::from_secs(settings.timeout_secs),
        })
    }
}

/// HTTP transport posting to the configured endpoint.
pub struct HttpTransport {
    client: Client,
    config: RemoteLoggerConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport.
    pub fn new(config: RemoteLoggerConfig) -> Result<Self, TelemetryError> {
        reqwest::Url::parse(&config.endpoint)
            .map_err(|e| TelemetryError::Config(format!("endpoint {}: {}", config.endpoint, e)))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TelemetryError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl LogTransport for HttpTransport {
    async fn post(&self, body: String) -> Result<TransportResponse, TelemetryError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .query(&[
                ("api_key", self.config.api_key.expose_secret()),
                ("source", self.config.source.as_str()),
            ])
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            // Strip the URL: it carries the API key
            .map_err(|e| TelemetryError::Transport(e.without_url().to_string()))?;

        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();

        Ok(TransportResponse {
            status: response.status().as_u16(),
            headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logflare_config() {
        let config = RemoteLoggerConfig::logflare("key", "source-id");
        assert!(config.endpoint.contains("logflare"));
        assert_eq!(config.source, "source-id");
        assert_eq!(config.api_key.expose_secret(), "key");
    }

    #[test]
    fn test_config_debug_hides_key() {
        let config = RemoteLoggerConfig::logflare("super-secret", "s");
        assert!(!format!("{config:?}").contains("super-secret"));
    }

    #[test]
    fn test_from_settings() {
        let settings = TelemetrySettings {
            enabled: true,
            api_key: Some("k".to_string()),
            source: Some("s".to_string()),
            timeout_secs: 3,
            ..Default::default()
        };
        let config = RemoteLoggerConfig::from_settings(&settings).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.endpoint, "https://api.logflare.app/logs");
    }

    #[test]
    fn test_from_settings_missing_key() {
        let settings = TelemetrySettings {
            source: Some("s".to_string()),
            ..Default::default()
        };
        let result = RemoteLoggerConfig::from_settings(&settings);
        assert!(matches!(result, Err(TelemetryError::Config(_))));
    }

    #[test]
    fn test_response_header_lookup() {
        let response = TransportResponse {
            status: 200,
            headers: vec![("x-request-id".to_string(), "abc".to_string())],
        };
        assert_eq!(response.header("X-Request-Id"), Some("abc"));
        assert_eq!(response.header("etag"), None);
        assert!(TransportResponse::with_status(204).headers.is_empty());
    }

    #[test]
    fn test_rejects_bad_endpoint() {
        let mut config = RemoteLoggerConfig::logflare("k", "s");
        config.endpoint = "not a url".to_string();
        assert!(matches!(HttpTransport::new(config), Err(TelemetryError::Config(_))));
    }
}
