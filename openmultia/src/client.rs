//! `MultIA` API client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::audio::Audio;
use crate::chat::Chat;
use crate::config::MultiaConfig;
use crate::error::{Error, Result};
use crate::images::Images;
use crate::models::Models;
use crate::vision::Vision;

/// Client for a `MultIA` inference server.
///
/// Holds the shared configuration and a pooled HTTP client. Facades borrow
/// the client and are cheap to create:
///
/// ```rust,ignore
/// let client = OpenMultia::with_base_url("http://127.0.0.1:5000")?;
/// let models = client.models().list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct OpenMultia {
    pub(crate) config: Arc<MultiaConfig>,
    pub(crate) http: Client,
}

impl OpenMultia {
    /// Create a new client with the given configuration.
    pub fn new(config: MultiaConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(Error::invalid_config("base URL is required"));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        let http = builder
            .build()
            .map_err(|e| Error::invalid_config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }

    /// Create a client for the given base URL with default settings.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(MultiaConfig::new(base_url))
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(MultiaConfig::from_env()?)
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &MultiaConfig {
        &self.config
    }

    /// Chat completions.
    #[must_use]
    pub const fn chat(&self) -> Chat<'_> {
        Chat::new(self)
    }

    /// Speech synthesis, transcription and translation.
    #[must_use]
    pub const fn audio(&self) -> Audio<'_> {
        Audio::new(self)
    }

    /// Image generation.
    #[must_use]
    pub const fn images(&self) -> Images<'_> {
        Images::new(self)
    }

    /// Image captioning and visual question answering.
    #[must_use]
    pub const fn vision(&self) -> Vision<'_> {
        Vision::new(self)
    }

    /// Model listing.
    #[must_use]
    pub const fn models(&self) -> Models<'_> {
        Models::new(self)
    }

    /// Start a POST request to an endpoint path.
    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        let url = self.config.endpoint(path);
        tracing::debug!(method = "POST", %url, "sending request");
        self.http.post(url)
    }

    /// Start a GET request to an endpoint path.
    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        let url = self.config.endpoint(path);
        tracing::debug!(method = "GET", %url, "sending request");
        self.http.get(url)
    }

    /// Send a request and turn non-success statuses into errors.
    pub(crate) async fn send(request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), url = %response.url(), "received response");

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %error_text, "server returned an error");
            return Err(Self::parse_error(status.as_u16(), &error_text));
        }

        Ok(response)
    }

    /// Read the whole body and decode it as JSON.
    pub(crate) async fn decode<T: DeserializeOwned>(
        response: Response,
        expected: &'static str,
    ) -> Result<T> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::decode(expected, e))
    }

    /// Build an error from a non-success response body.
    ///
    /// JSON bodies carrying an `error`, `detail` or `message` string are
    /// reduced to that message; anything else is kept verbatim.
    pub(crate) fn parse_error(status: u16, body: &str) -> Error {
        let message = serde_json::from_str::<Value>(body).ok().and_then(|value| {
            ["error", "detail", "message"]
                .iter()
                .find_map(|key| value.get(key).and_then(Value::as_str).map(str::to_owned))
        });

        Error::http_status(status, message.unwrap_or_else(|| body.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_base_url() {
        let err = OpenMultia::with_base_url("  ").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn exposes_config() {
        let client = OpenMultia::new(MultiaConfig::new("http://host:1").with_timeout(5)).unwrap();
        assert_eq!(client.base_url(), "http://host:1");
        assert_eq!(client.config().timeout_secs, Some(5));
    }

    #[test]
    fn parse_error_extracts_message() {
        let err = OpenMultia::parse_error(404, r#"{"error": "model not found"}"#);
        match err {
            Error::HttpStatus { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "model not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_error_reads_detail_field() {
        let err = OpenMultia::parse_error(422, r#"{"detail": "field required"}"#);
        assert_eq!(err.to_string(), "HTTP 422: field required");
    }

    #[test]
    fn parse_error_keeps_plain_body() {
        let err = OpenMultia::parse_error(500, "Internal Server Error");
        assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
    }

    #[test]
    fn parse_error_keeps_json_without_message() {
        let err = OpenMultia::parse_error(400, r#"{"code": 7}"#);
        assert_eq!(err.to_string(), r#"HTTP 400: {"code": 7}"#);
    }
}
