//! Client configuration.

use crate::error::{Error, Result};

/// Configuration shared by every facade of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiaConfig {
    /// Base URL of the inference server.
    pub base_url: String,
    /// Request timeout in seconds. `None` leaves the transport default.
    pub timeout_secs: Option<u64>,
}

impl MultiaConfig {
    /// Default server address.
    pub const DEFAULT_BASE_URL: &'static str = "http://127.0.0.1:5000";

    /// Creates a new configuration pointing at the given server.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: None,
        }
    }

    /// Creates configuration from environment variables.
    ///
    /// Reads from:
    /// - `MULTIA_BASE_URL` - Optional base URL
    /// - `MULTIA_TIMEOUT_SECS` - Optional request timeout in seconds
    pub fn from_env() -> Result<Self> {
        Self::from_vars(
            std::env::var("MULTIA_BASE_URL").ok(),
            std::env::var("MULTIA_TIMEOUT_SECS").ok(),
        )
    }

    /// Builds configuration from raw variable values.
    pub(crate) fn from_vars(base_url: Option<String>, timeout: Option<String>) -> Result<Self> {
        let base_url = base_url.unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_owned());

        let timeout_secs = timeout
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|e| {
                    Error::invalid_config(format!(
                        "MULTIA_TIMEOUT_SECS={raw:?} is not a number: {e}"
                    ))
                })
            })
            .transpose()?;

        Ok(Self {
            base_url,
            timeout_secs,
        })
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Removes the request timeout.
    #[must_use]
    pub const fn without_timeout(mut self) -> Self {
        self.timeout_secs = None;
        self
    }

    /// Builds the absolute URL for an endpoint path.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.strip_suffix('/').unwrap_or(&self.base_url);
        format!("{base}{path}")
    }
}

impl Default for MultiaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}
