/// Fetching JSON from tide and river sources.
///
/// `JsonSource` is the seam between the dashboard and the network; the
/// production implementation wraps a blocking `reqwest` client.

use std::time::Duration;

use serde_json::Value;

use crate::model::ReadingError;

/// Anything that can turn a URL into a parsed JSON document.
pub trait JsonSource: Send + Sync {
    fn fetch_json(&self, url: &str) -> Result<Value, ReadingError>;
}

/// Blocking HTTP source. One client is shared by every load.
#[derive(Clone)]
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    /// Builds a client with a per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, ReadingError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("riverwatch_service/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ReadingError::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Wraps an existing client (custom proxy or TLS settings).
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl JsonSource for HttpSource {
    fn fetch_json(&self, url: &str) -> Result<Value, ReadingError> {
        tracing::debug!(url, "fetching");

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .map_err(|e| ReadingError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ReadingError::HttpError(response.status().as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| ReadingError::Network(format!("failed to read body: {}", e)))?;

        serde_json::from_str(&body)
            .map_err(|e| ReadingError::ParseError(format!("JSON deserialization failed: {}", e)))
    }
}
