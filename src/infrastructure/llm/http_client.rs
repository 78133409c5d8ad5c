//! JSON-over-HTTP transport shared by every model provider

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::domain::DomainError;

/// Seam between providers and the network, so providers can be tested offline
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    /// POST `body` as JSON and decode the JSON reply
    ///
    /// Non-2xx statuses are errors that carry the response body.
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &Value,
    ) -> Result<Value, DomainError>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Local models can take minutes to answer, so callers pick the limit
    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map(|inner| Self { inner })
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))
    }
}

fn transport_error(message: String) -> DomainError {
    DomainError::provider("http", message)
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &Value,
    ) -> Result<Value, DomainError> {
        let request = headers
            .into_iter()
            .fold(self.inner.post(url), |req, (name, value)| req.header(name, value));

        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(format!("POST {} failed: {}", url, e)))?;

        let status = response.status();
        debug!(url, status = status.as_u16(), "Provider replied");

        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(transport_error(format!("HTTP {}: {}", status, detail)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| transport_error(format!("Reply from {} is not JSON: {}", url, e)))
    }
}
