//! JSON-over-HTTP data source.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use types::{MarketEvent, MarketSentiment, Warehouse};

use crate::{DataFetchError, DataSource};

/// Configuration for [`HttpDataSource`].
#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    /// API base URL, e.g. `http://localhost:8000`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Pause before the single retry.
    pub retry_delay: Duration,
}

impl HttpSourceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
            retry_delay: Duration::from_millis(250),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}

/// Fetches `/warehouses`, `/events` and `/sentiment` from a JSON API.
///
/// Each request is attempted at most twice.
pub struct HttpDataSource {
    config: HttpSourceConfig,
    client: reqwest::Client,
}

impl HttpDataSource {
    pub fn new(config: HttpSourceConfig) -> Result<Self, DataFetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DataFetchError::Http {
                endpoint: config.base_url.clone(),
                message: e.to_string(),
            })?;
        Ok(Self { config, client })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, DataFetchError> {
        match self.get_once(endpoint).await {
            Ok(value) => Ok(value),
            Err(first) => {
                tracing::warn!(endpoint, error = %first, "Fetch failed, retrying once");
                tokio::time::sleep(self.config.retry_delay).await;
                self.get_once(endpoint).await
            }
        }
    }

    async fn get_once<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, DataFetchError> {
        let response = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|e| DataFetchError::Http {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataFetchError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DataFetchError::Decode {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    fn name(&self) -> &str {
        &self.config.base_url
    }

    async fn fetch_warehouses(&self) -> Result<Vec<Warehouse>, DataFetchError> {
        self.get_json("/warehouses").await
    }

    async fn fetch_market_events(&self) -> Result<Vec<MarketEvent>, DataFetchError> {
        self.get_json("/events").await
    }

    async fn fetch_sentiment(&self) -> Result<Vec<MarketSentiment>, DataFetchError> {
        self.get_json("/sentiment").await
    }
}
