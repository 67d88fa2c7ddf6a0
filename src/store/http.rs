//! HTTP client for the counter store service.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::StoreConfig;
use crate::store::{CounterStore, StoreError};

#[derive(Debug, Deserialize)]
struct IncrementResponse {
    value: i64,
}

/// Client for a remote counter service speaking JSON over HTTP.
///
/// Increments are POSTs to `{base_url}/counters/{key}/increment`; the
/// store answers `{"value": <new count>}`.
pub struct HttpCounterStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCounterStore {
    pub fn new(config: &StoreConfig) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CounterStore for HttpCounterStore {
    async fn increment(&self, key: &str) -> Result<i64, StoreError> {
        let url = format!("{}/counters/{}/increment", self.base_url, key);
        let response = self.client.post(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status(status));
        }

        let payload: IncrementResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        Ok(payload.value)
    }
}
