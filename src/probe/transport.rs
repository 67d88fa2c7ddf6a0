//! Probe transport boundary.
//!
//! The prober only needs one primitive: issue a GET, hand back the status
//! code or a transport failure. Keeping that behind a trait lets tests
//! script outcomes without a network.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

/// Transport-level failure issuing a probe request (connect error,
/// timeout, broken connection). Distinct from an HTTP response of any
/// status, which is not a transport failure.
#[derive(Debug, Error)]
#[error("probe transport failure: {0}")]
pub struct TransportError(String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        Self(e.to_string())
    }
}

/// Issue a GET against `url`, returning the response status or a
/// transport failure.
#[async_trait]
pub trait ProbeTransport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<StatusCode, TransportError>;
}

/// Reqwest-backed transport with a per-request timeout.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ProbeTransport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<StatusCode, TransportError> {
        let response = self.client.get(url.as_str()).send().await?;
        Ok(response.status())
    }
}
