//! Counter store boundary.
//!
//! The counter itself is owned by a remote service; this subsystem only
//! defines the operation the pipeline consumes and a client for reaching
//! it. Nothing here caches or compensates; each increment is an
//! independent unit of work.

use async_trait::async_trait;
use thiserror::Error;

pub mod http;

pub use http::HttpCounterStore;

/// Failure talking to the counter store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network-level failure (connect error, timeout, broken connection).
    #[error("counter store request failed: {0}")]
    Transport(String),

    /// The store answered with a non-success status.
    #[error("counter store returned status {0}")]
    Status(reqwest::StatusCode),

    /// The store answered 2xx but the payload did not parse.
    #[error("counter store returned a malformed payload: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

/// A durable, monotonically incrementing integer counter addressed by key.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Increment the counter at `key`, returning the new value.
    async fn increment(&self, key: &str) -> Result<i64, StoreError>;
}
