//! Bounded-retry host existence check.

use std::sync::Arc;

use reqwest::StatusCode;
use url::Url;

use crate::config::ProbeConfig;
use crate::observability::metrics;
use crate::probe::transport::ProbeTransport;
use crate::resilience::backoff::calculate_backoff;

/// Retry policy for a prober. Immutable once built; consumed per call
/// without shared mutable state.
#[derive(Debug, Clone)]
pub struct RetryPlan {
    /// Retries after the initial attempt, for transport failures only.
    pub max_retries: u32,

    /// Base delay for exponential backoff between attempts.
    pub base_delay_ms: u64,

    /// Cap on the backoff delay.
    pub max_delay_ms: u64,
}

impl From<&ProbeConfig> for RetryPlan {
    fn from(config: &ProbeConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay_ms: config.retry_base_delay_ms,
            max_delay_ms: config.retry_max_delay_ms,
        }
    }
}

/// Checks whether a caller-supplied URL answers a GET with 200.
pub struct Prober {
    transport: Arc<dyn ProbeTransport>,
    plan: RetryPlan,
}

impl Prober {
    pub fn new(transport: Arc<dyn ProbeTransport>, plan: RetryPlan) -> Self {
        Self { transport, plan }
    }

    /// Probe `raw` and collapse every outcome into reachable-or-not.
    ///
    /// A malformed or non-absolute URL is `false` without a network call.
    /// Transport failures are retried up to the plan's ceiling with backoff
    /// between attempts; an HTTP response of any status is final, and only
    /// a 200 yields `true`.
    pub async fn probe(&self, raw: &str) -> bool {
        let url = match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url,
            _ => {
                tracing::debug!(url = raw, "Rejecting malformed probe target");
                return false;
            }
        };

        let attempts = self.plan.max_retries.saturating_add(1);
        for attempt in 1..=attempts {
            match self.transport.get(&url).await {
                Ok(status) => {
                    let reachable = status == StatusCode::OK;
                    metrics::record_probe_attempt(if reachable { "ok" } else { "rejected" });
                    if !reachable {
                        tracing::debug!(url = %url, status = %status, "Probe target rejected request");
                    }
                    return reachable;
                }
                Err(e) => {
                    metrics::record_probe_attempt("transport_error");
                    if attempt < attempts {
                        let delay =
                            calculate_backoff(attempt, self.plan.base_delay_ms, self.plan.max_delay_ms);
                        tracing::debug!(
                            url = %url,
                            attempt,
                            delay = ?delay,
                            error = %e,
                            "Probe transport failure, retrying"
                        );
                        tokio::time::sleep(delay).await;
                    } else {
                        tracing::debug!(
                            url = %url,
                            attempts,
                            error = %e,
                            "Probe gave up after transport failures"
                        );
                    }
                }
            }
        }
        false
    }
}
