//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the probe-counter service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Inbound rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    /// Host probe configuration (timeout, retries).
    pub probe: ProbeConfig,

    /// Circuit breaker protecting the counter store.
    pub circuit_breaker: CircuitBreakerConfig,

    /// Counter store connection settings.
    pub store: StoreConfig,

    /// Graceful shutdown settings.
    pub shutdown: ShutdownConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Rate limiting configuration.
///
/// Admission is a single token bucket: at most `burst` tokens, one token
/// added every `refill_interval_ms`. Requests wait for a token rather than
/// being rejected.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Maximum tokens the bucket can hold.
    pub burst: u32,

    /// Interval between token refills in milliseconds.
    pub refill_interval_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            burst: 1,
            refill_interval_ms: 1_000,
        }
    }
}

/// Host probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Timeout for a single probe request in milliseconds.
    pub request_timeout_ms: u64,

    /// Maximum number of retries after the initial attempt.
    ///
    /// Only transport-level failures are retried; an HTTP response of any
    /// status is final.
    pub max_retries: u32,

    /// Base delay for exponential backoff between attempts in milliseconds.
    pub retry_base_delay_ms: u64,

    /// Maximum backoff delay in milliseconds.
    pub retry_max_delay_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 5_000,
            max_retries: 3,
            retry_base_delay_ms: 100,
            retry_max_delay_ms: 2_000,
        }
    }
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before the circuit opens.
    pub failure_threshold: u32,

    /// Time the circuit stays open before allowing a trial call, in
    /// milliseconds.
    pub cooldown_ms: u64,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            cooldown_ms: 30_000,
        }
    }
}

/// Counter store connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the counter store service.
    pub base_url: String,

    /// Counter key incremented on each successful probe.
    pub key: String,

    /// Timeout for a single store request in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://store:6380".to_string(),
            key: "counter".to_string(),
            request_timeout_ms: 5_000,
        }
    }
}

/// Graceful shutdown settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Maximum time to wait for in-flight requests to finish after a
    /// termination signal, in milliseconds.
    pub drain_timeout_ms: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            drain_timeout_ms: 10_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
