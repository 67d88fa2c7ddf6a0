//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, thresholds >= 1)
//! - Check the store base URL is a usable absolute URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::AppConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address must not be empty")]
    EmptyBindAddress,

    #[error("rate_limit.burst must be at least 1")]
    ZeroBurst,

    #[error("rate_limit.refill_interval_ms must be greater than zero")]
    ZeroRefillInterval,

    #[error("probe.request_timeout_ms must be greater than zero")]
    ZeroProbeTimeout,

    #[error("circuit_breaker.failure_threshold must be at least 1")]
    ZeroFailureThreshold,

    #[error("circuit_breaker.cooldown_ms must be greater than zero")]
    ZeroCooldown,

    #[error("store.base_url is not a valid absolute URL: {0}")]
    BadStoreUrl(String),

    #[error("store.key must not be empty")]
    EmptyStoreKey,

    #[error("shutdown.drain_timeout_ms must be greater than zero")]
    ZeroDrainTimeout,
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.trim().is_empty() {
        errors.push(ValidationError::EmptyBindAddress);
    }
    if config.rate_limit.burst == 0 {
        errors.push(ValidationError::ZeroBurst);
    }
    if config.rate_limit.refill_interval_ms == 0 {
        errors.push(ValidationError::ZeroRefillInterval);
    }
    if config.probe.request_timeout_ms == 0 {
        errors.push(ValidationError::ZeroProbeTimeout);
    }
    if config.circuit_breaker.failure_threshold == 0 {
        errors.push(ValidationError::ZeroFailureThreshold);
    }
    if config.circuit_breaker.cooldown_ms == 0 {
        errors.push(ValidationError::ZeroCooldown);
    }
    if Url::parse(&config.store.base_url).is_err() {
        errors.push(ValidationError::BadStoreUrl(config.store.base_url.clone()));
    }
    if config.store.key.is_empty() {
        errors.push(ValidationError::EmptyStoreKey);
    }
    if config.shutdown.drain_timeout_ms == 0 {
        errors.push(ValidationError::ZeroDrainTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
