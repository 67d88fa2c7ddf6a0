//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request:
//!     → rate_gate.rs (wait for an admission token)
//!     → probe runs with backoff.rs delays between retry attempts
//!     → circuit_breaker.rs (track store failures, open circuit if
//!       threshold exceeded)
//! ```
//!
//! # Design Decisions
//! - The rate gate delays rather than rejects; backpressure, not errors
//! - Retry policy lives with the prober, circuit policy lives here; the
//!   request pipeline duplicates neither
//! - All shared state is mutated under a mutex, never across an await

pub mod backoff;
pub mod circuit_breaker;
pub mod rate_gate;

pub use circuit_breaker::{CircuitBreaker, CircuitError, CircuitState};
pub use rate_gate::RateGate;
