//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging via tracing; fields, not format strings
//! - Request ID attached by middleware and carried through the pipeline
//! - Metrics are cheap (atomic increments) and config-gated

pub mod logging;
pub mod metrics;
