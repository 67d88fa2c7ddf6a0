//! Host probing subsystem.
//!
//! # Data Flow
//! ```text
//! caller-supplied URL
//!     → prober.rs (parse & validate, retry loop with backoff)
//!     → transport.rs (single GET, status code or transport failure)
//!     → collapsed to a reachable-or-not boolean
//! ```
//!
//! # Design Decisions
//! - Every failure category (bad URL, timeout, connect error, non-200)
//!   collapses into `false`; callers get no finer distinction
//! - Only transport failures are retried; an HTTP rejection is final

pub mod prober;
pub mod transport;

pub use prober::{Prober, RetryPlan};
pub use transport::{HttpTransport, ProbeTransport, TransportError};
