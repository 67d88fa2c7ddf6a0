//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Running:
//!     accept requests normally
//!
//! Signal received (signals.rs):
//!     SIGTERM/SIGINT → begin_drain → stop accepting, broadcast shutdown
//!
//! Draining (shutdown.rs):
//!     in-flight requests finish → Stopped cleanly
//!     drain deadline expires   → Stopped with a logged timeout
//! ```
//!
//! # Design Decisions
//! - Ordered shutdown: stop accept, drain, stop
//! - Drain has a deadline: forced stop after it, never a hang
//! - Draining is terminal; there is no way back to Running

pub mod shutdown;
pub mod signals;

pub use shutdown::{LifecycleState, ShutdownController, ShutdownTimeout};
