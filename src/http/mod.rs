//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, graceful shutdown)
//!     → handler.rs (rate gate → probe → breaker-wrapped increment)
//!     → response (200/400/404/500 with a plain-text body)
//! ```

pub mod handler;
pub mod server;

pub use handler::AppState;
pub use server::HttpServer;
