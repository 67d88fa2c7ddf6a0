//! Request pipeline for the counter endpoint.
//!
//! Steps, in order, each short-circuiting on failure:
//! 1. Extract the `host` query parameter (400 when absent)
//! 2. Wait for a rate gate token (may delay, never fails)
//! 3. Probe the target host (404 when unreachable)
//! 4. Increment the shared counter through the circuit breaker (500 when
//!    the store fails or the circuit is open)
//!
//! Retry policy belongs to the prober and circuit policy to the breaker;
//! this layer duplicates neither.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::observability::metrics;
use crate::probe::Prober;
use crate::resilience::{CircuitBreaker, CircuitError, RateGate};
use crate::store::CounterStore;

/// Shared dependencies, explicitly constructed at startup (or by a test)
/// and injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub rate_gate: Arc<RateGate>,
    pub prober: Arc<Prober>,
    pub breaker: Arc<CircuitBreaker>,
    pub store: Arc<dyn CounterStore>,
    pub counter_key: String,
}

#[derive(Debug, Deserialize)]
pub struct CounterQuery {
    host: Option<String>,
}

/// Handle `GET /?host=<url>`.
pub async fn counter_handler(
    State(state): State<AppState>,
    Query(query): Query<CounterQuery>,
) -> Response {
    let host = match query.host.as_deref() {
        Some(host) if !host.is_empty() => host,
        _ => return respond(StatusCode::BAD_REQUEST, "Host parameter is missing\n"),
    };

    state.rate_gate.acquire().await;

    if !state.prober.probe(host).await {
        return respond(StatusCode::NOT_FOUND, "Host not found\n");
    }

    match state
        .breaker
        .execute(|| state.store.increment(&state.counter_key))
        .await
    {
        Ok(count) => respond(StatusCode::OK, format!("Counter: {count}\n")),
        Err(CircuitError::Open) => {
            tracing::warn!("Rejecting counter increment, circuit is open");
            respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not increment counter\n",
            )
        }
        Err(CircuitError::Call(e)) => {
            tracing::error!(error = %e, "Counter increment failed");
            respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not increment counter\n",
            )
        }
    }
}

fn respond(status: StatusCode, body: impl Into<String>) -> Response {
    metrics::record_request(status.as_u16());
    (status, body.into()).into_response()
}
