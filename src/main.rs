//! Probe-counter service.
//!
//! A single-endpoint HTTP service that validates a caller-supplied host by
//! probing it and, on success, increments a shared counter in a remote
//! store.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                PROBE-COUNTER                  │
//!                    │                                               │
//!  GET /?host=<url>  │  ┌──────────┐   ┌────────┐   ┌────────────┐  │
//!  ──────────────────┼─▶│rate gate │──▶│ prober │──▶│  circuit   │──┼──▶ counter
//!                    │  │  (waits) │   │(retries│   │  breaker   │  │    store
//!                    │  └──────────┘   │backoff)│   └────────────┘  │
//!                    │                 └────────┘                    │
//!                    │  ┌────────────────────────────────────────┐  │
//!                    │  │          Cross-Cutting Concerns         │  │
//!                    │  │  config · observability · lifecycle     │  │
//!                    │  └────────────────────────────────────────┘  │
//!                    └──────────────────────────────────────────────┘
//! ```
//!
//! SIGINT/SIGTERM stop the listener, drain in-flight requests for a
//! bounded time, then exit.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use probe_counter::config::{self, AppConfig};
use probe_counter::http::{AppState, HttpServer};
use probe_counter::lifecycle::{signals, ShutdownController};
use probe_counter::observability::{logging, metrics};
use probe_counter::probe::{HttpTransport, Prober, RetryPlan};
use probe_counter::resilience::{CircuitBreaker, RateGate};
use probe_counter::store::HttpCounterStore;

/// Validate hosts by probing them and count successful validations.
#[derive(Debug, Parser)]
#[command(name = "probe-counter", version)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => AppConfig::default(),
    };

    logging::init(&config.observability);
    tracing::info!(
        bind_address = %config.listener.bind_address,
        rate_burst = config.rate_limit.burst,
        refill_interval_ms = config.rate_limit.refill_interval_ms,
        failure_threshold = config.circuit_breaker.failure_threshold,
        drain_timeout_ms = config.shutdown.drain_timeout_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let transport = Arc::new(HttpTransport::new(Duration::from_millis(
        config.probe.request_timeout_ms,
    ))?);
    let state = AppState {
        rate_gate: Arc::new(RateGate::new(
            config.rate_limit.burst,
            Duration::from_millis(config.rate_limit.refill_interval_ms),
        )),
        prober: Arc::new(Prober::new(transport, RetryPlan::from(&config.probe))),
        breaker: Arc::new(CircuitBreaker::new(
            config.circuit_breaker.failure_threshold,
            Duration::from_millis(config.circuit_breaker.cooldown_ms),
        )),
        store: Arc::new(HttpCounterStore::new(&config.store)?),
        counter_key: config.store.key.clone(),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let controller =
        ShutdownController::new(Duration::from_millis(config.shutdown.drain_timeout_ms));

    let server = HttpServer::new(state);
    let shutdown_rx = controller.subscribe();
    let mut server_task = tokio::spawn(async move { server.run(listener, shutdown_rx).await });

    tokio::select! {
        _ = signals::wait_for_termination() => {
            controller.begin_drain();
        }
        result = &mut server_task => {
            result??;
            return Ok(());
        }
    }

    // Signal received: bounded drain. A timeout is logged inside drain and
    // is not fatal.
    let _ = controller.drain(server_task).await;

    tracing::info!("Shutdown complete");
    Ok(())
}
