//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use probe_counter::config::AppConfig;
use probe_counter::http::{AppState, HttpServer};
use probe_counter::lifecycle::ShutdownController;
use probe_counter::probe::{HttpTransport, Prober, RetryPlan};
use probe_counter::resilience::{CircuitBreaker, RateGate};
use probe_counter::store::HttpCounterStore;

/// Start a programmable mock HTTP server on an ephemeral port; `f` yields
/// the status and body for each request.
pub async fn start_http_stub<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a mock probe target answering every request with `status`.
#[allow(dead_code)]
pub async fn start_probe_target(status: u16) -> SocketAddr {
    start_http_stub(move || async move { (status, String::new()) }).await
}

/// Start a mock counter store incrementing `counter` on every request.
#[allow(dead_code)]
pub async fn start_counter_store(counter: Arc<AtomicI64>) -> SocketAddr {
    start_http_stub(move || {
        let counter = counter.clone();
        async move {
            let value = counter.fetch_add(1, Ordering::SeqCst) + 1;
            (200, format!("{{\"value\":{value}}}"))
        }
    })
    .await
}

/// A fully wired service listening on an ephemeral port.
pub struct TestService {
    pub addr: SocketAddr,
    pub controller: Arc<ShutdownController>,
    pub task: tokio::task::JoinHandle<std::io::Result<()>>,
}

/// Wire the full pipeline from `config` and serve it.
pub async fn spawn_service(config: AppConfig) -> TestService {
    let transport = Arc::new(
        HttpTransport::new(Duration::from_millis(config.probe.request_timeout_ms)).unwrap(),
    );
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
        store: Arc::new(HttpCounterStore::new(&config.store).unwrap()),
        counter_key: config.store.key.clone(),
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let controller = Arc::new(ShutdownController::new(Duration::from_millis(
        config.shutdown.drain_timeout_ms,
    )));
    let shutdown_rx = controller.subscribe();
    let server = HttpServer::new(state);
    let task = tokio::spawn(async move { server.run(listener, shutdown_rx).await });

    TestService {
        addr,
        controller,
        task,
    }
}

/// reqwest client that never reuses pooled connections between tests.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
