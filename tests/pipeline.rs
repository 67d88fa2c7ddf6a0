//! End-to-end tests for the counter endpoint pipeline.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use probe_counter::config::AppConfig;
use tokio::net::TcpListener;

mod common;

/// Config tuned so tests are not dominated by waits.
fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.rate_limit.burst = 10;
    config.rate_limit.refill_interval_ms = 10;
    config.probe.request_timeout_ms = 1_000;
    config.probe.max_retries = 1;
    config.probe.retry_base_delay_ms = 10;
    config.probe.retry_max_delay_ms = 50;
    config.circuit_breaker.failure_threshold = 3;
    config.circuit_breaker.cooldown_ms = 60_000;
    config
}

/// An address nothing is listening on.
async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

#[tokio::test]
async fn reachable_host_increments_the_counter() {
    let target = common::start_probe_target(200).await;
    let counter = Arc::new(AtomicI64::new(0));
    let store = common::start_counter_store(counter.clone()).await;

    let mut config = test_config();
    config.store.base_url = format!("http://{store}");
    let service = common::spawn_service(config).await;

    let response = common::client()
        .get(format!("http://{}/?host=http://{}", service.addr, target))
        .send()
        .await
        .expect("service unreachable");

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "Counter: 1\n");
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    service.controller.begin_drain();
}

#[tokio::test]
async fn missing_host_parameter_is_a_bad_request() {
    let service = common::spawn_service(test_config()).await;

    let response = common::client()
        .get(format!("http://{}/", service.addr))
        .send()
        .await
        .expect("service unreachable");

    assert_eq!(response.status(), 400);
    assert_eq!(response.text().await.unwrap(), "Host parameter is missing\n");

    service.controller.begin_drain();
}

#[tokio::test]
async fn unreachable_host_is_not_found_without_a_store_call() {
    let down = closed_port().await;
    let store_calls = Arc::new(AtomicU32::new(0));
    let calls = store_calls.clone();
    let store = common::start_http_stub(move || {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            (200, "{\"value\":1}".to_string())
        }
    })
    .await;

    let mut config = test_config();
    config.store.base_url = format!("http://{store}");
    let service = common::spawn_service(config).await;

    let response = common::client()
        .get(format!("http://{}/?host=http://{}", service.addr, down))
        .send()
        .await
        .expect("service unreachable");

    assert_eq!(response.status(), 404);
    assert_eq!(response.text().await.unwrap(), "Host not found\n");
    assert_eq!(store_calls.load(Ordering::SeqCst), 0);

    service.controller.begin_drain();
}

#[tokio::test]
async fn repeated_store_failures_trip_the_breaker() {
    let target = common::start_probe_target(200).await;
    let store_calls = Arc::new(AtomicU32::new(0));
    let calls = store_calls.clone();
    let store = common::start_http_stub(move || {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            (500, String::new())
        }
    })
    .await;

    let mut config = test_config();
    config.store.base_url = format!("http://{store}");
    let service = common::spawn_service(config).await;

    let client = common::client();
    let url = format!("http://{}/?host=http://{}", service.addr, target);

    for _ in 0..3 {
        let response = client.get(&url).send().await.expect("service unreachable");
        assert_eq!(response.status(), 500);
        assert_eq!(
            response.text().await.unwrap(),
            "Could not increment counter\n"
        );
    }
    assert_eq!(store_calls.load(Ordering::SeqCst), 3);

    // The breaker is open: same failure response, but no store call.
    let response = client.get(&url).send().await.expect("service unreachable");
    assert_eq!(response.status(), 500);
    assert_eq!(store_calls.load(Ordering::SeqCst), 3);

    service.controller.begin_drain();
}

#[tokio::test]
async fn rate_gate_delays_a_burst_exceeding_request() {
    let target = common::start_probe_target(200).await;
    let counter = Arc::new(AtomicI64::new(0));
    let store = common::start_counter_store(counter).await;

    let mut config = test_config();
    config.store.base_url = format!("http://{store}");
    config.rate_limit.burst = 1;
    config.rate_limit.refill_interval_ms = 100;
    let service = common::spawn_service(config).await;

    let client = common::client();
    let url = format!("http://{}/?host=http://{}", service.addr, target);

    let start = Instant::now();
    client.get(&url).send().await.expect("service unreachable");
    client.get(&url).send().await.expect("service unreachable");

    // The second request had to wait for a refill.
    assert!(start.elapsed() >= Duration::from_millis(80));

    service.controller.begin_drain();
}
