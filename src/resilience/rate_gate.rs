//! Token bucket admission gate.
//!
//! # Responsibilities
//! - Bound the rate at which requests enter the pipeline
//! - Delay callers until a token is available (never reject)
//!
//! # Design Decisions
//! - Tokens refill continuously at one token per configured interval
//! - Waiters sleep until the next token is due rather than spinning
//! - Admission order under contention follows lock acquisition; eventual
//!   admission is the only guarantee

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// A token bucket that delays callers instead of rejecting them.
///
/// Shared across all in-flight requests; the bucket state is mutated under
/// a mutex so concurrent refills and takes cannot race.
pub struct RateGate {
    capacity: f64,
    refill_per_sec: f64,
    bucket: Mutex<Bucket>,
}

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

impl RateGate {
    /// Create a gate holding at most `burst` tokens, refilled at one token
    /// per `refill_interval`. The bucket starts full.
    pub fn new(burst: u32, refill_interval: Duration) -> Self {
        let capacity = f64::from(burst.max(1));
        Self {
            capacity,
            refill_per_sec: 1.0 / refill_interval.as_secs_f64(),
            bucket: Mutex::new(Bucket {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Wait until a token is available, then consume it.
    ///
    /// This is the only intentional blocking point before pipeline work
    /// begins. It cannot fail, only delay.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut bucket = self.bucket.lock().await;
                let now = Instant::now();
                let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
                bucket.tokens = (bucket.tokens + elapsed * self.refill_per_sec).min(self.capacity);
                bucket.last_refill = now;

                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    return;
                }

                // Time until the next whole token is due.
                Duration::from_secs_f64((1.0 - bucket.tokens) / self.refill_per_sec)
            };
            tokio::time::sleep(wait).await;
        }
    }
}
