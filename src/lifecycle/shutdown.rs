//! Shutdown coordination for the service.

use std::io;
use std::sync::Mutex;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Where the process is in its lifecycle. Terminal once draining begins;
/// there is no way back to Running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Running,
    Draining,
    Stopped,
}

/// Drain deadline exceeded; in-flight work was abandoned. Logged, not
/// fatal; the process still stops.
#[derive(Debug, Error)]
#[error("shutdown drain deadline exceeded")]
pub struct ShutdownTimeout;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that long-running tasks subscribe to, and
/// a bounded drain of the server task once the signal fires.
pub struct ShutdownController {
    tx: broadcast::Sender<()>,
    state: Mutex<LifecycleState>,
    drain_timeout: Duration,
}

impl ShutdownController {
    pub fn new(drain_timeout: Duration) -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            state: Mutex::new(LifecycleState::Running),
            drain_timeout,
        }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.lock().expect("lifecycle mutex poisoned")
    }

    /// Stop accepting new work and notify subscribers. Idempotent; only
    /// the first call transitions.
    pub fn begin_drain(&self) {
        let mut state = self.state.lock().expect("lifecycle mutex poisoned");
        if *state != LifecycleState::Running {
            return;
        }
        *state = LifecycleState::Draining;
        tracing::info!("Server is shutting down, draining in-flight requests");
        let _ = self.tx.send(());
    }

    /// Wait for the draining server task, bounded by the drain timeout.
    ///
    /// In-flight requests are allowed to finish naturally. If the deadline
    /// expires first the task is aborted and the timeout reported.
    pub async fn drain(&self, mut server: JoinHandle<io::Result<()>>) -> Result<(), ShutdownTimeout> {
        let outcome = match tokio::time::timeout(self.drain_timeout, &mut server).await {
            Ok(Ok(Ok(()))) => {
                tracing::info!("Server is shut down");
                Ok(())
            }
            Ok(Ok(Err(e))) => {
                tracing::error!(error = %e, "Server exited with an error during drain");
                Ok(())
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Server task failed during drain");
                Ok(())
            }
            Err(_) => {
                server.abort();
                tracing::warn!(
                    timeout = ?self.drain_timeout,
                    "Shutdown drain timed out, abandoning in-flight work"
                );
                Err(ShutdownTimeout)
            }
        };

        *self.state.lock().expect("lifecycle mutex poisoned") = LifecycleState::Stopped;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn begin_drain_notifies_subscribers_once() {
        let controller = ShutdownController::new(Duration::from_secs(10));
        let mut rx = controller.subscribe();
        assert_eq!(controller.state(), LifecycleState::Running);

        controller.begin_drain();
        controller.begin_drain();
        assert_eq!(controller.state(), LifecycleState::Draining);

        rx.recv().await.unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn drain_completes_cleanly_within_the_deadline() {
        let controller = ShutdownController::new(Duration::from_secs(10));
        let server = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(())
        });

        controller.begin_drain();
        assert!(controller.drain(server).await.is_ok());
        assert_eq!(controller.state(), LifecycleState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn drain_reports_timeout_when_work_outlives_the_deadline() {
        let controller = ShutdownController::new(Duration::from_secs(10));
        let server = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        });

        controller.begin_drain();
        assert!(controller.drain(server).await.is_err());
        assert_eq!(controller.state(), LifecycleState::Stopped);
    }
}
