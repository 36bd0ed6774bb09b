//! Long-running activity control.
//!
//! Each monitor runs as one tokio task paired with a stop flag. Dropping
//! the `MonitorHandle` also stops the task.

use std::future::Future;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Cancellation signal observed by a running activity
#[derive(Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolves once a stop is requested or the handle is gone
    pub async fn stopped(&mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// Owner of a running monitor task
pub struct MonitorHandle {
    name: &'static str,
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Panics when called outside a tokio runtime
    pub fn spawn<F, Fut>(name: &'static str, activity: F) -> Self
    where
        F: FnOnce(StopSignal) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (stop_tx, rx) = watch::channel(false);
        let task = tokio::spawn(activity(StopSignal { rx }));
        log::info!("{} started", name);
        Self { name, stop_tx, task }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn request_stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// Signal the activity and wait for it to return
    pub async fn stop(self) {
        self.request_stop();
        self.join().await;
    }

    /// Wait for the activity to end on its own
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            log::error!("{} task failed: {}", self.name, e);
        } else {
            log::info!("{} stopped", self.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_stop_ends_activity() {
        let handle = MonitorHandle::spawn("test-loop", |mut stop| async move {
            stop.stopped().await;
        });
        assert!(!handle.is_finished());

        tokio::time::timeout(Duration::from_secs(2), handle.stop())
            .await
            .expect("activity did not stop");
    }

    #[tokio::test]
    async fn test_signal_sees_request() {
        let (tx, rx) = watch::channel(false);
        let signal = StopSignal { rx };
        assert!(!signal.is_stopped());
        tx.send(true).unwrap();
        assert!(signal.is_stopped());
    }

    #[tokio::test]
    async fn test_dropped_sender_counts_as_stop() {
        let (tx, rx) = watch::channel(false);
        let mut signal = StopSignal { rx };
        drop(tx);
        tokio::time::timeout(Duration::from_secs(1), signal.stopped())
            .await
            .expect("stopped() should resolve once the sender is gone");
        assert!(signal.is_stopped());
    }
}
