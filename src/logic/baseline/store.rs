//! Single-owner live baseline.
//!
//! One tokio task owns the `BaselineSet`; monitors, scans and rebuilds talk
//! to it through a cloneable `BaselineHandle`. The task exits once every
//! handle has been dropped.

use std::path::Path;

use tokio::sync::{mpsc, oneshot};

use super::compare::compare;
use super::error::BaselineError;
use super::storage;
use super::types::{BaselineSet, ChangeRecord, DigestUpdate};

/// Pending requests before senders wait
const REQUEST_QUEUE: usize = 256;

enum Request {
    Snapshot {
        reply: oneshot::Sender<BaselineSet>,
    },
    Replace {
        baseline: BaselineSet,
        reply: oneshot::Sender<usize>,
    },
    Lookup {
        path: String,
        reply: oneshot::Sender<Option<String>>,
    },
    Record {
        path: String,
        digest: String,
        reply: oneshot::Sender<DigestUpdate>,
    },
}

pub struct BaselineStore {
    baseline: BaselineSet,
    requests: mpsc::Receiver<Request>,
}

impl BaselineStore {
    /// Spawn the owner task on the current runtime.
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn(baseline: BaselineSet) -> BaselineHandle {
        let (tx, rx) = mpsc::channel(REQUEST_QUEUE);
        let store = BaselineStore {
            baseline,
            requests: rx,
        };
        tokio::spawn(store.run());
        BaselineHandle { tx }
    }

    async fn run(mut self) {
        log::debug!("Baseline store started ({} entries)", self.baseline.len());

        while let Some(request) = self.requests.recv().await {
            match request {
                Request::Snapshot { reply } => {
                    let _ = reply.send(self.baseline.clone());
                }
                Request::Replace { baseline, reply } => {
                    self.baseline = baseline;
                    let _ = reply.send(self.baseline.len());
                }
                Request::Lookup { path, reply } => {
                    let _ = reply.send(self.baseline.get(&path).map(str::to_string));
                }
                Request::Record { path, digest, reply } => {
                    let _ = reply.send(self.record(path, digest));
                }
            }
        }

        log::debug!("Baseline store stopped");
    }

    fn record(&mut self, path: String, digest: String) -> DigestUpdate {
        match self.baseline.get(&path) {
            None => DigestUpdate::Untracked,
            Some(stored) if stored == digest => DigestUpdate::Unchanged,
            Some(_) => {
                let previous = self.baseline.insert(path, digest).unwrap_or_default();
                DigestUpdate::Changed { previous }
            }
        }
    }
}

/// Request/response access to the live baseline
#[derive(Clone)]
pub struct BaselineHandle {
    tx: mpsc::Sender<Request>,
}

impl BaselineHandle {
    /// Handle whose store has already stopped
    #[cfg(test)]
    pub(crate) fn closed() -> Self {
        let (tx, _) = mpsc::channel(1);
        Self { tx }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Request,
    ) -> Result<T, BaselineError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| BaselineError::StoreClosed)?;
        rx.await.map_err(|_| BaselineError::StoreClosed)
    }

    /// Copy of the current baseline
    pub async fn snapshot(&self) -> Result<BaselineSet, BaselineError> {
        self.request(|reply| Request::Snapshot { reply }).await
    }

    /// Swap in a rebuilt baseline, returning its size
    pub async fn replace(&self, baseline: BaselineSet) -> Result<usize, BaselineError> {
        self.request(|reply| Request::Replace { baseline, reply }).await
    }

    pub async fn lookup(&self, path: &str) -> Result<Option<String>, BaselineError> {
        let path = path.to_string();
        self.request(|reply| Request::Lookup { path, reply }).await
    }

    /// Offer a freshly computed digest; only tracked paths are updated
    pub async fn record_digest(
        &self,
        path: &str,
        digest: String,
    ) -> Result<DigestUpdate, BaselineError> {
        let path = path.to_string();
        self.request(|reply| Request::Record { path, digest, reply }).await
    }

    /// Compare the live baseline against disk without blocking the runtime
    pub async fn scan(&self) -> Result<Vec<ChangeRecord>, BaselineError> {
        let baseline = self.snapshot().await?;
        tokio::task::spawn_blocking(move || compare(&baseline))
            .await
            .map_err(|e| BaselineError::Task(e.to_string()))
    }

    /// Rebuild from disk and swap it in, returning the new size
    pub async fn rebuild(&self, root: &Path) -> Result<usize, BaselineError> {
        let root = root.to_path_buf();
        let baseline = tokio::task::spawn_blocking(move || storage::build(&root))
            .await
            .map_err(|e| BaselineError::Task(e.to_string()))?;
        self.replace(baseline).await
    }

    /// Write the current baseline to the store file
    pub async fn persist(&self, path: &Path) -> Result<(), BaselineError> {
        let baseline = self.snapshot().await?;
        storage::persist(&baseline, path)
    }
}
