//! Real-time Monitor
//!
//! - `watch.rs`: `WatchSource` capability + `notify` backend
//! - `correlator.rs`: change-event state machine and mass-change heuristic

pub mod watch;
pub mod correlator;
#[cfg(test)]
mod tests;

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::logic::alert::AlertSink;
use crate::logic::baseline::{absolute_path, BaselineError, BaselineHandle, BaselineSet, BaselineStore};
use crate::logic::config::MassChangeConfig;
use crate::logic::runner::MonitorHandle;

pub use correlator::EventCorrelator;
pub use watch::{ChangeEvent, FsEventKind, NotifyWatchSource, Subscription, WatchError, WatchSource};

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Baseline(#[from] BaselineError),
    #[error(transparent)]
    Watch(#[from] WatchError),
}

/// Running real-time monitor plus access to the baseline it mutates
pub struct RealtimeMonitor {
    pub handle: MonitorHandle,
    pub baseline: BaselineHandle,
}

impl RealtimeMonitor {
    pub async fn stop(self) {
        self.handle.stop().await;
    }
}

/// Subscribe to `root` and start correlating against `baseline`
///
/// Must be called from within a tokio runtime; the work is started with
/// `tokio::spawn`, which panics otherwise.
pub fn spawn(
    root: &Path,
    baseline: BaselineSet,
    source: &mut dyn WatchSource,
    sink: Arc<dyn AlertSink>,
    config: &MassChangeConfig,
) -> Result<RealtimeMonitor, MonitorError> {
    let root = absolute_path(root);
    let subscription = source.subscribe(&root)?;

    let store = BaselineStore::spawn(baseline);
    let correlator = EventCorrelator::new(store.clone(), sink, config);
    let handle = MonitorHandle::spawn("Real-time monitor", move |stop| correlator.run(subscription, stop));

    Ok(RealtimeMonitor {
        handle,
        baseline: store,
    })
}
