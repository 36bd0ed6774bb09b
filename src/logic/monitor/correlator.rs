//! Event Correlator - real-time file change state machine
//!
//! created  -> `new_file` alert
//! modified -> re-hash; tracked path with a new digest updates the live
//!             baseline, emits `modified` and feeds the mass-change window
//! deleted  -> `deleted` alert, baseline entry kept
//!
//! Mass-change: after every modification the window drops entries at least
//! `window_secs` old; more than `limit` entries fires one `mass_change` alert
//! and clears it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::logic::alert::{emit, Alert, AlertSink};
use crate::logic::baseline::{hash_file, is_excluded, normalize_path, BaselineError, BaselineHandle, DigestUpdate};
use crate::logic::config::MassChangeConfig;
use crate::logic::runner::StopSignal;
use crate::logic::window::TimeWindow;

use super::watch::{ChangeEvent, FsEventKind, Subscription};

pub struct EventCorrelator {
    baseline: BaselineHandle,
    sink: Arc<dyn AlertSink>,
    window: TimeWindow,
    limit: usize,
}

impl EventCorrelator {
    pub fn new(baseline: BaselineHandle, sink: Arc<dyn AlertSink>, config: &MassChangeConfig) -> Self {
        Self {
            baseline,
            sink,
            window: TimeWindow::half_open(config.window()),
            limit: config.limit,
        }
    }

    /// Modifications currently inside the mass-change window
    pub fn pending_modifications(&self) -> usize {
        self.window.len()
    }

    /// Process one event observed at `now`.
    ///
    /// Only a stopped baseline store is an error.
    pub async fn handle(&mut self, event: ChangeEvent, now: Instant) -> Result<(), BaselineError> {
        let Some(path) = normalize_path(&event.path) else {
            log::warn!("Ignoring event for non UTF-8 path: {}", event.path.display());
            return Ok(());
        };

        match event.kind {
            FsEventKind::Created => emit(&*self.sink, Alert::new_file(&path)),
            FsEventKind::Deleted => emit(&*self.sink, Alert::deleted(&path)),
            FsEventKind::Modified => self.on_modified(path, now).await?,
        }

        Ok(())
    }

    async fn on_modified(&mut self, path: String, now: Instant) -> Result<(), BaselineError> {
        let file = PathBuf::from(&path);
        if is_excluded(&file) {
            return Ok(());
        }

        let digest = match tokio::task::spawn_blocking(move || hash_file(&file)).await {
            Ok(Ok(digest)) => digest,
            Ok(Err(e)) => {
                log::warn!("Error reading {}: {}", path, e);
                return Ok(());
            }
            Err(e) => {
                log::error!("Hash task for {} failed: {}", path, e);
                return Ok(());
            }
        };

        match self.baseline.record_digest(&path, digest).await? {
            DigestUpdate::Changed { .. } => {
                log::warn!("File changed: {}", path);
                self.window.record(now);
                emit(&*self.sink, Alert::modified(&path));
                self.check_mass_change(now);
            }
            DigestUpdate::Unchanged => {}
            // created after the baseline was built, not diffed
            DigestUpdate::Untracked => log::debug!("Ignoring untracked modification: {}", path),
        }

        Ok(())
    }

    fn check_mass_change(&mut self, now: Instant) {
        let count = self.window.trim(now);
        if count > self.limit {
            log::error!("Mass file changes detected: {} modifications in window", count);
            emit(&*self.sink, Alert::mass_change(count));
            self.window.clear();
        }
    }

    /// Consume `events` until stopped or the stream ends.
    ///
    /// Dropping the subscription on return releases the watch.
    pub async fn run(mut self, mut events: Subscription, mut stop: StopSignal) {
        log::info!("Real-time monitoring started");

        loop {
            tokio::select! {
                biased;
                _ = stop.stopped() => {
                    log::info!("Real-time monitoring stopped by request");
                    break;
                }
                next = events.next() => match next {
                    Some(event) => {
                        if let Err(e) = self.handle(event, Instant::now()).await {
                            log::error!("Real-time monitoring aborted: {}", e);
                            break;
                        }
                    }
                    None => {
                        log::warn!("Watch stream closed");
                        break;
                    }
                },
            }
        }
    }
}
