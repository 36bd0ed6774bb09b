//! Operational entry points
//!
//! The five operations front-ends (CLI, dashboards) invoke. Each takes the
//! explicit `Config`; none of them keeps global state.

use std::path::Path;
use std::sync::Arc;

use crate::logic::alert::{ActivityLog, AlertSink, FanoutSink, LogSink};
use crate::logic::baseline::{self, BaselineError, BaselineSet, ChangeRecord};
use crate::logic::config::Config;
use crate::logic::honeypot;
use crate::logic::monitor::{self, MonitorError, RealtimeMonitor, WatchSource};
use crate::logic::process::{self, ProcessSource};
use crate::logic::runner::MonitorHandle;

/// Hash every file under `root` and persist the result to the store
pub fn build_baseline(config: &Config, root: &Path) -> Result<BaselineSet, BaselineError> {
    let baseline = baseline::build(root);
    baseline::persist(&baseline, &config.store_path())?;
    Ok(baseline)
}

/// Compare the persisted baseline against disk
pub fn manual_scan(config: &Config) -> Result<Vec<ChangeRecord>, BaselineError> {
    let baseline = baseline::load(&config.store_path())?;
    let changes = baseline::compare(&baseline);

    if changes.is_empty() {
        log::info!("No changes detected, all {} files are intact", baseline.len());
    } else {
        log::warn!("ALERT! {} modified or deleted files:", changes.len());
        for change in &changes {
            log::warn!(" - {}", change);
        }
    }

    Ok(changes)
}

/// Place the decoy file in the data directory. `true` if newly created.
pub fn create_honeypot(config: &Config) -> std::io::Result<bool> {
    honeypot::create(&config.honeypot_path())
}

/// Load the persisted baseline and start correlating live events under `root`.
///
/// A missing store aborts before anything is subscribed or spawned. Once
/// the store is loaded this must run inside a tokio runtime, like
/// `start_cpu_monitor`.
pub fn start_realtime_monitor(
    config: &Config,
    root: &Path,
    source: &mut dyn WatchSource,
    sink: Arc<dyn AlertSink>,
) -> Result<RealtimeMonitor, MonitorError> {
    let baseline = baseline::load(&config.store_path())?;
    log::info!("Loaded baseline with {} entries", baseline.len());
    monitor::spawn(root, baseline, source, sink, &config.mass_change)
}

/// Start the sustained CPU sampler.
///
/// Must be called from within a tokio runtime; the sampler is started with
/// `tokio::spawn`, which panics otherwise.
pub fn start_cpu_monitor<S: ProcessSource>(
    config: &Config,
    source: S,
    sink: Arc<dyn AlertSink>,
) -> MonitorHandle {
    process::spawn(source, sink, config.cpu.clone())
}

/// Activity log plus diagnostic logger
pub fn default_sink(config: &Config) -> std::io::Result<Arc<dyn AlertSink>> {
    let activity = ActivityLog::open(&config.log_path())?;
    let sink = FanoutSink::new()
        .with(Arc::new(activity))
        .with(Arc::new(LogSink));
    Ok(Arc::new(sink))
}
