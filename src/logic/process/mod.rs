//! Process Monitor - sustained CPU load detection
//!
//! - `source.rs`: `ProcessSource` capability + sysinfo backend
//! - `sustained.rs`: per-process sliding-window repeat counter
//!
//! The sampler loop: snapshot (on the blocking pool), feed the detector,
//! emit alerts, heartbeat if quiet, sleep `check_interval`, repeat.

pub mod source;
pub mod sustained;

use std::sync::Arc;
use std::time::Instant;

use crate::logic::alert::{emit, AlertSink};
use crate::logic::config::CpuMonitorConfig;
use crate::logic::runner::{MonitorHandle, StopSignal};

pub use source::{ProcessSample, ProcessSource, SysinfoProcessSource};
pub use sustained::SustainedLoadDetector;

/// Start the sampling loop as a background task
///
/// Must be called from within a tokio runtime; the work is started with
/// `tokio::spawn`, which panics otherwise.
pub fn spawn<S: ProcessSource>(source: S, sink: Arc<dyn AlertSink>, config: CpuMonitorConfig) -> MonitorHandle {
    MonitorHandle::spawn("CPU monitor", move |stop| run_sampler(source, sink, config, stop))
}

async fn run_sampler<S: ProcessSource>(
    mut source: S,
    sink: Arc<dyn AlertSink>,
    config: CpuMonitorConfig,
    mut stop: StopSignal,
) {
    log::info!(
        "Monitoring for processes with sustained CPU > {}% ({} hits in {}s, every {}s)",
        config.threshold,
        config.repeat_limit,
        config.window_secs,
        config.check_interval_secs
    );

    let interval = config.check_interval();
    let mut detector = SustainedLoadDetector::new(config);

    while !stop.is_stopped() {
        let pass = tokio::task::spawn_blocking(move || {
            let samples = source.snapshot();
            (source, samples)
        })
        .await;

        let samples = match pass {
            Ok((returned, samples)) => {
                source = returned;
                samples
            }
            Err(e) => {
                log::error!("Process sampling task failed: {}", e);
                break;
            }
        };

        let now = Instant::now();
        for alert in detector.observe(&samples, now) {
            emit(&*sink, alert);
        }

        if detector.heartbeat_due(now) {
            log::info!("Monitoring... no threats yet ({} processes sampled)", samples.len());
        }

        tokio::select! {
            biased;
            _ = stop.stopped() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    log::info!("Process monitoring stopped");
}
