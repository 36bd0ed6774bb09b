//! Sustained Load Detector
//!
//! Per-process repeat counter over a sliding window. A sample above the
//! threshold is recorded in its process window; once the window holds
//! `repeat_limit` entries an alert fires and the window is cleared.

use std::collections::HashMap;
use std::time::Instant;

use crate::constants::IDLE_PROCESS_NAME;
use crate::logic::alert::Alert;
use crate::logic::config::CpuMonitorConfig;
use crate::logic::window::TimeWindow;

use super::source::ProcessSample;

pub struct SustainedLoadDetector {
    config: CpuMonitorConfig,
    windows: HashMap<u32, TimeWindow>,
    /// Last alert or heartbeat
    last_activity: Option<Instant>,
}

impl SustainedLoadDetector {
    pub fn new(config: CpuMonitorConfig) -> Self {
        Self {
            config,
            windows: HashMap::new(),
            last_activity: None,
        }
    }

    /// Above-threshold samples currently held for `pid`
    pub fn window_len(&self, pid: u32) -> usize {
        self.windows.get(&pid).map(TimeWindow::len).unwrap_or(0)
    }

    /// Number of processes with a non-empty window
    pub fn tracked_processes(&self) -> usize {
        self.windows.len()
    }

    /// Feed one sampling pass taken at `now`, returning alerts in sample order
    pub fn observe(&mut self, samples: &[ProcessSample], now: Instant) -> Vec<Alert> {
        let mut alerts = Vec::new();

        for sample in samples {
            if sample.pid == 0 || sample.name == IDLE_PROCESS_NAME {
                continue;
            }
            if sample.cpu_percent <= self.config.threshold {
                continue;
            }

            let span = self.config.window();
            let window = self
                .windows
                .entry(sample.pid)
                .or_insert_with(|| TimeWindow::new(span));

            if window.record(now) >= self.config.repeat_limit {
                log::warn!(
                    "Sustained CPU: {} (PID {}) above {}% {} times in {}s",
                    sample.name,
                    sample.pid,
                    self.config.threshold,
                    window.len(),
                    self.config.window_secs
                );
                alerts.push(Alert::sustained_cpu(sample));
                window.clear();
            }
        }

        // bound memory: forget processes with nothing left in their window
        self.windows.retain(|_, window| window.trim(now) > 0);

        if !alerts.is_empty() {
            self.last_activity = Some(now);
        }
        alerts
    }

    /// True when nothing fired for `status_interval`; resets the timer
    pub fn heartbeat_due(&mut self, now: Instant) -> bool {
        let due = match self.last_activity {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.config.status_interval(),
        };
        if due {
            self.last_activity = Some(now);
        }
        due
    }
}
