//! Alert Sinks
//!
//! Detectors only know the `AlertSink` trait. Concrete sinks:
//! - `ActivityLog`: append-only text log, one line per alert
//! - `ChannelSink`: forwards to an async consumer (dashboards, popups)
//! - `LogSink`: diagnostic logger
//! - `FanoutSink`: several sinks at once

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::mpsc;

use super::types::Alert;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("alert log write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("alert consumer is gone")]
    Closed,
}

/// Receiver of emitted alerts
pub trait AlertSink: Send + Sync {
    fn deliver(&self, alert: &Alert) -> Result<(), SinkError>;
}

impl<T: AlertSink + ?Sized> AlertSink for Arc<T> {
    fn deliver(&self, alert: &Alert) -> Result<(), SinkError> {
        (**self).deliver(alert)
    }
}

/// Deliver an alert, logging instead of propagating failures
pub fn emit(sink: &dyn AlertSink, alert: Alert) {
    log::debug!("Emitting {} alert {}", alert.kind, alert.id);
    if let Err(e) = sink.deliver(&alert) {
        log::error!("Failed to deliver alert '{}': {}", alert.message, e);
    }
}

// ============================================================================
// ACTIVITY LOG
// ============================================================================

/// Append-only activity log
pub struct ActivityLog {
    file: Mutex<File>,
    lines_written: AtomicU64,
}

impl ActivityLog {
    pub fn open(path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        log::info!("Opened activity log: {:?}", path);

        Ok(Self {
            file: Mutex::new(file),
            lines_written: AtomicU64::new(0),
        })
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written.load(Ordering::SeqCst)
    }

    fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut file = self.file.lock();
        writeln!(file, "{}", line)?;
        file.flush()?;
        self.lines_written.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl AlertSink for ActivityLog {
    fn deliver(&self, alert: &Alert) -> Result<(), SinkError> {
        self.write_line(&alert.to_log_line())?;
        Ok(())
    }
}

// ============================================================================
// CHANNEL SINK
// ============================================================================

/// Forwards alerts to an async consumer
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Alert>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Alert>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl AlertSink for ChannelSink {
    fn deliver(&self, alert: &Alert) -> Result<(), SinkError> {
        self.tx.send(alert.clone()).map_err(|_| SinkError::Closed)
    }
}

// ============================================================================
// LOG SINK
// ============================================================================

/// Writes alerts to the diagnostic logger
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl AlertSink for LogSink {
    fn deliver(&self, alert: &Alert) -> Result<(), SinkError> {
        log::warn!("[{}] {}", alert.kind, alert.message);
        Ok(())
    }
}

// ============================================================================
// FANOUT
// ============================================================================

/// Delivers every alert to each inner sink, even when one of them fails
#[derive(Default, Clone)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn AlertSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl AlertSink for FanoutSink {
    fn deliver(&self, alert: &Alert) -> Result<(), SinkError> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(e) = sink.deliver(alert) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
