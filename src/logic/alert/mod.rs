//! Alert Module
//!
//! Alerts produced by the detectors and the sinks that receive them.
//! Each detector emits in detection order; a failed delivery is logged and
//! never stops the detector.

pub mod types;
pub mod sink;

pub use types::{Alert, AlertKind};
pub use sink::{emit, ActivityLog, AlertSink, ChannelSink, FanoutSink, LogSink, SinkError};
