//! Sliding time window shared by both heuristics.
//!
//! Holds event instants in arrival order. `trim` drops every entry that has
//! aged out of the span relative to `now`; detectors clear the window on
//! trigger. An entry exactly `span` old is kept by `new` windows and dropped
//! by `half_open` ones.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct TimeWindow {
    span: Duration,
    stamps: VecDeque<Instant>,
    keep_boundary: bool,
}

impl TimeWindow {
    /// Keeps entries whose age is at most `span`
    pub fn new(span: Duration) -> Self {
        Self {
            span,
            stamps: VecDeque::new(),
            keep_boundary: true,
        }
    }

    /// Keeps entries whose age is strictly less than `span`
    pub fn half_open(span: Duration) -> Self {
        Self {
            keep_boundary: false,
            ..Self::new(span)
        }
    }

    /// Record an event at `now` and trim, returning the remaining count
    pub fn record(&mut self, now: Instant) -> usize {
        self.stamps.push_back(now);
        self.trim(now)
    }

    /// Drop expired entries, returning the remaining count
    pub fn trim(&mut self, now: Instant) -> usize {
        while let Some(&oldest) = self.stamps.front() {
            if self.expired(now.saturating_duration_since(oldest)) {
                self.stamps.pop_front();
            } else {
                break;
            }
        }
        self.stamps.len()
    }

    fn expired(&self, age: Duration) -> bool {
        if self.keep_boundary {
            age > self.span
        } else {
            age >= self.span
        }
    }

    pub fn clear(&mut self) {
        self.stamps.clear();
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    /// Most recent entry, if any
    pub fn latest(&self) -> Option<Instant> {
        self.stamps.back().copied()
    }
}
