//! Process CPU snapshots.
//!
//! `ProcessSource` is the capability the sampler depends on; the sysinfo
//! backend measures each process over a short slice between two refreshes.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sysinfo::System;

/// One process measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSample {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
}

/// Supplier of point-in-time CPU readings.
///
/// `snapshot` may block for the measurement slice; callers run it off the
/// async workers.
pub trait ProcessSource: Send + 'static {
    fn snapshot(&mut self) -> Vec<ProcessSample>;
}

/// sysinfo-backed sampler
pub struct SysinfoProcessSource {
    system: System,
    slice: Duration,
}

impl SysinfoProcessSource {
    pub fn new(slice: Duration) -> Self {
        // first reading of every process is meaningless, prime it here
        let mut system = System::new();
        system.refresh_processes();

        Self {
            system,
            slice: slice.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL),
        }
    }
}

impl ProcessSource for SysinfoProcessSource {
    fn snapshot(&mut self) -> Vec<ProcessSample> {
        self.system.refresh_processes();
        let before: HashSet<u32> = self.system.processes().keys().map(|pid| pid.as_u32()).collect();

        std::thread::sleep(self.slice);
        self.system.refresh_processes();

        // processes that started or vanished during the slice are skipped
        self.system
            .processes()
            .iter()
            .filter(|(pid, _)| before.contains(&pid.as_u32()))
            .map(|(pid, process)| ProcessSample {
                pid: pid.as_u32(),
                name: process.name().to_string(),
                cpu_percent: process.cpu_usage(),
            })
            .collect()
    }
}
