//! Alert Types
//!
//! Immutable, timestamped detections handed to an `AlertSink`.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logic::process::ProcessSample;

// ============================================================================
// ALERT KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// File appeared under the monitored root
    NewFile,
    /// Baselined file content changed
    Modified,
    /// File removed from the monitored root
    Deleted,
    /// Burst of modifications inside the mass-change window
    MassChange,
    /// Process stayed above the CPU threshold
    SustainedCpu,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::NewFile => "new_file",
            AlertKind::Modified => "modified",
            AlertKind::Deleted => "deleted",
            AlertKind::MassChange => "mass_change",
            AlertKind::SustainedCpu => "sustained_cpu",
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ALERT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub kind: AlertKind,
    pub message: String,
    pub timestamp: DateTime<Local>,

    /// File the alert is about (file alerts only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Process the alert is about (CPU alerts only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
}

impl Alert {
    fn new(kind: AlertKind, message: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            message,
            timestamp: Local::now(),
            path: None,
            pid: None,
        }
    }

    fn for_path(kind: AlertKind, message: String, path: &str) -> Self {
        Self {
            path: Some(path.to_string()),
            ..Self::new(kind, message)
        }
    }

    pub fn new_file(path: &str) -> Self {
        Self::for_path(AlertKind::NewFile, format!("New file created: {}", path), path)
    }

    pub fn modified(path: &str) -> Self {
        Self::for_path(AlertKind::Modified, format!("Modified: {}", path), path)
    }

    pub fn deleted(path: &str) -> Self {
        Self::for_path(AlertKind::Deleted, format!("Deleted: {}", path), path)
    }

    pub fn mass_change(count: usize) -> Self {
        Self::new(
            AlertKind::MassChange,
            format!(
                "MASS FILE CHANGES DETECTED! Possible ransomware activity! ({} modifications)",
                count
            ),
        )
    }

    pub fn sustained_cpu(sample: &ProcessSample) -> Self {
        Self {
            pid: Some(sample.pid),
            ..Self::new(
                AlertKind::SustainedCpu,
                format!(
                    "High sustained CPU: {} (PID: {}) - {:.2}%",
                    sample.name, sample.pid, sample.cpu_percent
                ),
            )
        }
    }

    /// Activity log line: `[YYYY-MM-DD HH:MM:SS] message`
    pub fn to_log_line(&self) -> String {
        format!("[{}] {}", self.timestamp.format("%Y-%m-%d %H:%M:%S"), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_line_format() {
        let alert = Alert::deleted("/data/a.txt");
        let line = alert.to_log_line();

        // "[2024-01-02 03:04:05] Deleted: /data/a.txt"
        assert_eq!(&line[0..1], "[");
        assert_eq!(&line[20..22], "] ");
        assert_eq!(&line[5..6], "-");
        assert_eq!(&line[11..12], " ");
        assert!(line.ends_with("Deleted: /data/a.txt"));
    }

    #[test]
    fn test_sustained_cpu_message() {
        let sample = ProcessSample {
            pid: 4242,
            name: "encryptor".to_string(),
            cpu_percent: 87.456,
        };
        let alert = Alert::sustained_cpu(&sample);
        assert_eq!(alert.kind, AlertKind::SustainedCpu);
        assert_eq!(alert.pid, Some(4242));
        assert_eq!(alert.message, "High sustained CPU: encryptor (PID: 4242) - 87.46%");
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&AlertKind::MassChange).unwrap();
        assert_eq!(json, "\"mass_change\"");
        assert_eq!(AlertKind::NewFile.to_string(), "new_file");
    }
}
