//! Detector Configuration
//!
//! Every threshold and path used by the engine travels in one `Config`
//! value passed at construction. Sources, lowest priority first:
//! built-in defaults, an optional JSON file, `SECUREVAULT_*` environment
//! variables.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_CPU_CHECK_INTERVAL_SECS, DEFAULT_CPU_REPEAT_LIMIT, DEFAULT_CPU_SAMPLE_SLICE_MS,
    DEFAULT_CPU_THRESHOLD, DEFAULT_CPU_WINDOW_SECS, DEFAULT_MASS_CHANGE_LIMIT,
    DEFAULT_MASS_CHANGE_WINDOW_SECS, DEFAULT_STATUS_INTERVAL_SECS, HASH_DB_FILE, HONEYPOT_FILE,
    LOG_FILE,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the baseline store, activity log and honeypot
    pub data_dir: PathBuf,

    pub mass_change: MassChangeConfig,

    pub cpu: CpuMonitorConfig,
}

/// Burst modification heuristic
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MassChangeConfig {
    pub window_secs: u64,
    /// Alert fires when the trimmed window holds more than this many entries
    pub limit: usize,
}

/// Sustained CPU detector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CpuMonitorConfig {
    pub threshold: f32,
    pub window_secs: u64,
    pub repeat_limit: usize,
    pub check_interval_secs: u64,
    pub status_interval_secs: u64,
    pub sample_slice_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            mass_change: MassChangeConfig::default(),
            cpu: CpuMonitorConfig::default(),
        }
    }
}

impl Default for MassChangeConfig {
    fn default() -> Self {
        Self {
            window_secs: DEFAULT_MASS_CHANGE_WINDOW_SECS,
            limit: DEFAULT_MASS_CHANGE_LIMIT,
        }
    }
}

impl Default for CpuMonitorConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CPU_THRESHOLD,
            window_secs: DEFAULT_CPU_WINDOW_SECS,
            repeat_limit: DEFAULT_CPU_REPEAT_LIMIT,
            check_interval_secs: DEFAULT_CPU_CHECK_INTERVAL_SECS,
            status_interval_secs: DEFAULT_STATUS_INTERVAL_SECS,
            sample_slice_ms: DEFAULT_CPU_SAMPLE_SLICE_MS,
        }
    }
}

impl MassChangeConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl CpuMonitorConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status_interval_secs)
    }

    pub fn sample_slice(&self) -> Duration {
        Duration::from_millis(self.sample_slice_ms)
    }
}

impl Config {
    /// Defaults overridden by environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Load a JSON config file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config =
            serde_json::from_slice(&data).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(dir) = env::var("SECUREVAULT_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        override_from_env("SECUREVAULT_MASS_CHANGE_WINDOW", &mut self.mass_change.window_secs);
        override_from_env("SECUREVAULT_MASS_CHANGE_LIMIT", &mut self.mass_change.limit);
        override_from_env("SECUREVAULT_CPU_THRESHOLD", &mut self.cpu.threshold);
        override_from_env("SECUREVAULT_CPU_WINDOW", &mut self.cpu.window_secs);
        override_from_env("SECUREVAULT_CPU_REPEAT_LIMIT", &mut self.cpu.repeat_limit);
        override_from_env("SECUREVAULT_CPU_INTERVAL", &mut self.cpu.check_interval_secs);
        override_from_env("SECUREVAULT_STATUS_INTERVAL", &mut self.cpu.status_interval_secs);
    }

    /// Baseline store location
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(HASH_DB_FILE)
    }

    /// Activity log location
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }

    /// Honeypot decoy location
    pub fn honeypot_path(&self) -> PathBuf {
        self.data_dir.join(HONEYPOT_FILE)
    }
}

fn override_from_env<T: std::str::FromStr>(key: &str, slot: &mut T) {
    if let Some(value) = env::var(key).ok().and_then(|s| s.parse().ok()) {
        *slot = value;
    }
}
