//! Central Configuration Constants
//!
//! Single source of truth for file names and detector defaults.
//! Runtime overrides go through `logic::config::Config`.

/// Baseline store file name (path -> digest JSON)
pub const HASH_DB_FILE: &str = "hash_db.json";

/// Activity log file name
pub const LOG_FILE: &str = "suspicious_activity.log";

/// Honeypot decoy file name
pub const HONEYPOT_FILE: &str = "honeypot_fake_sensitive.txt";

/// Honeypot placeholder content
pub const HONEYPOT_CONTENT: &str = "DO NOT TOUCH! This file is a honeypot.";

/// Files never hashed, compared or diffed, matched by base name
pub const EXCLUDED_FILE_NAMES: [&str; 3] = [HASH_DB_FILE, HONEYPOT_FILE, LOG_FILE];

/// Read chunk size when hashing files (bytes)
pub const HASH_CHUNK_SIZE: usize = 4096;

// ============================================
// Mass-change heuristic
// ============================================

/// Sliding window for modification bursts (seconds)
pub const DEFAULT_MASS_CHANGE_WINDOW_SECS: u64 = 10;

/// Modifications inside the window above which the alert fires
pub const DEFAULT_MASS_CHANGE_LIMIT: usize = 5;

// ============================================
// Sustained CPU detector
// ============================================

/// CPU threshold (%)
pub const DEFAULT_CPU_THRESHOLD: f32 = 10.0;

/// Per-process window (seconds)
pub const DEFAULT_CPU_WINDOW_SECS: u64 = 30;

/// Above-threshold samples inside the window that trigger an alert
pub const DEFAULT_CPU_REPEAT_LIMIT: usize = 3;

/// Sampling interval (seconds)
pub const DEFAULT_CPU_CHECK_INTERVAL_SECS: u64 = 5;

/// Heartbeat interval when nothing fired (seconds)
pub const DEFAULT_STATUS_INTERVAL_SECS: u64 = 10;

/// CPU measurement slice per snapshot (milliseconds)
pub const DEFAULT_CPU_SAMPLE_SLICE_MS: u64 = 100;

/// Name of the OS idle pseudo-process, never sampled
pub const IDLE_PROCESS_NAME: &str = "System Idle Process";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "SecureVault";

/// Check whether a base name belongs to one of the excluded files
pub fn is_excluded_name(name: &str) -> bool {
    EXCLUDED_FILE_NAMES.contains(&name)
}
