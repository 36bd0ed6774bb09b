//! SecureVault - ransomware behavior detection core
//!
//! Content-integrity baselining combined with two behavioral heuristics:
//! bursts of file modifications and processes holding high CPU.

pub mod api;
pub mod constants;
pub mod logic;

pub use logic::alert::{Alert, AlertKind, AlertSink};
pub use logic::config::Config;
