//! Logic Module - Detection Engines
//!
//! Integrity baseline, real-time change correlation and sustained CPU
//! detection, plus the alert plumbing they share.

// Shared infrastructure
pub mod config;
pub mod window;
pub mod alert;
pub mod runner;

// Engines
pub mod baseline;
pub mod monitor;
pub mod process;
pub mod honeypot;
