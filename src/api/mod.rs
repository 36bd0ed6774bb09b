//! API Module
//!
//! Structure:
//! - commands.rs: build baseline, manual scan, create honeypot,
//!   start real-time monitor, start CPU monitor
//!
//! Usage:
//! - `api::commands::manual_scan(&config)` - Direct access
//! - `api::manual_scan(&config)` - Re-export

pub mod commands;

pub use commands::*;
