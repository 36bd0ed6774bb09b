//! Honeypot decoy file.
//!
//! Written once with fixed placeholder content; an existing file is left
//! untouched so its timestamps stay meaningful.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

use crate::constants::HONEYPOT_CONTENT;

/// Create the decoy if absent. Returns `true` when a new file was written.
pub fn create(path: &Path) -> std::io::Result<bool> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            file.write_all(HONEYPOT_CONTENT.as_bytes())?;
            log::info!("Honeypot created: {}", path.display());
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            log::debug!("Honeypot already present: {}", path.display());
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
