//! Content digests and path normalization.

use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::constants::{is_excluded_name, HASH_CHUNK_SIZE};

/// Stream a file through SHA-256, returning the lowercase hex digest
pub fn hash_file(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; HASH_CHUNK_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Absolute, lexically normalized form of `path`.
///
/// `.` components are dropped and `..` pops one component. The filesystem
/// is never consulted, so symlinks are not resolved and missing paths work.
pub fn absolute_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}

/// Baseline key for `path`: its `absolute_path` as a string.
///
/// `None` for paths that are not valid UTF-8; such files cannot be keyed
/// without losing bytes and are skipped by callers.
pub fn normalize_path(path: &Path) -> Option<String> {
    absolute_path(path).into_os_string().into_string().ok()
}

/// True when the base name of `path` is one of the engine's own files
pub fn is_excluded(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(is_excluded_name)
        .unwrap_or(false)
}
