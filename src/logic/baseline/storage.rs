use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use walkdir::WalkDir;

use super::error::BaselineError;
use super::hasher::{absolute_path, hash_file, is_excluded, normalize_path};
use super::types::BaselineSet;

/// Walk `root` recursively and digest every regular file.
///
/// Unreadable files and directories are logged and skipped, as are files
/// whose path is not valid UTF-8.
pub fn build(root: &Path) -> BaselineSet {
    let root = absolute_path(root);
    let mut baseline = BaselineSet::new();
    let mut skipped = 0usize;

    for entry in WalkDir::new(&root) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                skipped += 1;
                continue;
            }
        };

        if !entry.file_type().is_file() || is_excluded(entry.path()) {
            continue;
        }

        let Some(key) = normalize_path(entry.path()) else {
            log::warn!("Skipping non UTF-8 path: {}", entry.path().display());
            skipped += 1;
            continue;
        };

        match hash_file(entry.path()) {
            Ok(digest) => {
                baseline.insert(key, digest);
            }
            Err(e) => {
                log::warn!("Error reading {}: {}", entry.path().display(), e);
                skipped += 1;
            }
        }
    }

    log::info!(
        "Baseline built for {}: {} files hashed, {} skipped",
        root.display(),
        baseline.len(),
        skipped
    );
    baseline
}

/// Save baseline to disk
pub fn persist(baseline: &BaselineSet, path: &Path) -> Result<(), BaselineError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_vec_pretty(baseline)?;
    fs::write(path, json)?;
    log::info!("Baseline saved to {:?} ({} entries)", path, baseline.len());
    Ok(())
}

/// Load baseline from disk
pub fn load(path: &Path) -> Result<BaselineSet, BaselineError> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(BaselineError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    let baseline: BaselineSet = serde_json::from_slice(&data)?;
    log::debug!("Loaded baseline {:?} ({} entries)", path, baseline.len());
    Ok(baseline)
}
