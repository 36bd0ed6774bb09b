use std::path::Path;

use super::hasher::{hash_file, is_excluded};
use super::types::{BaselineSet, ChangeRecord};

/// Compare a baseline against the current disk state.
///
/// Pure: the baseline is not touched. One read per baseline entry, results
/// ordered by path.
pub fn compare(baseline: &BaselineSet) -> Vec<ChangeRecord> {
    let mut changes = Vec::new();

    for path in baseline.sorted_paths() {
        let file = Path::new(path);
        if is_excluded(file) {
            continue;
        }

        if !file.exists() {
            changes.push(ChangeRecord::deleted(path));
            continue;
        }

        match hash_file(file) {
            Ok(current) => {
                if baseline.get(path) != Some(current.as_str()) {
                    changes.push(ChangeRecord::modified(path));
                }
            }
            Err(e) => {
                // integrity can no longer be confirmed
                log::warn!("Error reading {}: {}", path, e);
                changes.push(ChangeRecord::modified(path));
            }
        }
    }

    changes
}
