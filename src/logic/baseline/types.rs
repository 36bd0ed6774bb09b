use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// BASELINE SET
// ============================================================================

/// Normalized absolute path -> hex SHA-256 digest.
///
/// Serialized as a flat JSON object so the store stays human-diffable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaselineSet {
    entries: HashMap<String, String>,
}

impl BaselineSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Insert or overwrite, returning the previous digest
    pub fn insert(&mut self, path: String, digest: String) -> Option<String> {
        self.entries.insert(path, digest)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, d)| (p.as_str(), d.as_str()))
    }

    /// Paths in lexical order
    pub fn sorted_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}

impl FromIterator<(String, String)> for BaselineSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// CHANGE RECORDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Modified,
    Deleted,
}

/// One finding of a one-shot comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub path: String,
    pub kind: ChangeKind,
}

impl ChangeRecord {
    pub fn modified(path: &str) -> Self {
        Self {
            path: path.to_string(),
            kind: ChangeKind::Modified,
        }
    }

    pub fn deleted(path: &str) -> Self {
        Self {
            path: path.to_string(),
            kind: ChangeKind::Deleted,
        }
    }
}

impl std::fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ChangeKind::Modified => write!(f, "{}", self.path),
            ChangeKind::Deleted => write!(f, "{} (deleted)", self.path),
        }
    }
}

// ============================================================================
// LIVE UPDATES
// ============================================================================

/// Outcome of offering a freshly computed digest to the live baseline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigestUpdate {
    /// No entry for this path; nothing stored
    Untracked,
    /// Digest matches the stored one
    Unchanged,
    /// Entry replaced with the new digest
    Changed { previous: String },
}
