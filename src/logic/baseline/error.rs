use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BaselineError {
    /// Scan or monitor started before any baseline was built
    #[error("baseline store not found at {0}, build a baseline first")]
    NotFound(PathBuf),

    #[error("baseline store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("baseline store is malformed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("baseline store task has stopped")]
    StoreClosed,

    #[error("baseline scan task failed: {0}")]
    Task(String),
}
