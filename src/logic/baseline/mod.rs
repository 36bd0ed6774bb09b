//! Baseline Module - Content Integrity Engine
//!
//! Snapshot of path -> SHA-256 digest for every file under the monitored
//! root, used as ground truth for integrity comparison.
//!
//! # Architecture
//! - `types.rs`: `BaselineSet`, `ChangeRecord`, `DigestUpdate`
//! - `hasher.rs`: chunked SHA-256 digests, path normalization, exclusions
//! - `storage.rs`: tree walk (build) and JSON store (persist/load)
//! - `compare.rs`: one-shot stateless comparison against disk
//! - `store.rs`: single-owner live baseline shared by monitors and scans
//!
//! # Failure Strategy
//! A missing store is `NotFound`; every per-file failure is logged and skipped.

pub mod types;
pub mod error;
pub mod hasher;
pub mod storage;
pub mod compare;
pub mod store;

pub use compare::compare;
pub use error::BaselineError;
pub use hasher::{absolute_path, hash_file, is_excluded, normalize_path};
pub use storage::{build, load, persist};
pub use store::{BaselineHandle, BaselineStore};
pub use types::{BaselineSet, ChangeKind, ChangeRecord, DigestUpdate};
