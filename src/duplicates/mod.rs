//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Digest indexing (first path per digest, duplicate groups)
//! - Orchestrating the walk, hash and group pipeline

pub mod finder;
pub mod groups;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary};
pub use groups::{DigestIndex, DuplicateGroup};
