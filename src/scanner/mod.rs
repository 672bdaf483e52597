//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Directory walking using jwalk, in directory-listing order
//! - Streaming content hashing with SHA-256 or BLAKE3
//! - Root path resolution
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: Streaming file hashing
//! - [`path_utils`]: Root path expansion and validation
//!
//! # Example
//!
//! ```no_run
//! use dupscan::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     skip_hidden: true,
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("."), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("skip {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod path_utils;
pub mod walker;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

// Re-export main types
pub use hasher::{hash_to_hex, short_hex, Hash, HashAlgorithm, Hasher, CHUNK_SIZE, SHORT_HEX_LEN};
pub use walker::Walker;

/// A discovered regular file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path to the file (absolute when the walk root is absolute)
    pub path: PathBuf,
    /// File size in bytes at discovery time
    pub size: u64,
}

impl FileEntry {
    /// Create a new FileEntry.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Configuration for directory walking.
///
/// The default considers every regular file under the root, hidden and
/// empty files included, and does not follow symbolic links.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Follow symbolic links during traversal.
    /// Symlink cycles are reported as walk errors and skipped.
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,

    /// Sort directory entries by file name.
    /// Makes the first path of each group reproducible across filesystems.
    pub sort: bool,

    /// Honour the `.gitignore` file at the walk root.
    pub use_gitignore: bool,

    /// Minimum file size to include (in bytes).
    pub min_size: Option<u64>,

    /// Maximum file size to include (in bytes).
    pub max_size: Option<u64>,

    /// Gitignore-style patterns to ignore.
    pub ignore_patterns: Vec<String>,
}

impl WalkerConfig {
    /// Set symlink following.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Set hidden file skipping.
    #[must_use]
    pub fn with_skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    /// Set name-sorted traversal.
    #[must_use]
    pub fn with_sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    /// Set `.gitignore` handling.
    #[must_use]
    pub fn with_gitignore(mut self, enabled: bool) -> Self {
        self.use_gitignore = enabled;
        self
    }

    /// Set the size window.
    #[must_use]
    pub fn with_size_range(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.min_size = min;
        self.max_size = max;
        self
    }

    /// Set ignore patterns.
    #[must_use]
    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }
}

/// A non-fatal problem encountered while scanning.
///
/// Every variant names the path it concerns first, so `skip {err}` reads
/// as a complete diagnostic line.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The walker could not read a directory entry.
    #[error("{path}: {message}")]
    Walk {
        /// Path where the error occurred
        path: PathBuf,
        /// Description of the failure
        message: String,
    },

    /// Metadata for a discovered entry could not be read.
    #[error("{path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A file could not be opened or read while hashing.
    #[error(transparent)]
    FileUnreadable(#[from] HashError),
}

impl ScanError {
    /// The path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Walk { path, .. } | Self::Io { path, .. } => path,
            Self::FileUnreadable(e) => e.path(),
        }
    }
}

/// Errors that can occur while hashing a single file.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file disappeared before it could be read.
    #[error("{0}: file not found")]
    NotFound(PathBuf),

    /// Permission was denied when opening the file.
    #[error("{0}: permission denied")]
    PermissionDenied(PathBuf),

    /// Any other I/O failure while opening or reading.
    #[error("{path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised for `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// The path of the file that failed.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(path) | Self::PermissionDenied(path) => path,
            Self::Io { path, .. } => path,
        }
    }
}
