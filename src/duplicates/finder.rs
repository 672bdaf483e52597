//! Duplicate finder: walk, hash, group.
//!
//! # Overview
//!
//! This module orchestrates the scan pipeline:
//! 1. **Resolve** the root (`~` expansion, canonicalization); a missing root
//!    fails here, before any traversal
//! 2. **Walk** the tree, collecting every regular file in traversal order
//! 3. **Hash** each file's full contents on a bounded thread pool
//! 4. **Group** digests in traversal order through a [`DigestIndex`]
//!
//! Files that cannot be read are skipped and recorded in
//! [`ScanSummary::scan_errors`]; they never abort the scan.
//!
//! # Ordering
//!
//! Hash results are collected back into traversal order before grouping,
//! so the groups and their first paths do not depend on how many hashing
//! threads ran or which file finished first.
//!
//! # Example
//!
//! ```no_run
//! use dupscan::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default().with_io_threads(4));
//! let (groups, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! println!("Found {} duplicate groups", groups.len());
//! println!("Reclaimable space: {}", summary.reclaimable_display());
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;
use rayon::prelude::*;

use super::{DigestIndex, DuplicateGroup};
use crate::progress::{ProgressCallback, PHASE_HASHING, PHASE_WALKING};
use crate::scanner::{
    path_utils, FileEntry, Hash, HashAlgorithm, HashError, Hasher, ScanError, Walker, WalkerConfig,
};

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Number of threads used for hashing. 1 hashes strictly sequentially.
    pub io_threads: usize,
    /// Digest algorithm.
    pub algorithm: HashAlgorithm,
    /// Directory walker options.
    pub walker_config: WalkerConfig,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("io_threads", &self.io_threads)
            .field("algorithm", &self.algorithm)
            .field("walker_config", &self.walker_config)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            io_threads: 4,
            algorithm: HashAlgorithm::default(),
            walker_config: WalkerConfig::default(),
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the number of hashing threads (minimum 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Summary statistics for a completed scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Resolved root that was scanned
    pub root: PathBuf,
    /// Number of regular files discovered by the walk
    pub total_files: usize,
    /// Number of files successfully hashed
    pub hashed_files: usize,
    /// Total size of all hashed files in bytes
    pub total_size: u64,
    /// Number of distinct digests among hashed files
    pub unique_digests: usize,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding the first of each group)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates
    pub reclaimable_space: u64,
    /// Digest algorithm used
    pub algorithm: HashAlgorithm,
    /// Duration of the entire scan
    pub scan_duration: Duration,
    /// Entries skipped because they could not be read, in traversal order
    pub scan_errors: Vec<ScanError>,
}

impl ScanSummary {
    /// Number of entries skipped because of errors.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.scan_errors.len()
    }

    /// Calculate the percentage of space that is wasted by duplicates.
    #[must_use]
    pub fn wasted_percentage(&self) -> f64 {
        if self.total_size == 0 {
            0.0
        } else {
            (self.reclaimable_space as f64 / self.total_size as f64) * 100.0
        }
    }

    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Format total size as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        ByteSize::b(self.total_size).to_string()
    }
}

/// Errors that abort a scan.
///
/// Only the root can fail a scan; everything below it is skipped instead.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The provided path exists but could not be resolved.
    #[error("Cannot resolve {path}: {source}")]
    Io {
        /// Path that failed to resolve
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Duplicate finder that runs the scan pipeline.
///
/// # Example
///
/// ```no_run
/// use dupscan::duplicates::DuplicateFinder;
/// use std::path::Path;
///
/// let finder = DuplicateFinder::with_defaults();
/// match finder.find_duplicates(Path::new(".")) {
///     Ok((groups, summary)) => {
///         println!("Found {} duplicate groups", groups.len());
///         println!("Can reclaim {} bytes", summary.reclaimable_space);
///     }
///     Err(e) => eprintln!("Scan failed: {}", e),
/// }
/// ```
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let hasher = Hasher::new().with_algorithm(config.algorithm);
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// The configuration this finder runs with.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Find all duplicate files under `path`.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if the path does not exist, is not a
    /// directory, or cannot be resolved. Nothing is walked in that case.
    pub fn find_duplicates(
        &self,
        path: &Path,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start_time = Instant::now();
        let root = resolve_root(path)?;

        log::info!("Starting duplicate scan of {}", root.display());

        let (files, walk_errors) = self.collect_files(&root);
        let (groups, mut summary) = self.group_files(files, walk_errors);

        summary.root = root;
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} files, {} duplicate groups, {} skipped in {:.2?}",
            summary.total_files,
            summary.duplicate_groups,
            summary.skipped(),
            summary.scan_duration
        );

        Ok((groups, summary))
    }

    /// Hash and group an explicit list of files, in the given order.
    ///
    /// Unreadable files are skipped and recorded in the summary.
    #[must_use]
    pub fn find_duplicates_from_files(
        &self,
        files: Vec<FileEntry>,
    ) -> (Vec<DuplicateGroup>, ScanSummary) {
        let start_time = Instant::now();
        let (groups, mut summary) = self.group_files(files, Vec::new());
        summary.scan_duration = start_time.elapsed();
        (groups, summary)
    }

    /// Walk `root`, returning files and walk errors in traversal order.
    fn collect_files(&self, root: &Path) -> (Vec<FileEntry>, Vec<ScanError>) {
        let callback = self.config.progress_callback.as_deref();
        if let Some(cb) = callback {
            cb.on_phase_start(PHASE_WALKING, 0);
        }

        let walker = Walker::new(root, self.config.walker_config.clone());
        let mut files = Vec::new();
        let mut errors = Vec::new();

        for result in walker.walk() {
            match result {
                Ok(file) => {
                    if let Some(cb) = callback {
                        cb.on_progress(files.len() + 1, &file_label(&file));
                    }
                    files.push(file);
                }
                Err(e) => {
                    log::debug!("Skipping unreadable entry: {}", e);
                    if let Some(cb) = callback {
                        cb.on_skip(&e);
                    }
                    errors.push(e);
                }
            }
        }

        if let Some(cb) = callback {
            cb.on_phase_end(PHASE_WALKING);
        }
        log::debug!(
            "Walk found {} files ({} errors) under {}",
            files.len(),
            errors.len(),
            root.display()
        );

        (files, errors)
    }

    /// Hash `files` and fold the results into duplicate groups.
    fn group_files(
        &self,
        files: Vec<FileEntry>,
        walk_errors: Vec<ScanError>,
    ) -> (Vec<DuplicateGroup>, ScanSummary) {
        let mut summary = ScanSummary {
            total_files: files.len(),
            algorithm: self.config.algorithm,
            scan_errors: walk_errors,
            ..Default::default()
        };

        let callback = self.config.progress_callback.as_deref();
        let mut index = DigestIndex::new();

        for (file, result) in self.hash_files(files) {
            match result {
                Ok(hash) => {
                    summary.hashed_files += 1;
                    summary.total_size += file.size;
                    index.insert(hash, file);
                }
                Err(e) => {
                    log::debug!("Skipping unreadable file: {}", e);
                    let error = ScanError::FileUnreadable(e);
                    if let Some(cb) = callback {
                        cb.on_skip(&error);
                    }
                    summary.scan_errors.push(error);
                }
            }
        }

        summary.unique_digests = index.unique_digests();
        let groups = index.into_groups();
        summary.duplicate_groups = groups.len();
        summary.duplicate_files = groups.iter().map(DuplicateGroup::duplicate_count).sum();
        summary.reclaimable_space = groups.iter().map(DuplicateGroup::wasted_space).sum();

        (groups, summary)
    }

    /// Hash every file, returning results in the same order as the input.
    fn hash_files(&self, files: Vec<FileEntry>) -> Vec<(FileEntry, Result<Hash, HashError>)> {
        if files.is_empty() {
            log::debug!("No files to hash");
            return Vec::new();
        }

        let callback = self.config.progress_callback.as_deref();
        if let Some(cb) = callback {
            cb.on_phase_start(PHASE_HASHING, files.len());
        }
        log::debug!(
            "Hashing {} files with {} on {} threads",
            files.len(),
            self.config.algorithm,
            self.config.io_threads
        );

        let done = AtomicUsize::new(0);
        let hash_one = |file: FileEntry| {
            let result = self.hasher.full_hash(&file.path);
            if let Some(cb) = callback {
                let current = done.fetch_add(1, Ordering::Relaxed) + 1;
                cb.on_progress(current, &file_label(&file));
                if result.is_ok() {
                    cb.on_item_completed(file.size);
                }
            }
            (file, result)
        };

        let results: Vec<_> = if self.config.io_threads <= 1 {
            files.into_iter().map(hash_one).collect()
        } else {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.io_threads)
                .build()
            {
                // Indexed parallel collect keeps input order
                Ok(pool) => pool.install(|| files.into_par_iter().map(hash_one).collect()),
                Err(e) => {
                    log::warn!("Failed to create hashing thread pool, hashing sequentially: {}", e);
                    files.into_iter().map(hash_one).collect()
                }
            }
        };

        if let Some(cb) = callback {
            cb.on_phase_end(PHASE_HASHING);
        }

        results
    }
}

/// Resolve and validate the scan root.
fn resolve_root(path: &Path) -> Result<PathBuf, FinderError> {
    let root = path_utils::resolve_root(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            FinderError::PathNotFound(path_utils::expand_tilde(path))
        }
        _ => FinderError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    if !root.is_dir() {
        return Err(FinderError::NotADirectory(root));
    }

    Ok(root)
}

fn file_label(file: &FileEntry) -> String {
    file.path.to_string_lossy().into_owned()
}
