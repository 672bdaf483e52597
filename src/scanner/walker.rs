//! Directory walker implementation using jwalk.
//!
//! # Overview
//!
//! [`Walker`] enumerates every regular file under a root directory and
//! yields a [`FileEntry`] for each. Entries come out in directory-listing
//! order (depth first); no sort is applied unless [`WalkerConfig::sort`] is
//! set. That order is what decides which path of a duplicate group is
//! reported first.
//!
//! # Features
//!
//! - Links to files are hashed under their own path; linked directories
//!   are only descended into when following symlinks
//! - Gitignore-style pattern matching via the `ignore` crate; ignored
//!   directories are pruned rather than descended into
//! - Size filtering (min/max)
//! - Hidden file filtering
//! - Unreadable entries are yielded as [`ScanError`] values so the caller
//!   can skip them and keep going
//!
//! # Example
//!
//! ```no_run
//! use dupscan::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use jwalk::WalkDir;

use super::{FileEntry, HashError, ScanError, WalkerConfig};

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupscan::scanner::{Walker, WalkerConfig};
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."), WalkerConfig::default());
    /// ```
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// The root this walker starts from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Build the ignore matcher from config patterns and, optionally, the
    /// root's `.gitignore`. Returns `None` when nothing is configured.
    fn build_gitignore(&self) -> Option<Gitignore> {
        if self.config.ignore_patterns.is_empty() && !self.config.use_gitignore {
            return None;
        }

        let mut builder = GitignoreBuilder::new(&self.root);

        if self.config.use_gitignore {
            let gitignore_path = self.root.join(".gitignore");
            if gitignore_path.exists() {
                if let Some(e) = builder.add(&gitignore_path) {
                    log::warn!(
                        "Failed to load .gitignore from {}: {}",
                        gitignore_path.display(),
                        e
                    );
                } else {
                    log::debug!("Loaded .gitignore from {}", gitignore_path.display());
                }
            }
        }

        for pattern in &self.config.ignore_patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                log::warn!("Invalid ignore pattern '{}': {}", pattern, e);
            }
        }

        match builder.build() {
            Ok(gitignore) if gitignore.is_empty() => None,
            Ok(gitignore) => Some(gitignore),
            Err(e) => {
                log::warn!("Failed to build ignore patterns: {}", e);
                None
            }
        }
    }

    /// Check if a file passes size filters.
    fn passes_size_filter(&self, size: u64) -> bool {
        if let Some(min) = self.config.min_size {
            if size < min {
                return false;
            }
        }
        if let Some(max) = self.config.max_size {
            if size > max {
                return false;
            }
        }
        true
    }

    /// Walk the directory tree, yielding file entries.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration, including directories that cannot be listed. Special
    /// files (sockets, fifos, devices) are silently skipped. Links to files
    /// are yielded under the link's own path and a dangling link is yielded
    /// as [`ScanError::FileUnreadable`]; linked directories are only
    /// descended into when `follow_symlinks` is set.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        let gitignore = self.build_gitignore().map(Arc::new);
        let root = self.root.clone();

        let walk_dir = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .skip_hidden(self.config.skip_hidden)
            .sort(self.config.sort)
            .process_read_dir(move |_depth, _path, _read_dir_state, children| {
                let Some(gi) = gitignore.as_deref() else {
                    return;
                };
                children.retain(|child| match child {
                    Ok(entry) => {
                        let path = entry.path();
                        let ignored = is_ignored(gi, &root, &path, entry.file_type().is_dir());
                        if ignored {
                            log::trace!("Ignoring: {}", path.display());
                        }
                        !ignored
                    }
                    Err(_) => true,
                });
            });

        walk_dir
            .into_iter()
            .filter_map(move |entry_result| match entry_result {
                Ok(mut entry) => {
                    // A directory that could not be listed still comes through as Ok
                    if let Some(error) = entry.read_children_error.take() {
                        return Some(Err(self.convert_jwalk_error(error, &entry.path())));
                    }

                    // The root itself is yielded at depth 0
                    if entry.depth() == 0 {
                        return None;
                    }

                    let path = entry.path();
                    let file_type = entry.file_type();

                    if file_type.is_dir() {
                        return None;
                    }

                    // Stat through links so a link to a file is hashed like the file
                    let metadata = match std::fs::metadata(&path) {
                        Ok(m) => m,
                        Err(source) if file_type.is_symlink() => {
                            log::debug!("Cannot open link target {}: {}", path.display(), source);
                            return Some(Err(ScanError::FileUnreadable(HashError::from_io(
                                &path, source,
                            ))));
                        }
                        Err(source) => {
                            log::debug!("Cannot stat {}: {}", path.display(), source);
                            return Some(Err(ScanError::Io { path, source }));
                        }
                    };

                    if file_type.is_symlink() && metadata.is_dir() {
                        log::trace!("Not descending into linked directory: {}", path.display());
                        return None;
                    }

                    if !metadata.is_file() {
                        log::trace!("Skipping special file: {}", path.display());
                        return None;
                    }

                    let size = metadata.len();
                    if !self.passes_size_filter(size) {
                        log::trace!(
                            "Skipping file due to size filter ({}): {}",
                            size,
                            path.display()
                        );
                        return None;
                    }

                    Some(Ok(FileEntry::new(path, size)))
                }
                Err(e) => Some(Err(self.convert_jwalk_error(e, &self.root))),
            })
    }

    /// Convert a jwalk error into a [`ScanError::Walk`].
    ///
    /// `fallback` names the entry when the error carries no path.
    fn convert_jwalk_error(&self, error: jwalk::Error, fallback: &Path) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| fallback.to_path_buf(), Path::to_path_buf);
        let message = error
            .io_error()
            .map_or_else(|| error.to_string(), ToString::to_string);
        log::debug!("Walker error for {}: {}", path.display(), message);
        ScanError::Walk { path, message }
    }
}

/// Match `path` against the ignore rules, relative to `root`.
fn is_ignored(gitignore: &Gitignore, root: &Path, path: &Path, is_dir: bool) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    gitignore.matched(relative, is_dir).is_ignore()
}
