//! Root path resolution.
//!
//! Turns the user-supplied scan root into an absolute, symlink-free path:
//! a leading `~` is expanded to the home directory, then the result is
//! canonicalized. Canonicalization fails for paths that do not exist, which
//! is how the finder detects a missing root before walking anything.
//!
//! # Example
//!
//! ```
//! use dupscan::scanner::path_utils::expand_tilde;
//! use std::path::Path;
//!
//! // Paths without a leading tilde are returned unchanged
//! assert_eq!(expand_tilde(Path::new("/tmp/x")), Path::new("/tmp/x"));
//! ```

use std::io;
use std::path::{Component, Path, PathBuf};

use directories::BaseDirs;

/// Expand a leading `~` component to the current user's home directory.
///
/// `~user` forms are left untouched, as is everything when the home
/// directory cannot be determined.
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => match BaseDirs::new() {
            Some(dirs) => dirs.home_dir().join(components.as_path()),
            None => {
                log::debug!("No home directory found, leaving {} as is", path.display());
                path.to_path_buf()
            }
        },
        _ => path.to_path_buf(),
    }
}

/// Resolve `path` to an absolute canonical path.
///
/// # Errors
///
/// Returns the underlying I/O error when the path (after tilde expansion)
/// does not exist or cannot be resolved. `ErrorKind::NotFound` means the
/// root is missing.
pub fn resolve_root(path: &Path) -> io::Result<PathBuf> {
    let expanded = expand_tilde(path);
    let resolved = expanded.canonicalize()?;
    log::debug!("Resolved {} to {}", path.display(), resolved.display());
    Ok(resolved)
}
