//! Duplicate groups and the digest index that builds them.
//!
//! # Overview
//!
//! [`DigestIndex`] consumes `(digest, file)` pairs in traversal order. It
//! remembers the first file seen for each digest; when a later file with a
//! different path produces the same digest, a [`DuplicateGroup`] is opened
//! (seeded with that first file) and the new file appended to it.
//!
//! Groups therefore always hold two or more files, the first element is
//! always the earliest file in traversal order, and since every file has
//! exactly one digest no file can belong to two groups.
//!
//! # Example
//!
//! ```
//! use dupscan::duplicates::DigestIndex;
//! use dupscan::scanner::FileEntry;
//! use std::path::PathBuf;
//!
//! let mut index = DigestIndex::new();
//! index.insert([1u8; 32], FileEntry::new(PathBuf::from("/a/x.txt"), 5));
//! index.insert([2u8; 32], FileEntry::new(PathBuf::from("/c/y.txt"), 3));
//! index.insert([1u8; 32], FileEntry::new(PathBuf::from("/b/x.txt"), 5));
//!
//! let groups = index.into_groups();
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].files[0].path, PathBuf::from("/a/x.txt"));
//! assert_eq!(groups[0].files[1].path, PathBuf::from("/b/x.txt"));
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::scanner::{hash_to_hex, short_hex, FileEntry, Hash, SHORT_HEX_LEN};

/// Confirmed duplicate group of files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Content digest shared by every file in the group
    pub hash: Hash,
    /// Size in bytes of the first file (identical content implies identical size)
    pub size: u64,
    /// Files in the order they were added, first-seen file first
    pub files: Vec<FileEntry>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(hash: Hash, size: u64, files: Vec<FileEntry>) -> Self {
        Self { hash, size, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Total wasted space (all copies minus one).
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }

    /// Hash as hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.hash)
    }

    /// Leading hex characters of the hash, for human-facing output.
    #[must_use]
    pub fn short_hash(&self) -> String {
        short_hex(&self.hash, SHORT_HEX_LEN)
    }

    /// Get just the paths of files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Accumulates digests into duplicate groups.
#[derive(Debug, Default)]
pub struct DigestIndex {
    /// First file seen for each digest
    first_seen: HashMap<Hash, FileEntry>,
    /// Position of each digest's group in `groups`
    group_slots: HashMap<Hash, usize>,
    /// Groups in creation order
    groups: Vec<DuplicateGroup>,
}

impl DigestIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `entry` has content digest `hash`.
    ///
    /// Returns `true` if the entry joined a duplicate group. Re-inserting
    /// the same path that first produced a digest is ignored.
    pub fn insert(&mut self, hash: Hash, entry: FileEntry) -> bool {
        let first = match self.first_seen.entry(hash) {
            Entry::Vacant(slot) => {
                slot.insert(entry);
                return false;
            }
            Entry::Occupied(slot) => slot.into_mut(),
        };

        if first.path == entry.path {
            log::trace!("Ignoring revisit of {}", entry.path.display());
            return false;
        }

        let slot = match self.group_slots.entry(hash) {
            Entry::Occupied(slot) => *slot.get(),
            Entry::Vacant(slot) => {
                self.groups
                    .push(DuplicateGroup::new(hash, first.size, vec![first.clone()]));
                *slot.insert(self.groups.len() - 1)
            }
        };

        log::trace!(
            "Duplicate of {}: {}",
            self.groups[slot].files[0].path.display(),
            entry.path.display()
        );
        self.groups[slot].files.push(entry);
        true
    }

    /// Number of distinct digests seen.
    #[must_use]
    pub fn unique_digests(&self) -> usize {
        self.first_seen.len()
    }

    /// Number of duplicate groups so far.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Consume the index, returning groups in the order they were created.
    #[must_use]
    pub fn into_groups(self) -> Vec<DuplicateGroup> {
        self.groups
    }
}
