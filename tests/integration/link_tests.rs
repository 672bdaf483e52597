#![cfg(unix)]

use dupscan::duplicates::{DuplicateFinder, FinderConfig};
use dupscan::scanner::{HashError, ScanError, WalkerConfig};
use std::fs;
use std::os::unix::fs::symlink;
use tempfile::tempdir;

#[test]
fn test_link_to_file_grouped_with_target() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("original.txt");
    fs::write(&original, b"content").unwrap();
    symlink(&original, dir.path().join("link.txt")).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    let root = dir.path().canonicalize().unwrap();
    assert_eq!(summary.total_files, 2);
    assert_eq!(groups.len(), 1);
    let mut paths = groups[0].paths();
    paths.sort();
    // The link keeps its own name rather than resolving to the target
    assert_eq!(paths, vec![root.join("link.txt"), root.join("original.txt")]);
}

#[test]
fn test_linked_directory_not_descended_by_default() {
    let dir = tempdir().unwrap();
    let real = dir.path().join("real");
    fs::create_dir(&real).unwrap();
    fs::write(real.join("inner.txt"), b"content").unwrap();
    symlink(&real, dir.path().join("alias")).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
    assert_eq!(summary.skipped(), 0);
}

#[test]
fn test_linked_directory_followed_when_enabled() {
    let dir = tempdir().unwrap();
    let real = dir.path().join("real");
    fs::create_dir(&real).unwrap();
    fs::write(real.join("inner.txt"), b"content").unwrap();
    symlink(&real, dir.path().join("alias")).unwrap();

    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_walker_config(WalkerConfig::default().with_follow_symlinks(true)),
    );
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(summary.total_files, 2);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
}

#[test]
fn test_dangling_symlink_is_skipped_as_unreadable() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"x").unwrap();
    symlink(dir.path().join("a"), dir.path().join("link_to_a")).unwrap();
    symlink(dir.path().join("missing"), dir.path().join("dangling")).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert_eq!(summary.skipped(), 1);
    let error = &summary.scan_errors[0];
    assert!(matches!(
        error,
        ScanError::FileUnreadable(HashError::NotFound(_))
    ));
    assert!(error.path().ends_with("dangling"));
}

#[test]
fn test_hardlinks_are_reported_as_duplicates() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("original.txt");
    fs::write(&original, b"identical content").unwrap();

    if let Err(e) = fs::hard_link(&original, dir.path().join("hardlink.txt")) {
        eprintln!("Skipping hardlink test: failed to create hardlink: {}", e);
        return;
    }

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    // Grouping is by content only; a second name for the same inode is a second path
    assert_eq!(groups.len(), 1);
    assert_eq!(summary.total_files, 2);
}

#[test]
fn test_symlinked_root_is_resolved() {
    let dir = tempdir().unwrap();
    let real = dir.path().join("real");
    fs::create_dir(&real).unwrap();
    fs::write(real.join("a"), b"dup").unwrap();
    fs::write(real.join("b"), b"dup").unwrap();
    let alias = dir.path().join("alias");
    symlink(&real, &alias).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(&alias).unwrap();

    assert_eq!(summary.root, real.canonicalize().unwrap());
    assert_eq!(groups.len(), 1);
    assert!(groups[0]
        .paths()
        .iter()
        .all(|p| p.starts_with(&summary.root)));
}
