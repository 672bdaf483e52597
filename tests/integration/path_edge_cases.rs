use dupscan::duplicates::DuplicateFinder;
use dupscan::scanner::path_utils::{expand_tilde, resolve_root};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

#[test]
fn test_unicode_file_names() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("résumé.txt"), b"same").unwrap();
    fs::write(dir.path().join("日本語.txt"), b"same").unwrap();
    fs::write(dir.path().join("emoji_🦀.txt"), b"same").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 3);
}

#[test]
fn test_names_with_spaces_and_commas() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("with space.txt"), b"same").unwrap();
    fs::write(dir.path().join("with,comma.txt"), b"same").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
}

#[test]
fn test_relative_root_reported_absolute() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("nested/a"), b"same").unwrap();
    fs::write(dir.path().join("nested/b"), b"same").unwrap();

    // Dot segments resolve away
    let dotted = dir.path().join("nested/../nested/.");
    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(&dotted).unwrap();

    assert_eq!(
        summary.root,
        dir.path().join("nested").canonicalize().unwrap()
    );
    assert!(groups[0].paths().iter().all(|p| p.is_absolute()));
}

#[test]
fn test_tilde_expansion() {
    let expanded = expand_tilde(Path::new("~/some/where"));
    if let Some(home) = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
        assert_eq!(expanded, home.join("some/where"));
    }

    // Only a leading tilde component is expanded
    assert_eq!(
        expand_tilde(Path::new("/tmp/~/x")),
        PathBuf::from("/tmp/~/x")
    );
}

#[test]
fn test_resolve_missing_root() {
    let err = resolve_root(Path::new("/nonexistent/dir")).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}
