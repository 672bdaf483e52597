use dupscan::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use dupscan::scanner::{FileEntry, HashError, ScanError};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_find_duplicates_from_files_continues_on_error() {
    let finder = DuplicateFinder::with_defaults();
    // Use files that don't exist to trigger hashing errors
    let file1 = FileEntry::new(PathBuf::from("nonexistent_1.txt"), 100);
    let file2 = FileEntry::new(PathBuf::from("nonexistent_2.txt"), 100);

    let (groups, summary) = finder.find_duplicates_from_files(vec![file1, file2]);

    assert!(groups.is_empty());
    assert_eq!(summary.hashed_files, 0);
    assert_eq!(summary.scan_errors.len(), 2);

    for err in &summary.scan_errors {
        match err {
            ScanError::FileUnreadable(HashError::NotFound(_)) => {}
            _ => panic!("Expected NotFound HashError, got: {:?}", err),
        }
    }
}

#[test]
fn test_skipped_files_keep_traversal_order() {
    let dir = tempdir().unwrap();
    let real_a = dir.path().join("a");
    let real_b = dir.path().join("b");
    fs::write(&real_a, b"dup").unwrap();
    fs::write(&real_b, b"dup").unwrap();

    let files = vec![
        FileEntry::new(dir.path().join("gone1"), 3),
        FileEntry::new(real_a.clone(), 3),
        FileEntry::new(dir.path().join("gone2"), 3),
        FileEntry::new(real_b.clone(), 3),
        FileEntry::new(dir.path().join("gone3"), 3),
    ];

    let finder = DuplicateFinder::new(FinderConfig::default().with_io_threads(4));
    let (groups, summary) = finder.find_duplicates_from_files(files);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths(), vec![real_a, real_b]);

    let skipped: Vec<PathBuf> = summary
        .scan_errors
        .iter()
        .map(|e| e.path().to_path_buf())
        .collect();
    assert_eq!(
        skipped,
        vec![
            dir.path().join("gone1"),
            dir.path().join("gone2"),
            dir.path().join("gone3"),
        ]
    );
}

#[test]
fn test_nonexistent_root_fails_before_walking() {
    let finder = DuplicateFinder::with_defaults();
    let result = finder.find_duplicates(std::path::Path::new("/nonexistent/dir/for/dupscan"));

    match result {
        Err(FinderError::PathNotFound(path)) => {
            assert_eq!(path, PathBuf::from("/nonexistent/dir/for/dupscan"));
        }
        other => panic!("Expected PathNotFound, got: {:?}", other.map(|(g, _)| g)),
    }
}

#[test]
fn test_file_root_is_not_a_directory() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("plain.txt");
    fs::write(&file, b"data").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let result = finder.find_duplicates(&file);

    assert!(matches!(result, Err(FinderError::NotADirectory(_))));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"shared").unwrap();
    fs::write(dir.path().join("b.txt"), b"shared").unwrap();
    let locked = dir.path().join("locked.txt");
    fs::write(&locked, b"shared").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can still read it; nothing to test then
    if fs::File::open(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
        return;
    }

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert!(groups[0]
        .paths()
        .iter()
        .all(|p| p.file_name().unwrap() != "locked.txt"));

    assert_eq!(summary.skipped(), 1);
    let error = &summary.scan_errors[0];
    assert!(matches!(
        error,
        ScanError::FileUnreadable(HashError::PermissionDenied(_))
    ));
    assert!(error.to_string().contains("locked.txt"));
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_does_not_abort_scan() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"shared").unwrap();
    fs::write(dir.path().join("b.txt"), b"shared").unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("inner.txt"), b"shared").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let finder = DuplicateFinder::with_defaults();
    let result = finder.find_duplicates(dir.path());

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let (groups, summary) = result.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert_eq!(summary.skipped(), 1);
    assert!(matches!(summary.scan_errors[0], ScanError::Walk { .. }));
    assert!(summary.scan_errors[0].path().ends_with("locked"));
}
