use dupscan::duplicates::{DuplicateFinder, FinderConfig};
use dupscan::scanner::{HashAlgorithm, WalkerConfig};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tempfile::tempdir;

/// Membership of every group as sorted path sets, for order-insensitive comparison.
fn membership(groups: &[dupscan::duplicates::DuplicateGroup]) -> BTreeSet<BTreeSet<PathBuf>> {
    groups
        .iter()
        .map(|g| g.paths().into_iter().collect())
        .collect()
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();

    File::create(dir.path().join("a.txt"))
        .unwrap()
        .write_all(b"content a")
        .unwrap();
    File::create(dir.path().join("b.txt"))
        .unwrap()
        .write_all(b"content b")
        .unwrap();
    File::create(dir.path().join("c.txt"))
        .unwrap()
        .write_all(b"content c")
        .unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.unique_digests, 3);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_same_name_in_sibling_directories() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("a")).unwrap();
    fs::create_dir(dir.path().join("b")).unwrap();
    fs::write(dir.path().join("a/x.txt"), b"hello").unwrap();
    fs::write(dir.path().join("b/x.txt"), b"hello").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

    let root = dir.path().canonicalize().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].paths().into_iter().collect::<BTreeSet<_>>(),
        BTreeSet::from([root.join("a/x.txt"), root.join("b/x.txt")])
    );
    // SHA-256("hello")
    assert!(groups[0].hash_hex().starts_with("2cf24dba5fb0"));
    assert_eq!(groups[0].short_hash(), "2cf24dba5fb0");
}

#[test]
fn test_identical_content_different_names_and_depths() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("deep/er/still")).unwrap();
    fs::write(dir.path().join("one.bin"), b"payload").unwrap();
    fs::write(dir.path().join("deep/two.dat"), b"payload").unwrap();
    fs::write(dir.path().join("deep/er/still/three"), b"payload").unwrap();
    fs::write(dir.path().join("deep/er/other"), b"different").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 3);
    assert_eq!(groups[0].size, 7);
    assert_eq!(summary.duplicate_files, 2);
    assert_eq!(summary.reclaimable_space, 14);
}

#[test]
fn test_zero_byte_files_are_duplicates() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("empty1")).unwrap();
    File::create(dir.path().join("empty2")).unwrap();
    fs::write(dir.path().join("full"), b"x").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert_eq!(groups[0].size, 0);
    // SHA-256 of empty input
    assert_eq!(groups[0].short_hash(), "e3b0c44298fc");
}

#[test]
fn test_multiple_groups_partition_files() {
    let dir = tempdir().unwrap();
    for (name, content) in [
        ("a1", "alpha"),
        ("a2", "alpha"),
        ("b1", "beta"),
        ("b2", "beta"),
        ("b3", "beta"),
        ("c", "gamma"),
    ] {
        fs::write(dir.path().join(name), content).unwrap();
    }

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 2);
    let mut sizes: Vec<usize> = groups.iter().map(|g| g.len()).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![2, 3]);

    // No file appears in two groups
    let all: Vec<PathBuf> = groups.iter().flat_map(|g| g.paths()).collect();
    let distinct: BTreeSet<&PathBuf> = all.iter().collect();
    assert_eq!(all.len(), distinct.len());
    assert_eq!(summary.unique_digests, 3);
}

#[test]
fn test_scan_is_idempotent() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("a"), b"same").unwrap();
    fs::write(dir.path().join("sub/b"), b"same").unwrap();
    fs::write(dir.path().join("c"), b"other").unwrap();
    fs::write(dir.path().join("sub/d"), b"other").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (first, _) = finder.find_duplicates(dir.path()).unwrap();
    let (second, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(membership(&first), membership(&second));
    let hashes = |groups: &[dupscan::duplicates::DuplicateGroup]| {
        groups.iter().map(|g| g.hash).collect::<BTreeSet<_>>()
    };
    assert_eq!(hashes(&first), hashes(&second));
}

#[test]
fn test_thread_count_does_not_change_result() {
    let dir = tempdir().unwrap();
    for i in 0..40 {
        let sub = dir.path().join(format!("d{}", i % 4));
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join(format!("f{i}")), format!("content {}", i % 7)).unwrap();
    }

    let walker = WalkerConfig::default().with_sort(true);
    let sequential = DuplicateFinder::new(
        FinderConfig::default()
            .with_io_threads(1)
            .with_walker_config(walker.clone()),
    );
    let parallel = DuplicateFinder::new(
        FinderConfig::default()
            .with_io_threads(8)
            .with_walker_config(walker),
    );

    let (seq_groups, _) = sequential.find_duplicates(dir.path()).unwrap();
    let (par_groups, _) = parallel.find_duplicates(dir.path()).unwrap();

    assert_eq!(seq_groups.len(), 7);
    // Same groups, same order, same first path
    assert_eq!(seq_groups, par_groups);
}

#[test]
fn test_sorted_walk_makes_first_path_stable() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("b.txt"), b"dup").unwrap();
    fs::write(dir.path().join("a.txt"), b"dup").unwrap();
    fs::write(dir.path().join("c.txt"), b"dup").unwrap();

    let finder = DuplicateFinder::new(
        FinderConfig::default().with_walker_config(WalkerConfig::default().with_sort(true)),
    );
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

    let root = dir.path().canonicalize().unwrap();
    assert_eq!(
        groups[0].paths(),
        vec![root.join("a.txt"), root.join("b.txt"), root.join("c.txt")]
    );
}

#[test]
fn test_blake3_groups_like_sha256() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"same bytes").unwrap();
    fs::write(dir.path().join("b"), b"same bytes").unwrap();
    fs::write(dir.path().join("c"), b"other bytes").unwrap();

    let sha = DuplicateFinder::with_defaults();
    let blake = DuplicateFinder::new(FinderConfig::default().with_algorithm(HashAlgorithm::Blake3));

    let (sha_groups, _) = sha.find_duplicates(dir.path()).unwrap();
    let (blake_groups, summary) = blake.find_duplicates(dir.path()).unwrap();

    assert_eq!(membership(&sha_groups), membership(&blake_groups));
    assert_ne!(sha_groups[0].hash, blake_groups[0].hash);
    assert_eq!(summary.algorithm, HashAlgorithm::Blake3);
}

#[test]
fn test_large_file_spanning_many_chunks() {
    let dir = tempdir().unwrap();
    let content: Vec<u8> = (0..300_000u32).map(|i| (i % 251) as u8).collect();
    fs::write(dir.path().join("big1"), &content).unwrap();
    fs::write(dir.path().join("big2"), &content).unwrap();

    let mut changed = content.clone();
    *changed.last_mut().unwrap() ^= 0xff;
    fs::write(dir.path().join("big3"), &changed).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert_eq!(groups[0].size, 300_000);
}

#[test]
fn test_hidden_and_filtered_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".hidden"), b"dup").unwrap();
    fs::write(dir.path().join("visible"), b"dup").unwrap();
    fs::write(dir.path().join("skip.tmp"), b"dup").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();
    assert_eq!(groups[0].len(), 3);

    let finder = DuplicateFinder::new(FinderConfig::default().with_walker_config(
        WalkerConfig::default()
            .with_skip_hidden(true)
            .with_ignore_patterns(vec!["*.tmp".to_string()]),
    ));
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();
    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
}
