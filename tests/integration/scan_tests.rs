use hashsweep::duplicates::{DuplicateFinder, FinderConfig};
use hashsweep::scanner::ScanMode;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    File::create(&path).unwrap().write_all(content).unwrap();
    path
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    let (groups, stats) = DuplicateFinder::with_defaults().find_duplicates(&[dir.path().to_path_buf()]);

    assert!(groups.is_empty());
    assert_eq!(stats.files_processed, 0);
    assert_eq!(stats.total_duplicate_files, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.bin", &[b'a'; 2000]);
    write_file(dir.path(), "b.bin", &[b'b'; 2000]);
    write_file(dir.path(), "c.bin", &[b'c'; 3000]);

    let (groups, stats) = DuplicateFinder::with_defaults().find_duplicates(&[dir.path().to_path_buf()]);

    assert!(groups.is_empty());
    assert_eq!(stats.files_processed, 3);
}

#[test]
fn test_scan_threshold_and_duplicates() {
    let dir = tempdir().unwrap();
    let content = vec![7u8; 2048];
    let a = write_file(dir.path(), "a.bin", &content);
    let b = write_file(dir.path(), "b.bin", &content);
    let c = write_file(dir.path(), "c.bin", &content);
    write_file(dir.path(), "d.bin", &[7u8; 512]);

    let (groups, stats) = DuplicateFinder::with_defaults().find_duplicates(&[dir.path().to_path_buf()]);

    // d.bin is below the 1024-byte threshold and never counted
    assert_eq!(stats.files_processed, 3);
    assert_eq!(stats.total_duplicate_files, 3);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].size, 2048);

    let mut paths = groups[0].paths();
    paths.sort();
    assert_eq!(paths, vec![a, b, c]);
}

#[test]
fn test_scan_same_size_different_content() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "x.bin", &[1u8; 4096]);
    write_file(dir.path(), "y.bin", &[2u8; 4096]);

    let (groups, stats) = DuplicateFinder::with_defaults().find_duplicates(&[dir.path().to_path_buf()]);

    assert!(groups.is_empty());
    assert_eq!(stats.files_processed, 2);
    assert_eq!(stats.total_duplicate_files, 0);
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("one").join("two");
    fs::create_dir_all(&nested).unwrap();

    write_file(dir.path(), "top.bin", &[9u8; 1500]);
    write_file(&nested, "deep.bin", &[9u8; 1500]);

    let roots = vec![dir.path().to_path_buf()];

    let recursive = DuplicateFinder::new(FinderConfig::default().with_mode(ScanMode::Recursive));
    let (groups, stats) = recursive.find_duplicates(&roots);
    assert_eq!(groups.len(), 1);
    assert_eq!(stats.files_processed, 2);

    let flat = DuplicateFinder::new(FinderConfig::default().with_mode(ScanMode::Flat));
    let (groups, stats) = flat.find_duplicates(&roots);
    assert!(groups.is_empty());
    assert_eq!(stats.files_processed, 1);
}

#[test]
fn test_scan_multiple_groups_in_first_seen_order() {
    let dir = tempdir().unwrap();
    // Same size, two contents: one bucket splits into two groups
    write_file(dir.path(), "1.bin", &[1u8; 1024]);
    write_file(dir.path(), "2.bin", &[2u8; 1024]);
    write_file(dir.path(), "3.bin", &[1u8; 1024]);
    write_file(dir.path(), "4.bin", &[2u8; 1024]);

    let finder = DuplicateFinder::new(FinderConfig::default().with_mode(ScanMode::Flat));
    let (groups, stats) = finder.find_duplicates(&[dir.path().to_path_buf()]);

    assert_eq!(groups.len(), 2);
    assert!(groups.iter().all(|g| g.len() == 2));
    assert_eq!(stats.total_duplicate_files, 4);
    assert_ne!(groups[0].fingerprint, groups[1].fingerprint);
}

#[test]
fn test_scan_zero_threshold_groups_empty_files() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("empty1")).unwrap();
    File::create(dir.path().join("empty2")).unwrap();

    let finder = DuplicateFinder::new(FinderConfig::default().with_min_size(0));
    let (groups, _) = finder.find_duplicates(&[dir.path().to_path_buf()]);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].size, 0);
    assert_eq!(
        groups[0].fingerprint.as_str(),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn test_scan_size_filtering_boundary() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "at_a", &[0u8; 1024]);
    write_file(dir.path(), "at_b", &[0u8; 1024]);
    write_file(dir.path(), "below_a", &[0u8; 1023]);
    write_file(dir.path(), "below_b", &[0u8; 1023]);

    let (groups, stats) = DuplicateFinder::with_defaults().find_duplicates(&[dir.path().to_path_buf()]);

    assert_eq!(stats.files_processed, 2);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].size, 1024);
}
