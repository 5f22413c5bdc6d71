use hashsweep::duplicates::DuplicateFinder;
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

#[test]
fn test_scan_two_non_overlapping_directories() {
    let dir1 = tempdir().unwrap();
    let dir2 = tempdir().unwrap();

    File::create(dir1.path().join("a.bin"))
        .unwrap()
        .write_all(&[3u8; 1100])
        .unwrap();
    File::create(dir2.path().join("b.bin"))
        .unwrap()
        .write_all(&[3u8; 1100])
        .unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, stats) =
        finder.find_duplicates(&[dir1.path().to_path_buf(), dir2.path().to_path_buf()]);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files.len(), 2);
    assert_eq!(groups[0].files[0].path, dir1.path().join("a.bin"));
    assert_eq!(stats.files_processed, 2);
}

#[test]
fn test_scan_overlapping_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();

    File::create(dir.path().join("a.txt"))
        .unwrap()
        .write_all(&[7u8; 1500])
        .unwrap();
    File::create(sub.join("b.txt"))
        .unwrap()
        .write_all(&[7u8; 1500])
        .unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, stats) = finder.find_duplicates(&[dir.path().to_path_buf(), sub.clone()]);

    // sub is inside dir and is not walked a second time
    assert_eq!(stats.files_processed, 2);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files.len(), 2);
}

#[test]
fn test_same_directory_twice_finds_nothing() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("only.bin"))
        .unwrap()
        .write_all(&[1u8; 2048])
        .unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, stats) =
        finder.find_duplicates(&[dir.path().to_path_buf(), dir.path().to_path_buf()]);

    assert!(groups.is_empty());
    assert_eq!(stats.files_processed, 1);
}

#[test]
fn test_missing_root_is_skipped() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    File::create(dir.path().join("x.bin"))
        .unwrap()
        .write_all(&[4u8; 2048])
        .unwrap();
    File::create(dir.path().join("y.bin"))
        .unwrap()
        .write_all(&[4u8; 2048])
        .unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, stats) = finder.find_duplicates(&[missing, dir.path().to_path_buf()]);

    assert_eq!(stats.files_processed, 2);
    assert_eq!(groups.len(), 1);
}

#[test]
fn test_only_missing_roots() {
    let dir = tempdir().unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, stats) = finder.find_duplicates(&[dir.path().join("nope"), dir.path().join("nada")]);

    assert!(groups.is_empty());
    assert_eq!(stats.files_processed, 0);
}

#[test]
fn test_cross_directory_triple() {
    let dirs = [tempdir().unwrap(), tempdir().unwrap(), tempdir().unwrap()];
    for (i, dir) in dirs.iter().enumerate() {
        let mut f = File::create(dir.path().join(format!("{i}.bin"))).unwrap();
        f.write_all(&[5u8; 4000]).unwrap();
        f.sync_all().unwrap();
    }

    let roots: Vec<_> = dirs.iter().map(|d| d.path().to_path_buf()).collect();
    let (groups, stats) = DuplicateFinder::with_defaults().find_duplicates(&roots);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 3);
    assert_eq!(stats.total_duplicate_files, 3);
    // Members keep root order
    for (i, file) in groups[0].files.iter().enumerate() {
        assert!(file.path.starts_with(dirs[i].path()));
    }
}
