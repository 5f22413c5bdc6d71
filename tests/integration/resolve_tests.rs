use filetime::{set_file_mtime, FileTime};
use hashsweep::actions::{
    GroupChoice, GroupDecider, KeepNewest, Policy, ResolutionEngine, ResolveError,
};
use hashsweep::duplicates::{DuplicateFinder, DuplicateGroup};
use hashsweep::output::Summary;
use hashsweep::scanner::ScanMode;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_with_mtime(dir: &Path, name: &str, content: &[u8], secs: i64) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    set_file_mtime(&path, FileTime::from_unix_time(secs, 0)).unwrap();
    path
}

struct Scripted(Vec<GroupChoice>);

impl GroupDecider for Scripted {
    fn decide(&mut self, _group: &DuplicateGroup, _position: usize, _total: usize) -> GroupChoice {
        if self.0.is_empty() {
            GroupChoice::Abort
        } else {
            self.0.remove(0)
        }
    }

    fn reject(&mut self, _error: &ResolveError) {}
}

#[test]
fn test_auto_keeps_newest_end_to_end() {
    let dir = tempdir().unwrap();
    let content = vec![42u8; 2048];
    let a = write_with_mtime(dir.path(), "a.bin", &content, 1_000);
    let b = write_with_mtime(dir.path(), "b.bin", &content, 3_000);
    let c = write_with_mtime(dir.path(), "c.bin", &content, 2_000);
    let d = write_with_mtime(dir.path(), "d.bin", &content[..512], 500);

    let (groups, mut stats) =
        DuplicateFinder::with_defaults().find_duplicates(&[dir.path().to_path_buf()]);
    let resolution = ResolutionEngine::new(Policy::Auto).resolve(groups, &mut KeepNewest, &mut stats);

    assert!(b.exists());
    assert!(!a.exists());
    assert!(!c.exists());
    assert!(d.exists());

    let summary = Summary::new(ScanMode::Recursive, &stats, resolution.remaining.len());
    assert_eq!(summary.files_processed, 3);
    assert_eq!(summary.total_duplicate_files_found, 3);
    assert_eq!(summary.files_deleted, 2);
    assert_eq!(summary.bytes_freed, 4096);
    assert_eq!(summary.duplicate_groups_remaining, 0);
    assert_eq!(summary.remaining_files(), 1);
}

#[test]
fn test_auto_twice_is_idempotent() {
    let dir = tempdir().unwrap();
    write_with_mtime(dir.path(), "old.bin", &[1u8; 1500], 10);
    let keep = write_with_mtime(dir.path(), "new.bin", &[1u8; 1500], 20);

    let roots = vec![dir.path().to_path_buf()];
    let finder = DuplicateFinder::with_defaults();

    let (groups, mut stats) = finder.find_duplicates(&roots);
    ResolutionEngine::new(Policy::Auto).resolve(groups, &mut KeepNewest, &mut stats);
    assert_eq!(stats.files_deleted, 1);

    let (groups, mut stats) = finder.find_duplicates(&roots);
    assert!(groups.is_empty());
    let resolution = ResolutionEngine::new(Policy::Auto).resolve(groups, &mut KeepNewest, &mut stats);

    assert!(resolution.remaining.is_empty());
    assert_eq!(stats.files_deleted, 0);
    assert!(keep.exists());
}

#[test]
fn test_skip_policy_reports_groups_and_deletes_nothing() {
    let dir = tempdir().unwrap();
    let x = write_with_mtime(dir.path(), "x.bin", &[2u8; 1200], 1);
    let y = write_with_mtime(dir.path(), "y.bin", &[2u8; 1200], 2);

    let (groups, mut stats) =
        DuplicateFinder::with_defaults().find_duplicates(&[dir.path().to_path_buf()]);
    let resolution = ResolutionEngine::new(Policy::Skip).resolve(groups, &mut KeepNewest, &mut stats);

    let summary = Summary::new(ScanMode::Recursive, &stats, resolution.remaining.len());
    assert_eq!(summary.duplicate_groups_remaining, 1);
    assert_eq!(summary.files_deleted, 0);
    assert_eq!(summary.bytes_freed, 0);
    assert!(x.exists() && y.exists());
}

#[test]
fn test_interactive_skip_leaves_group_remaining() {
    let dir = tempdir().unwrap();
    write_with_mtime(dir.path(), "x.bin", &[3u8; 1200], 1);
    write_with_mtime(dir.path(), "y.bin", &[3u8; 1200], 2);

    let (groups, mut stats) =
        DuplicateFinder::with_defaults().find_duplicates(&[dir.path().to_path_buf()]);
    let resolution = ResolutionEngine::new(Policy::Interactive).resolve(
        groups,
        &mut Scripted(vec![GroupChoice::Skip]),
        &mut stats,
    );

    assert_eq!(resolution.remaining.len(), 1);
    assert_eq!(resolution.skipped, 1);
    assert_eq!(stats.files_deleted, 0);
}

#[test]
fn test_interactive_keep_specific_file() {
    let dir = tempdir().unwrap();
    let newer = write_with_mtime(dir.path(), "newer.bin", &[4u8; 1100], 200);
    let older = write_with_mtime(dir.path(), "older.bin", &[4u8; 1100], 100);

    let (groups, mut stats) =
        DuplicateFinder::with_defaults().find_duplicates(&[dir.path().to_path_buf()]);
    // Listing is newest-first, so file 2 (index 1) is the older copy
    let resolution = ResolutionEngine::new(Policy::Interactive).resolve(
        groups,
        &mut Scripted(vec![GroupChoice::Keep(1)]),
        &mut stats,
    );

    assert!(older.exists());
    assert!(!newer.exists());
    assert!(resolution.remaining.is_empty());
    assert_eq!(stats.bytes_freed, 1100);
}

#[test]
fn test_equal_mtimes_keep_first_encountered() {
    let dir = tempdir().unwrap();
    let first = write_with_mtime(dir.path(), "first.bin", &[5u8; 1300], 777);
    let second = write_with_mtime(dir.path(), "second.bin", &[5u8; 1300], 777);

    let (groups, mut stats) =
        DuplicateFinder::with_defaults().find_duplicates(&[dir.path().to_path_buf()]);
    let survivor = groups[0].files[0].path.clone();
    ResolutionEngine::new(Policy::Auto).resolve(groups, &mut KeepNewest, &mut stats);

    assert!(survivor.exists());
    assert_eq!(stats.files_deleted, 1);
    assert!(first.exists() != second.exists());
}

#[test]
fn test_auto_with_nested_roots_keeps_unique_file() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    let only = write_with_mtime(&sub, "only.bin", &[6u8; 2048], 50);

    let (groups, mut stats) =
        DuplicateFinder::with_defaults().find_duplicates(&[dir.path().to_path_buf(), sub]);
    assert!(groups.is_empty());

    let resolution = ResolutionEngine::new(Policy::Auto).resolve(groups, &mut KeepNewest, &mut stats);

    assert!(only.exists());
    assert!(resolution.remaining.is_empty());
    assert_eq!(stats.files_processed, 1);
    assert_eq!(stats.files_deleted, 0);
}
