//! Directory walker over one or more scan roots.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing scan roots
//! and collecting file metadata for duplicate detection. Recursive walks use
//! [`walkdir`]; flat walks read only the direct children of each root.
//!
//! # Behavior
//!
//! - Only regular files are yielded. Directories, symbolic links and special
//!   files are skipped in both modes.
//! - Files smaller than the configured minimum size are skipped.
//! - Files whose metadata cannot be read (vanished, inaccessible) are
//!   skipped silently.
//! - A root that does not exist yields a single [`ScanError::NotFound`] and
//!   the walk moves on to the next root.
//! - Overlapping roots are walked once (see [`normalize_roots`]), so no
//!   file is ever yielded twice.
//! - Graceful shutdown via atomic flag.
//!
//! Traversal order inside a directory is whatever the platform returns and
//! must not be relied upon.
//!
//! # Example
//!
//! ```no_run
//! use hashsweep::scanner::{Walker, WalkerConfig};
//! use std::path::PathBuf;
//!
//! let walker = Walker::new(vec![PathBuf::from("/home/user/Downloads")], WalkerConfig::default());
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::fs;
use std::iter;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use walkdir::WalkDir;

use super::{FileEntry, ScanError, ScanMode, WalkerConfig};

/// Drop scan roots whose files another root already yields.
///
/// Roots are compared by canonical path. A repeated root is dropped after
/// its first occurrence. In recursive mode a root lying inside another root
/// is dropped too, whichever order they were given in; a flat walk does not
/// cover subdirectories, so nested roots are kept there. Roots that cannot
/// be resolved are kept as given so the walk still reports them.
///
/// ```
/// use hashsweep::scanner::walker::normalize_roots;
/// use hashsweep::scanner::ScanMode;
///
/// let dir = std::env::temp_dir();
/// let roots = normalize_roots(vec![dir.clone(), dir.clone()], ScanMode::Recursive);
/// assert_eq!(roots, vec![dir]);
/// ```
#[must_use]
pub fn normalize_roots(roots: Vec<PathBuf>, mode: ScanMode) -> Vec<PathBuf> {
    let resolved: Vec<Option<PathBuf>> = roots
        .iter()
        .map(|root| fs::canonicalize(root).ok())
        .collect();

    let mut kept = Vec::with_capacity(roots.len());
    for (i, root) in roots.iter().enumerate() {
        let repeated = (0..i).any(|j| match (&resolved[j], &resolved[i]) {
            (Some(earlier), Some(current)) => earlier == current,
            (None, None) => roots[j] == *root,
            _ => false,
        });
        if repeated {
            log::info!("Skipping repeated root: {}", root.display());
            continue;
        }

        let nested = mode.is_recursive()
            && resolved[i].as_ref().is_some_and(|current| {
                resolved
                    .iter()
                    .flatten()
                    .any(|other| other != current && current.starts_with(other))
            });
        if nested {
            log::info!(
                "Skipping {}: already inside another scan root",
                root.display()
            );
            continue;
        }

        kept.push(root.clone());
    }
    kept
}

type EntryIter<'a> = Box<dyn Iterator<Item = Result<FileEntry, ScanError>> + 'a>;

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Roots to walk, in order
    roots: Vec<PathBuf>,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker over `roots`.
    ///
    /// Overlapping roots are dropped up front with [`normalize_roots`].
    #[must_use]
    pub fn new(roots: Vec<PathBuf>, config: WalkerConfig) -> Self {
        Self {
            roots: normalize_roots(roots, config.mode),
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Roots this walker visits.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Walk every root, yielding file entries.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration. Iteration ends early once shutdown is requested.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        self.roots
            .iter()
            .flat_map(move |root| self.walk_root(root))
            .take_while(move |_| !self.is_shutdown_requested())
    }

    /// Walk a single root according to the configured mode.
    fn walk_root<'a>(&'a self, root: &'a Path) -> EntryIter<'a> {
        match fs::metadata(root) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Box::new(iter::once(Err(ScanError::NotADirectory(root.to_path_buf())))),
            Err(e) => return Box::new(iter::once(Err(ScanError::from_io(root, e)))),
        }

        log::info!("Scanning: {} ({})", root.display(), self.config.mode);

        if self.config.mode.is_recursive() {
            self.walk_recursive(root)
        } else {
            self.walk_flat(root)
        }
    }

    fn walk_recursive<'a>(&'a self, root: &'a Path) -> EntryIter<'a> {
        let walk_dir = WalkDir::new(root).min_depth(1).follow_links(false);

        Box::new(walk_dir.into_iter().filter_map(move |entry| match entry {
            Ok(entry) => {
                if entry.file_type().is_dir() {
                    return None;
                }
                self.file_entry(entry.path())
            }
            Err(e) => {
                let path = e
                    .path()
                    .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                Some(Err(match e.into_io_error() {
                    Some(io) => ScanError::from_io(&path, io),
                    None => ScanError::Io {
                        path,
                        source: std::io::Error::other("directory loop"),
                    },
                }))
            }
        }))
    }

    fn walk_flat<'a>(&'a self, root: &'a Path) -> EntryIter<'a> {
        let read_dir = match fs::read_dir(root) {
            Ok(rd) => rd,
            Err(e) => return Box::new(iter::once(Err(ScanError::from_io(root, e)))),
        };

        Box::new(read_dir.filter_map(move |entry| match entry {
            Ok(entry) => self.file_entry(&entry.path()),
            Err(e) => Some(Err(ScanError::from_io(root, e))),
        }))
    }

    /// Build a [`FileEntry`] for `path` if it is a regular file that
    /// passes the size filter.
    fn file_entry(&self, path: &Path) -> Option<Result<FileEntry, ScanError>> {
        let metadata = match fs::symlink_metadata(path) {
            Ok(m) => m,
            Err(e) => {
                log::debug!("Skipping unreadable entry {}: {}", path.display(), e);
                return None;
            }
        };

        if !metadata.is_file() {
            log::trace!("Skipping non-regular file: {}", path.display());
            return None;
        }

        let size = metadata.len();
        if !self.config.passes_size_filter(size) {
            log::trace!(
                "Skipping file due to size filter ({}): {}",
                size,
                path.display()
            );
            return None;
        }

        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        Some(Ok(FileEntry::new(path.to_path_buf(), size, modified)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::ScanMode;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, len: usize) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, vec![b'x'; len]).unwrap();
        path
    }

    fn names(files: &[FileEntry]) -> BTreeSet<String> {
        files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    fn collect(walker: &Walker) -> Vec<FileEntry> {
        walker.walk().filter_map(Result::ok).collect()
    }

    #[test]
    fn test_flat_walk_skips_subdirectories() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "top.bin", 10);
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        write_file(&sub, "nested.bin", 10);

        let walker = Walker::new(
            vec![dir.path().to_path_buf()],
            WalkerConfig::new(ScanMode::Flat, 0),
        );
        let files = collect(&walker);

        assert_eq!(names(&files), BTreeSet::from(["top.bin".to_string()]));
    }

    #[test]
    fn test_recursive_walk_visits_subtree() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "top.bin", 10);
        let deep = dir.path().join("a").join("b");
        fs::create_dir_all(&deep).unwrap();
        write_file(&deep, "deep.bin", 10);

        let walker = Walker::new(
            vec![dir.path().to_path_buf()],
            WalkerConfig::new(ScanMode::Recursive, 0),
        );
        let files = collect(&walker);

        assert_eq!(
            names(&files),
            BTreeSet::from(["top.bin".to_string(), "deep.bin".to_string()])
        );
    }

    #[test]
    fn test_min_size_boundary() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "exact.bin", 1024);
        write_file(dir.path(), "short.bin", 1023);

        let walker = Walker::new(
            vec![dir.path().to_path_buf()],
            WalkerConfig::new(ScanMode::Flat, 1024),
        );
        let files = collect(&walker);

        assert_eq!(names(&files), BTreeSet::from(["exact.bin".to_string()]));
        assert_eq!(files[0].size, 1024);
    }

    #[test]
    fn test_empty_files_follow_threshold() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "empty.bin", 0);

        let zero = Walker::new(
            vec![dir.path().to_path_buf()],
            WalkerConfig::new(ScanMode::Flat, 0),
        );
        assert_eq!(collect(&zero).len(), 1);

        let one = Walker::new(
            vec![dir.path().to_path_buf()],
            WalkerConfig::new(ScanMode::Flat, 1),
        );
        assert!(collect(&one).is_empty());
    }

    #[test]
    fn test_missing_root_is_reported_and_skipped() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "kept.bin", 10);
        let missing = dir.path().join("does-not-exist");

        let walker = Walker::new(
            vec![missing.clone(), dir.path().to_path_buf()],
            WalkerConfig::new(ScanMode::Flat, 0),
        );
        let results: Vec<_> = walker.walk().collect();

        assert_eq!(results.len(), 2);
        assert!(matches!(&results[0], Err(ScanError::NotFound(p)) if *p == missing));
        assert!(results[1].is_ok());
    }

    #[test]
    fn test_repeated_root_is_walked_once() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "only.bin", 10);

        for mode in [ScanMode::Flat, ScanMode::Recursive] {
            let walker = Walker::new(
                vec![dir.path().to_path_buf(), dir.path().join(".")],
                WalkerConfig::new(mode, 0),
            );
            assert_eq!(walker.roots(), &[dir.path().to_path_buf()]);
            assert_eq!(collect(&walker).len(), 1);
        }
    }

    #[test]
    fn test_nested_root_dropped_when_recursive() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        write_file(&sub, "inner.bin", 10);

        // Order does not matter: the enclosing root wins
        let walker = Walker::new(
            vec![sub.clone(), dir.path().to_path_buf()],
            WalkerConfig::new(ScanMode::Recursive, 0),
        );
        assert_eq!(walker.roots(), &[dir.path().to_path_buf()]);
        assert_eq!(collect(&walker).len(), 1);
    }

    #[test]
    fn test_nested_root_kept_when_flat() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        write_file(dir.path(), "top.bin", 10);
        write_file(&sub, "inner.bin", 10);

        let walker = Walker::new(
            vec![dir.path().to_path_buf(), sub],
            WalkerConfig::new(ScanMode::Flat, 0),
        );
        assert_eq!(walker.roots().len(), 2);
        assert_eq!(
            names(&collect(&walker)),
            BTreeSet::from(["top.bin".to_string(), "inner.bin".to_string()])
        );
    }

    #[test]
    fn test_missing_roots_survive_normalization() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone");

        let roots = normalize_roots(
            vec![missing.clone(), dir.path().to_path_buf(), missing.clone()],
            ScanMode::Recursive,
        );
        assert_eq!(roots, vec![missing, dir.path().to_path_buf()]);
    }

    #[test]
    fn test_file_root_is_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file = write_file(dir.path(), "plain.bin", 10);

        let walker = Walker::new(vec![file], WalkerConfig::new(ScanMode::Flat, 0));
        let results: Vec<_> = walker.walk().collect();

        assert!(matches!(results.as_slice(), [Err(ScanError::NotADirectory(_))]));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_regular_files() {
        let dir = TempDir::new().unwrap();
        let target = write_file(dir.path(), "target.bin", 10);
        std::os::unix::fs::symlink(&target, dir.path().join("link.bin")).unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("dirlink")).unwrap();

        for mode in [ScanMode::Flat, ScanMode::Recursive] {
            let walker = Walker::new(
                vec![dir.path().to_path_buf()],
                WalkerConfig::new(mode, 0),
            );
            assert_eq!(
                names(&collect(&walker)),
                BTreeSet::from(["target.bin".to_string()])
            );
        }
    }

    #[test]
    fn test_shutdown_stops_walk() {
        let dir = TempDir::new().unwrap();
        for i in 0..5 {
            write_file(dir.path(), &format!("f{i}.bin"), 10);
        }

        let flag = Arc::new(AtomicBool::new(true));
        let walker = Walker::new(
            vec![dir.path().to_path_buf()],
            WalkerConfig::new(ScanMode::Flat, 0),
        )
        .with_shutdown_flag(flag);

        assert_eq!(walker.walk().count(), 0);
    }

    #[test]
    fn test_modified_time_is_captured() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "dated.bin", 10);
        let expected = fs::metadata(&path).unwrap().modified().unwrap();

        let walker = Walker::new(
            vec![dir.path().to_path_buf()],
            WalkerConfig::new(ScanMode::Flat, 0),
        );
        let files = collect(&walker);

        assert_eq!(files[0].modified, expected);
    }
}
