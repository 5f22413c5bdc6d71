//! In-place file deletion.
//!
//! # Overview
//!
//! This module removes duplicate copies from disk:
//! - Single-file permanent deletion with size capture
//! - Batch deletion that continues past per-file failures
//! - Progress callbacks for per-file reporting
//!
//! A deletion only counts as successful when the removal call itself
//! succeeded; the reported size is read immediately before removal.
//!
//! # Example
//!
//! ```no_run
//! use hashsweep::actions::delete::permanent_delete;
//! use std::path::PathBuf;
//!
//! let path = PathBuf::from("/path/to/duplicate.txt");
//! match permanent_delete(&path) {
//!     Ok(result) => println!("Deleted: {} ({} bytes)", result.path.display(), result.size),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    fn from_io(path: &Path, e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: e,
            },
        }
    }

    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::Io { path: p, .. } => p,
        }
    }
}

/// Result of a successful deletion operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    /// Path that was deleted.
    pub path: PathBuf,
    /// Size of the deleted file in bytes.
    pub size: u64,
}

impl DeleteResult {
    /// Create a new delete result.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Results of a batch deletion operation.
#[derive(Debug, Clone, Default)]
pub struct BatchDeleteResult {
    /// Successfully deleted files.
    pub successes: Vec<DeleteResult>,
    /// Failed deletions with their errors.
    pub failures: Vec<(PathBuf, String)>,
    /// Total bytes freed.
    pub bytes_freed: u64,
}

impl BatchDeleteResult {
    /// Number of successful deletions.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    /// Number of failed deletions.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Check if all deletions succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.all_succeeded() {
            format!(
                "Deleted {} file(s), freed {} bytes",
                self.success_count(),
                self.bytes_freed
            )
        } else {
            format!(
                "Deleted {} file(s), {} failed, freed {} bytes",
                self.success_count(),
                self.failure_count(),
                self.bytes_freed
            )
        }
    }
}

/// Callback trait for deletion progress reporting.
pub trait DeleteProgressCallback {
    /// Called once per group with the file that will be kept.
    fn on_keep(&self, _path: &Path) {}

    /// Called after successful deletion.
    fn on_delete_success(&self, path: &Path, size: u64);

    /// Called after failed deletion.
    fn on_delete_failure(&self, path: &Path, error: &DeleteError);
}

/// Callback that reports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCallback;

impl DeleteProgressCallback for SilentCallback {
    fn on_delete_success(&self, _path: &Path, _size: u64) {}

    fn on_delete_failure(&self, _path: &Path, _error: &DeleteError) {}
}

/// Permanently delete a single file.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if deletion is not allowed
/// - `Io` for any other failure
pub fn permanent_delete(path: &Path) -> Result<DeleteResult, DeleteError> {
    // Size is captured before removal so it can be credited afterwards
    let metadata = fs::metadata(path).map_err(|e| DeleteError::from_io(path, e))?;
    let size = metadata.len();

    fs::remove_file(path).map_err(|e| DeleteError::from_io(path, e))?;

    log::debug!("Deleted: {} ({} bytes)", path.display(), size);

    Ok(DeleteResult::new(path.to_path_buf(), size))
}

/// Delete every path in `paths`, continuing past failures.
///
/// Deletion is strictly sequential. Failures are logged as warnings and
/// collected; they never stop the batch.
pub fn delete_batch<C: DeleteProgressCallback + ?Sized>(
    paths: &[PathBuf],
    callback: &C,
) -> BatchDeleteResult {
    let mut result = BatchDeleteResult::default();

    for path in paths {
        match permanent_delete(path) {
            Ok(deleted) => {
                callback.on_delete_success(&deleted.path, deleted.size);
                result.bytes_freed += deleted.size;
                result.successes.push(deleted);
            }
            Err(e) => {
                log::warn!("Error deleting {}: {}", path.display(), e);
                callback.on_delete_failure(path, &e);
                result.failures.push((path.clone(), e.to_string()));
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_temp_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).expect("Failed to create file");
        file.write_all(content).expect("Failed to write file");
        path
    }

    #[derive(Default)]
    struct Recorder {
        deleted: RefCell<Vec<(PathBuf, u64)>>,
        failed: RefCell<Vec<PathBuf>>,
    }

    impl DeleteProgressCallback for Recorder {
        fn on_delete_success(&self, path: &Path, size: u64) {
            self.deleted.borrow_mut().push((path.to_path_buf(), size));
        }

        fn on_delete_failure(&self, path: &Path, _error: &DeleteError) {
            self.failed.borrow_mut().push(path.to_path_buf());
        }
    }

    #[test]
    fn test_delete_error_path() {
        let path = PathBuf::from("/test/file.txt");

        assert_eq!(DeleteError::NotFound(path.clone()).path(), path);
        assert_eq!(DeleteError::PermissionDenied(path.clone()).path(), path);
        let io = DeleteError::Io {
            path: path.clone(),
            source: io::Error::other("test"),
        };
        assert_eq!(io.path(), path);
    }

    #[test]
    fn test_delete_error_display() {
        let err = DeleteError::NotFound(PathBuf::from("/test.txt"));
        assert!(err.to_string().contains("file not found"));

        let err = DeleteError::PermissionDenied(PathBuf::from("/test.txt"));
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn test_batch_delete_result_summary() {
        let mut result = BatchDeleteResult::default();
        assert!(result.all_succeeded());

        result
            .successes
            .push(DeleteResult::new(PathBuf::from("/a.txt"), 1000));
        result.bytes_freed = 1000;
        assert!(result.summary().contains("1 file(s)"));

        result
            .failures
            .push((PathBuf::from("/b.txt"), "permission denied".to_string()));
        assert_eq!(result.failure_count(), 1);
        assert!(result.summary().contains("1 failed"));
    }

    #[test]
    fn test_permanent_delete_removes_file() {
        let dir = TempDir::new().unwrap();
        let path = create_temp_file(&dir, "gone.txt", b"hello");

        let result = permanent_delete(&path).unwrap();

        assert_eq!(result.size, 5);
        assert!(!path.exists());
    }

    #[test]
    fn test_permanent_delete_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("never-existed.txt");

        assert!(matches!(
            permanent_delete(&path),
            Err(DeleteError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_batch_continues_on_error() {
        let dir = TempDir::new().unwrap();
        let a = create_temp_file(&dir, "a.txt", b"aaa");
        let missing = dir.path().join("missing.txt");
        let b = create_temp_file(&dir, "b.txt", b"bbbb");

        let recorder = Recorder::default();
        let result = delete_batch(&[a.clone(), missing.clone(), b.clone()], &recorder);

        assert_eq!(result.success_count(), 2);
        assert_eq!(result.failure_count(), 1);
        assert_eq!(result.bytes_freed, 7);
        assert_eq!(result.failures[0].0, missing);
        assert_eq!(*recorder.failed.borrow(), vec![missing]);
        assert_eq!(recorder.deleted.borrow().len(), 2);
        assert!(!a.exists());
        assert!(!b.exists());
    }

    #[test]
    fn test_delete_batch_empty() {
        let result = delete_batch(&[], &SilentCallback);
        assert_eq!(result.success_count(), 0);
        assert_eq!(result.bytes_freed, 0);
    }
}
