//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Walking one or more scan roots, recursively or one level deep
//! - Streaming SHA-256 content fingerprints
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: SHA-256 file hashing (streaming)
//!
//! # Example
//!
//! ```no_run
//! use hashsweep::scanner::{ScanMode, Walker, WalkerConfig};
//! use std::path::PathBuf;
//!
//! let config = WalkerConfig {
//!     mode: ScanMode::Flat,
//!     min_size: 1024,
//! };
//!
//! let walker = Walker::new(vec![PathBuf::from(".")], config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

// Re-export main types
pub use hasher::{Fingerprint, Hasher, CHUNK_SIZE};
pub use walker::Walker;

/// Default minimum file size in bytes.
pub const DEFAULT_MIN_SIZE: u64 = 1024;

/// Metadata for a discovered file.
///
/// Captured once during the walk; the modification time is kept so that
/// groups can be ordered newest-first during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path to the file, as discovered under its scan root
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
}

impl FileEntry {
    /// Create a new FileEntry.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, modified: SystemTime) -> Self {
        Self {
            path,
            size,
            modified,
        }
    }
}

/// How far below each scan root the walker descends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Every file in the subtree.
    #[default]
    Recursive,
    /// Direct children of the root only.
    Flat,
}

impl ScanMode {
    /// Build a mode from a `recursive` flag.
    #[must_use]
    pub fn from_recursive(recursive: bool) -> Self {
        if recursive {
            Self::Recursive
        } else {
            Self::Flat
        }
    }

    /// Whether this mode descends into subdirectories.
    #[must_use]
    pub fn is_recursive(self) -> bool {
        matches!(self, Self::Recursive)
    }

    /// Long label used in reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Recursive => "Current directory and all subdirectories",
            Self::Flat => "Current directory only",
        }
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recursive => write!(f, "recursive"),
            Self::Flat => write!(f, "flat"),
        }
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkerConfig {
    /// Recursive or flat traversal.
    pub mode: ScanMode,

    /// Minimum file size to include (in bytes, inclusive).
    pub min_size: u64,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            mode: ScanMode::Recursive,
            min_size: DEFAULT_MIN_SIZE,
        }
    }
}

impl WalkerConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(mode: ScanMode, min_size: u64) -> Self {
        Self { mode, min_size }
    }

    /// Whether a file of `size` bytes passes the minimum-size threshold.
    #[must_use]
    pub fn passes_size_filter(&self, size: u64) -> bool {
        size >= self.min_size
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// Classify an I/O error raised while accessing `path`.
    #[must_use]
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// Path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(p)
            | Self::NotFound(p)
            | Self::NotADirectory(p)
            | Self::Io { path: p, .. } => p,
        }
    }

    /// Whether this error concerns a scan root that does not exist.
    #[must_use]
    pub fn is_missing_root(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::NotADirectory(_))
    }
}

/// Errors that can occur during file hashing.
///
/// Every variant means the file is unreadable; callers treat the file as
/// absent from hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while reading `path`.
    #[must_use]
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}
