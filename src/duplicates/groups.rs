//! Size buckets and duplicate groups.
//!
//! # Overview
//!
//! This module provides the two collections the detection pipeline moves
//! between:
//!
//! - [`SizeBuckets`]: every walked file, bucketed by exact byte length.
//!   Files with different sizes cannot be duplicates, so only buckets with
//!   two or more members are ever hashed.
//! - [`DuplicateGroup`]: two or more files sharing a content fingerprint.
//!
//! Both keep insertion order, so listings are stable for a given walk.
//!
//! # Example
//!
//! ```
//! use hashsweep::scanner::FileEntry;
//! use hashsweep::duplicates::group_by_size;
//! use std::path::PathBuf;
//! use std::time::SystemTime;
//!
//! let files = vec![
//!     FileEntry::new(PathBuf::from("/file1.txt"), 1024, SystemTime::now()),
//!     FileEntry::new(PathBuf::from("/file2.txt"), 1024, SystemTime::now()),
//!     FileEntry::new(PathBuf::from("/file3.txt"), 2048, SystemTime::now()),
//! ];
//!
//! let (buckets, stats) = group_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.potential_duplicates, 2);
//! assert_eq!(buckets.candidates().count(), 1);
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::scanner::{FileEntry, Fingerprint};

/// A group of files with the same size.
#[derive(Debug, Clone)]
pub struct SizeGroup {
    /// File size in bytes (shared by all files in this group)
    pub size: u64,
    /// Files with this exact size, in walk order
    pub files: Vec<FileEntry>,
}

impl SizeGroup {
    /// Create a new, empty size group.
    #[must_use]
    pub fn new(size: u64) -> Self {
        Self {
            size,
            files: Vec::new(),
        }
    }

    /// Add a file to this group.
    ///
    /// # Panics
    ///
    /// Debug assertion fails if file size doesn't match group size.
    pub fn add(&mut self, file: FileEntry) {
        debug_assert_eq!(
            file.size, self.size,
            "File size {} doesn't match group size {}",
            file.size, self.size
        );
        self.files.push(file);
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Check if this group has potential duplicates (2+ files).
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.files.len() > 1
    }
}

/// Files bucketed by exact size, in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct SizeBuckets {
    groups: Vec<SizeGroup>,
    index: HashMap<u64, usize>,
}

impl SizeBuckets {
    /// Create an empty set of buckets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `file` to the bucket for its size.
    pub fn insert(&mut self, file: FileEntry) {
        let slot = match self.index.get(&file.size) {
            Some(&slot) => slot,
            None => {
                self.groups.push(SizeGroup::new(file.size));
                self.index.insert(file.size, self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        self.groups[slot].add(file);
    }

    /// Bucket for an exact size, if any file had it.
    #[must_use]
    pub fn get(&self, size: u64) -> Option<&SizeGroup> {
        self.index.get(&size).map(|&slot| &self.groups[slot])
    }

    /// Number of distinct sizes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no file has been bucketed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of bucketed files.
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.groups.iter().map(SizeGroup::len).sum()
    }

    /// All buckets, in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = &SizeGroup> {
        self.groups.iter()
    }

    /// Buckets with two or more members.
    pub fn candidates(&self) -> impl Iterator<Item = &SizeGroup> {
        self.groups.iter().filter(|g| g.has_duplicates())
    }

    /// Consume the buckets, keeping only those with two or more members.
    #[must_use]
    pub fn into_candidates(self) -> Vec<SizeGroup> {
        self.groups
            .into_iter()
            .filter(SizeGroup::has_duplicates)
            .collect()
    }
}

impl FromIterator<FileEntry> for SizeBuckets {
    fn from_iter<I: IntoIterator<Item = FileEntry>>(iter: I) -> Self {
        let mut buckets = Self::new();
        for file in iter {
            buckets.insert(file);
        }
        buckets
    }
}

/// Statistics from size grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files bucketed
    pub total_files: usize,
    /// Number of distinct file sizes
    pub unique_sizes: usize,
    /// Number of files sharing their size with at least one other file
    pub potential_duplicates: usize,
    /// Number of files eliminated as unique (singleton buckets)
    pub eliminated_unique: usize,
    /// Number of buckets with 2+ files
    pub candidate_buckets: usize,
}

impl GroupingStats {
    /// Compute statistics for a set of buckets.
    #[must_use]
    pub fn from_buckets(buckets: &SizeBuckets) -> Self {
        let mut stats = Self {
            total_files: buckets.total_files(),
            unique_sizes: buckets.len(),
            ..Self::default()
        };
        for group in buckets.iter() {
            if group.has_duplicates() {
                stats.potential_duplicates += group.len();
                stats.candidate_buckets += 1;
            } else {
                stats.eliminated_unique += group.len();
            }
        }
        stats
    }

    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Bucket files by size.
///
/// Every file is kept, including those whose size is unique; use
/// [`SizeBuckets::candidates`] to visit only buckets worth hashing.
///
/// # Example
///
/// ```
/// use hashsweep::scanner::FileEntry;
/// use hashsweep::duplicates::group_by_size;
/// use std::path::PathBuf;
/// use std::time::SystemTime;
///
/// let files = vec![
///     FileEntry::new(PathBuf::from("/a.txt"), 100, SystemTime::now()),
///     FileEntry::new(PathBuf::from("/b.txt"), 100, SystemTime::now()),
///     FileEntry::new(PathBuf::from("/c.txt"), 200, SystemTime::now()),
/// ];
///
/// let (buckets, stats) = group_by_size(files);
///
/// assert_eq!(buckets.get(100).unwrap().len(), 2);
/// assert_eq!(stats.eliminated_unique, 1);  // The 200-byte file
/// ```
#[must_use]
pub fn group_by_size(files: impl IntoIterator<Item = FileEntry>) -> (SizeBuckets, GroupingStats) {
    let buckets: SizeBuckets = files.into_iter().collect();
    let stats = GroupingStats::from_buckets(&buckets);

    log::debug!(
        "Size grouping: {} files -> {} potential duplicates ({:.1}% eliminated)",
        stats.total_files,
        stats.potential_duplicates,
        stats.elimination_rate()
    );

    (buckets, stats)
}

/// Confirmed duplicate group of files.
///
/// Always holds at least two files when produced by detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// SHA-256 fingerprint of the shared content
    pub fingerprint: Fingerprint,
    /// File size in bytes (shared by all files)
    pub size: u64,
    /// Member files, in detection order until sorted
    pub files: Vec<FileEntry>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(fingerprint: Fingerprint, size: u64, files: Vec<FileEntry>) -> Self {
        Self {
            fingerprint,
            size,
            files,
        }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    /// Space held by every member except the first.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.files.iter().skip(1).map(|f| f.size).sum()
    }

    /// Get just the paths of files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }

    /// Order members newest-first by modification time.
    ///
    /// The sort is stable: members with equal timestamps keep their
    /// detection order.
    pub fn sort_newest_first(&mut self) {
        self.files.sort_by(|a, b| b.modified.cmp(&a.modified));
    }
}

/// Serializable view of a group, for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct GroupView {
    /// Hex fingerprint
    pub fingerprint: String,
    /// Shared file size
    pub size: u64,
    /// Member paths
    pub files: Vec<PathBuf>,
}

impl From<&DuplicateGroup> for GroupView {
    fn from(group: &DuplicateGroup) -> Self {
        Self {
            fingerprint: group.fingerprint.to_string(),
            size: group.size,
            files: group.paths(),
        }
    }
}
