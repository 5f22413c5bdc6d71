//! Duplicate finder implementation with two-phase detection.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline:
//! 1. **Walk**: visit every scan root and bucket regular files by exact size
//!    (see [`crate::duplicates::groups`])
//! 2. **Detect**: hash the members of every bucket holding two or more
//!    files and keep fingerprint groups with two or more members
//!
//! Hashing is the expensive step, so it only runs on files that already
//! share a size with another file.
//!
//! # Example
//!
//! ```no_run
//! use hashsweep::config::ScanConfig;
//! use hashsweep::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::PathBuf;
//!
//! let scan = ScanConfig::new(vec![PathBuf::from(".")], true, 1024);
//! let finder = DuplicateFinder::new(FinderConfig::from_scan(&scan));
//! let (groups, stats) = finder.find_duplicates(&scan.roots);
//!
//! println!("{} groups among {} files", groups.len(), stats.files_processed);
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::ScanConfig;
use crate::progress::{ProgressCallback, PHASE_HASHING, PHASE_WALKING};
use crate::scanner::{FileEntry, Fingerprint, Hasher, ScanMode, Walker, WalkerConfig};
use crate::stats::RunStats;

use super::groups::{DuplicateGroup, GroupingStats, SizeBuckets, SizeGroup};

/// Configuration for the duplicate finder.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Walk mode and size threshold.
    pub walker: WalkerConfig,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker", &self.walker)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl FinderConfig {
    /// Build a finder configuration from the library scan parameters.
    #[must_use]
    pub fn from_scan(scan: &ScanConfig) -> Self {
        Self {
            walker: WalkerConfig::new(ScanMode::from_recursive(scan.recursive), scan.min_size),
            ..Self::default()
        }
    }

    /// Set the walk mode.
    #[must_use]
    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.walker.mode = mode;
        self
    }

    /// Set the minimum file size (inclusive).
    #[must_use]
    pub fn with_min_size(mut self, min_size: u64) -> Self {
        self.walker.min_size = min_size;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Main duplicate finder.
#[derive(Debug, Default)]
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
        }
    }

    /// Create a finder with default configuration (recursive, 1024 bytes).
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Walk `roots` and bucket every accepted file by size.
    ///
    /// Each accepted file increments `stats.files_processed`. Missing roots
    /// and unreadable directories are logged as warnings and skipped.
    pub fn walk(&self, roots: &[PathBuf], stats: &mut RunStats) -> SizeBuckets {
        let mut walker = Walker::new(roots.to_vec(), self.config.walker);
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(Arc::clone(flag));
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start(PHASE_WALKING, 0);
        }

        let mut buckets = SizeBuckets::new();
        for result in walker.walk() {
            match result {
                Ok(file) => {
                    stats.record_processed();
                    if let Some(ref callback) = self.config.progress_callback {
                        callback.on_progress(
                            stats.files_processed as usize,
                            file.path.to_string_lossy().as_ref(),
                        );
                    }
                    buckets.insert(file);
                }
                Err(e) if e.is_missing_root() => {
                    log::warn!("Directory {} does not exist, skipping", e.path().display());
                }
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {}", e);
                }
            }
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end(PHASE_WALKING);
        }

        let grouping = GroupingStats::from_buckets(&buckets);
        log::info!(
            "Found {} files with matching sizes",
            grouping.potential_duplicates
        );

        buckets
    }

    /// Hash same-size candidates and return confirmed duplicate groups.
    ///
    /// Files that cannot be read are dropped. Groups are ordered by the
    /// first appearance of their fingerprint; members keep walk order.
    /// `stats.total_duplicate_files` grows by the size of every group.
    pub fn detect(&self, buckets: SizeBuckets, stats: &mut RunStats) -> Vec<DuplicateGroup> {
        let candidates = buckets.into_candidates();
        let total: usize = candidates.iter().map(SizeGroup::len).sum();

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start(PHASE_HASHING, total);
        }

        let mut groups = Vec::new();
        let mut hashed = 0usize;

        for bucket in candidates {
            if self.config.is_shutdown_requested() {
                log::debug!("Detection: shutdown requested, skipping remaining buckets");
                break;
            }

            for group in self.hash_bucket(bucket, &mut hashed) {
                stats.record_duplicate_group(group.len());
                groups.push(group);
            }
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end(PHASE_HASHING);
        }

        log::info!(
            "Detection complete: {} duplicate groups, {} files",
            groups.len(),
            stats.total_duplicate_files
        );

        groups
    }

    /// Hash one size bucket and split it by fingerprint.
    fn hash_bucket(&self, bucket: SizeGroup, hashed: &mut usize) -> Vec<DuplicateGroup> {
        let size = bucket.size;
        let mut order: Vec<Fingerprint> = Vec::new();
        let mut by_fingerprint: HashMap<Fingerprint, Vec<FileEntry>> = HashMap::new();

        for file in bucket.files {
            if self.config.is_shutdown_requested() {
                break;
            }

            *hashed += 1;
            if let Some(ref callback) = self.config.progress_callback {
                callback.on_progress(*hashed, file.path.to_string_lossy().as_ref());
            }

            match self.hasher.hash_file(&file.path) {
                Ok(fingerprint) => {
                    log::trace!("Hashed {}: {}", file.path.display(), fingerprint);
                    by_fingerprint
                        .entry(fingerprint.clone())
                        .or_insert_with(|| {
                            order.push(fingerprint);
                            Vec::new()
                        })
                        .push(file);
                }
                Err(e) => {
                    log::warn!("Error reading file {}: {}", file.path.display(), e);
                }
            }
        }

        order
            .into_iter()
            .filter_map(|fingerprint| {
                let files = by_fingerprint.remove(&fingerprint)?;
                (files.len() > 1).then(|| DuplicateGroup::new(fingerprint, size, files))
            })
            .collect()
    }

    /// Walk `roots` and detect duplicates in one call.
    #[must_use]
    pub fn find_duplicates(&self, roots: &[PathBuf]) -> (Vec<DuplicateGroup>, RunStats) {
        let mut stats = RunStats::new();
        let buckets = self.walk(roots, &mut stats);
        let groups = self.detect(buckets, &mut stats);
        (groups, stats)
    }
}
