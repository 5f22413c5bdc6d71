//! Run statistics accumulated across the scan, detect and resolve phases.
//!
//! A single [`RunStats`] value is created at the start of a run and passed
//! by `&mut` to each phase in turn. Counters only ever increase.

use serde::Serialize;

/// Counters for one scan-and-resolve invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Regular files at or above the size threshold seen by the walk
    pub files_processed: u64,
    /// Members of all duplicate groups at detection time
    pub total_duplicate_files: u64,
    /// Files whose deletion call reported success
    pub files_deleted: u64,
    /// Bytes reclaimed by successful deletions
    pub bytes_freed: u64,
}

impl RunStats {
    /// Create zeroed statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one file accepted by the walk.
    pub fn record_processed(&mut self) {
        self.files_processed += 1;
    }

    /// Count the members of a newly detected duplicate group.
    pub fn record_duplicate_group(&mut self, members: usize) {
        self.total_duplicate_files += members as u64;
    }

    /// Count one confirmed deletion of `bytes` bytes.
    pub fn record_deletion(&mut self, bytes: u64) {
        self.files_deleted += 1;
        self.bytes_freed += bytes;
    }
}
