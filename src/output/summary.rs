//! Run summary and detection overview.
//!
//! [`Summary`] is the reporting contract produced at the end of every run
//! that gets past the action prompt. It is a snapshot of [`RunStats`] plus
//! the scan mode and the number of groups left; rendering only reads it.

use std::io::{self, Write};

use bytesize::ByteSize;
use serde::Serialize;
use yansi::Paint;

use crate::duplicates::DuplicateGroup;
use crate::scanner::ScanMode;
use crate::stats::RunStats;
use crate::ui::theme;

/// Format a byte count with binary units.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    ByteSize::b(bytes).to_string()
}

/// Totals shown after detection, before any action is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DetectionOverview {
    /// Number of duplicate groups
    pub groups: usize,
    /// Files across all groups
    pub duplicate_files: usize,
    /// Bytes freed if every group kept a single file
    pub potential_savings: u64,
}

impl DetectionOverview {
    /// Compute the overview for `groups`.
    #[must_use]
    pub fn from_groups(groups: &[DuplicateGroup]) -> Self {
        Self {
            groups: groups.len(),
            duplicate_files: groups.iter().map(DuplicateGroup::len).sum(),
            potential_savings: groups.iter().map(DuplicateGroup::wasted_space).sum(),
        }
    }

    /// Whether nothing was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups == 0
    }

    /// Write the overview as text.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.is_empty() {
            return writeln!(out, "\n  {}", "No duplicate files found!".paint(theme::SUCCESS));
        }

        theme::header(out, "DUPLICATES FOUND")?;
        row(out, "Duplicate groups", self.groups.paint(theme::ACCENT))?;
        row(out, "Total duplicate files", self.duplicate_files.paint(theme::ACCENT))?;
        row(
            out,
            "Potential space to free",
            format_size(self.potential_savings).paint(theme::SUCCESS),
        )
    }
}

/// How a run ended, for the closing line of the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// At least one file was deleted.
    Cleaned,
    /// Duplicates were found but nothing was deleted.
    NothingDeleted,
    /// No duplicates were found.
    NoDuplicates,
}

/// End-of-run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Recursive or flat scan
    pub scan_mode: ScanMode,
    /// Files that passed the size filter
    pub files_processed: u64,
    /// Groups skipped or never reached
    pub duplicate_groups_remaining: usize,
    /// Files across all detected groups
    pub total_duplicate_files_found: u64,
    /// Confirmed deletions
    pub files_deleted: u64,
    /// Bytes released by confirmed deletions
    pub bytes_freed: u64,
    /// Whether Ctrl+C cut the run short
    pub interrupted: bool,
}

impl Summary {
    /// Snapshot `stats` for reporting.
    #[must_use]
    pub fn new(scan_mode: ScanMode, stats: &RunStats, groups_remaining: usize) -> Self {
        Self {
            scan_mode,
            files_processed: stats.files_processed,
            duplicate_groups_remaining: groups_remaining,
            total_duplicate_files_found: stats.total_duplicate_files,
            files_deleted: stats.files_deleted,
            bytes_freed: stats.bytes_freed,
            interrupted: false,
        }
    }

    /// Mark the run as interrupted.
    #[must_use]
    pub fn with_interrupted(mut self, interrupted: bool) -> Self {
        self.interrupted = interrupted;
        self
    }

    /// Duplicate files as a percentage of processed files.
    ///
    /// `None` when no duplicates were found or nothing was processed.
    #[must_use]
    pub fn duplicate_percentage(&self) -> Option<f64> {
        if self.total_duplicate_files_found == 0 || self.files_processed == 0 {
            return None;
        }
        Some(self.total_duplicate_files_found as f64 / self.files_processed as f64 * 100.0)
    }

    /// Processed files that are still on disk.
    #[must_use]
    pub fn remaining_files(&self) -> u64 {
        self.files_processed.saturating_sub(self.files_deleted)
    }

    /// Closing state of the run.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        if self.files_deleted > 0 {
            Outcome::Cleaned
        } else if self.total_duplicate_files_found > 0 {
            Outcome::NothingDeleted
        } else {
            Outcome::NoDuplicates
        }
    }

    /// Write the summary as text.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        theme::header(out, "FINAL SUMMARY")?;

        row(out, "Scan mode", self.scan_mode.label())?;
        row(out, "Files processed", self.files_processed)?;
        row(out, "Duplicate groups remaining", self.duplicate_groups_remaining)?;
        row(out, "Total duplicate files", self.total_duplicate_files_found)?;
        row(out, "Files deleted", self.files_deleted.paint(theme::SUCCESS))?;
        row(out, "Space freed", format_size(self.bytes_freed).paint(theme::ACCENT))?;
        if let Some(pct) = self.duplicate_percentage() {
            row(out, "Duplicate percentage", format!("{pct:.1}%"))?;
        }
        row(out, "Remaining files", self.remaining_files())?;

        theme::rule(out)?;
        if self.interrupted {
            writeln!(out, "\n  {}", "Process interrupted by user.".paint(theme::MUTED))?;
        }

        let closing = match self.outcome() {
            Outcome::Cleaned => "Cleanup completed successfully!".paint(theme::SUCCESS),
            Outcome::NothingDeleted => "No files were deleted.".paint(theme::MUTED),
            Outcome::NoDuplicates => "No duplicate files found!".paint(theme::SUCCESS),
        };
        writeln!(out, "\n  {closing}")
    }
}

fn row<W: Write>(out: &mut W, label: &str, value: impl std::fmt::Display) -> io::Result<()> {
    writeln!(out, "  {:<28}  {}", label.paint(theme::DIM), value)
}
