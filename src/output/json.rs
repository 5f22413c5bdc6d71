//! JSON output for the run summary.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "summary": {
//!     "scan_mode": "recursive",
//!     "files_processed": 4,
//!     "duplicate_groups_remaining": 0,
//!     "total_duplicate_files_found": 3,
//!     "files_deleted": 2,
//!     "bytes_freed": 4096,
//!     "interrupted": false,
//!     "duplicate_percentage": 75.0,
//!     "remaining_files": 2,
//!     "exit_code": 0,
//!     "exit_code_name": "HS000"
//!   },
//!   "remaining_groups": [
//!     { "fingerprint": "ab12...", "size": 2048, "files": ["/a", "/b"] }
//!   ]
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{DuplicateGroup, GroupView};
use crate::error::ExitCode;

use super::summary::Summary;

/// Summary fields plus derived values.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// The reporting contract
    #[serde(flatten)]
    pub summary: Summary,
    /// Duplicate files as a percentage of processed files, if any
    pub duplicate_percentage: Option<f64>,
    /// Processed files still on disk
    pub remaining_files: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "HS000")
    pub exit_code_name: String,
}

/// Complete JSON document for a run.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Run summary
    pub summary: JsonSummary,
    /// Groups left on disk
    pub remaining_groups: Vec<GroupView>,
}

impl JsonOutput {
    /// Build the document from a summary and the groups left unresolved.
    #[must_use]
    pub fn new(summary: &Summary, remaining: &[DuplicateGroup], exit_code: ExitCode) -> Self {
        Self {
            summary: JsonSummary {
                summary: *summary,
                duplicate_percentage: summary.duplicate_percentage(),
                remaining_files: summary.remaining_files(),
                exit_code: exit_code.as_i32(),
                exit_code_name: exit_code.code_prefix().to_string(),
            },
            remaining_groups: remaining.iter().map(GroupView::from).collect(),
        }
    }

    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the document followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur while producing JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// Serialization failed.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing failed.
    #[error("I/O error during JSON output: {0}")]
    Io(#[from] std::io::Error),
}
