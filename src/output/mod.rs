//! Reporting for scan results.
//!
//! - [`summary`]: the end-of-run [`Summary`] and the post-detection
//!   [`DetectionOverview`], rendered as text
//! - [`json`]: the same summary as JSON for scripting
//!
//! Nothing here mutates run state.
//!
//! # Example
//!
//! ```no_run
//! use hashsweep::duplicates::DuplicateFinder;
//! use hashsweep::error::ExitCode;
//! use hashsweep::output::{JsonOutput, Summary};
//! use hashsweep::scanner::ScanMode;
//! use std::path::PathBuf;
//!
//! let (groups, stats) = DuplicateFinder::with_defaults().find_duplicates(&[PathBuf::from(".")]);
//! let summary = Summary::new(ScanMode::Recursive, &stats, groups.len());
//!
//! let output = JsonOutput::new(&summary, &groups, ExitCode::Success);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod json;
pub mod summary;

pub use json::{JsonOutput, JsonOutputError, JsonSummary};
pub use summary::{format_size, DetectionOverview, Outcome, Summary};
