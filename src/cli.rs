//! Command-line interface definitions for HashSweep.
//!
//! This module defines all CLI arguments using the clap derive API. Every
//! option that is left out falls back to the configuration file, and scan
//! mode and action fall back further to an interactive prompt.
//!
//! # Example
//!
//! ```bash
//! # Scan the current directory, asking for scan mode and action
//! hashsweep
//!
//! # Scan two directories recursively and keep the newest copy of each file
//! hashsweep ~/Downloads ~/Desktop --recursive --action auto
//!
//! # Report only, as JSON
//! hashsweep ~/Pictures --flat --action skip --output json
//!
//! # Lower the size threshold and enable debug logging
//! hashsweep -v --min-size 1B
//! ```

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::actions::resolve::Policy;
use crate::scanner::ScanMode;

/// Find duplicate files by content and clean them up.
///
/// HashSweep groups files by size, confirms duplicates with SHA-256, and
/// then skips, auto-resolves (newest copy wins), or asks per group.
#[derive(Debug, Parser)]
#[command(name = "hashsweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directories to scan (default: current directory)
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Minimum file size to consider (e.g., 1KiB, 10MB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Scan subdirectories too
    #[arg(short, long, conflicts_with = "flat")]
    pub recursive: bool,

    /// Scan only the top level of each directory
    #[arg(long)]
    pub flat: bool,

    /// What to do with the duplicates found
    #[arg(short, long, value_enum, value_name = "ACTION")]
    pub action: Option<ActionArg>,

    /// Format of the final summary
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Configuration file (default: platform config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors and the summary
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,
}

impl Cli {
    /// Scan mode requested on the command line, if any.
    #[must_use]
    pub fn scan_mode(&self) -> Option<ScanMode> {
        match (self.recursive, self.flat) {
            (true, _) => Some(ScanMode::Recursive),
            (_, true) => Some(ScanMode::Flat),
            _ => None,
        }
    }
}

/// Action to take on the detected duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionArg {
    /// Decide group by group
    Interactive,
    /// Keep the newest file of every group, delete the rest
    Auto,
    /// Only report duplicates
    Skip,
}

impl From<ActionArg> for Policy {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Interactive => Policy::Interactive,
            ActionArg::Auto => Policy::Auto,
            ActionArg::Skip => Policy::Skip,
        }
    }
}

/// Output format for the final summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use hashsweep::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// assert_eq!(parse_size("1MiB").unwrap(), 1_048_576);
/// ```
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
