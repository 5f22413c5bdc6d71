//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements
//! [`ProgressCallback`] to display a spinner while walking and a progress
//! bar while hashing. Bars are drawn on stderr so they never mix with the
//! report on stdout.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Phase name used while walking scan roots.
pub const PHASE_WALKING: &str = "walking";
/// Phase name used while hashing same-size candidates.
pub const PHASE_HASHING: &str = "hashing";

/// Progress callback for the detection pipeline.
///
/// Implement this trait to receive progress updates during the walk and
/// hashing phases.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// `total` is zero when the amount of work is not known in advance.
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed (`current` is 1-based).
    fn on_progress(&self, current: usize, path: &str);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);
}

/// Progress reporter using indicatif.
pub struct Progress {
    bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// If `quiet` is true, nothing is drawn.
    ///
    /// # Examples
    ///
    /// ```
    /// use hashsweep::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            quiet,
        }
    }

    fn walking_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn hashing_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    fn with_bar(&self, f: impl FnOnce(&mut Option<ProgressBar>)) {
        if let Ok(mut bar) = self.bar.lock() {
            f(&mut bar);
        }
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        let pb = if phase == PHASE_WALKING {
            let pb = ProgressBar::new_spinner();
            pb.set_style(Self::walking_style());
            pb.set_message("Scanning files by size");
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            let pb = ProgressBar::new(total as u64);
            pb.set_style(Self::hashing_style());
            pb.set_message("Calculating SHA-256 hashes");
            pb
        };

        self.with_bar(|bar| {
            if let Some(previous) = bar.replace(pb) {
                previous.finish_and_clear();
            }
        });
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.quiet {
            return;
        }

        self.with_bar(|bar| {
            if let Some(pb) = bar.as_ref() {
                pb.set_position(current as u64);
                if pb.length().is_some() {
                    pb.set_message(truncate_path(path, 30));
                }
            }
        });
    }

    fn on_phase_end(&self, _phase: &str) {
        if self.quiet {
            return;
        }

        self.with_bar(|bar| {
            if let Some(pb) = bar.take() {
                pb.finish_and_clear();
            }
        });
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len + 4 > max_len {
        let tail: String = file_name.chars().skip(name_len + 3 - max_len).collect();
        return format!("...{}", tail);
    }

    format!(".../{}", file_name)
}
