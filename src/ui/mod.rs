//! Console front end: prompts, per-file action reporting and colors.

pub mod prompt;
pub mod theme;

use std::cell::RefCell;
use std::io::Write;
use std::path::Path;

use yansi::Paint;

use crate::actions::delete::{DeleteError, DeleteProgressCallback};
use crate::output::format_size;

pub use prompt::{
    format_mtime, parse_action, parse_group_choice, parse_scan_mode, ActionChoice,
    ConsolePrompter, PromptError,
};

/// Prints kept and deleted files as the resolution engine works.
pub struct ConsoleReporter<W: Write> {
    out: RefCell<W>,
}

impl<W: Write> ConsoleReporter<W> {
    /// Report to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    /// Consume the reporter and return its writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn line(&self, args: std::fmt::Arguments<'_>) {
        // Best effort
        let _ = writeln!(self.out.borrow_mut(), "{args}");
    }
}

impl<W: Write> DeleteProgressCallback for ConsoleReporter<W> {
    fn on_keep(&self, path: &Path) {
        self.line(format_args!(
            "  {} {}",
            "Keeping:".paint(theme::DIM),
            path.display().paint(theme::TEXT)
        ));
    }

    fn on_delete_success(&self, path: &Path, size: u64) {
        self.line(format_args!(
            "  {}  {} {}  {}",
            "✓".paint(theme::SUCCESS),
            "Deleted:".paint(theme::DIM),
            path.display(),
            format!("({})", format_size(size)).paint(theme::DIM)
        ));
    }

    fn on_delete_failure(&self, path: &Path, error: &DeleteError) {
        self.line(format_args!(
            "  {}",
            format!("✗  Error deleting {}: {}", path.display(), error).paint(theme::ERROR)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_reporter_lines() {
        yansi::disable();
        let reporter = ConsoleReporter::new(Vec::new());

        reporter.on_keep(Path::new("/k/keep.txt"));
        reporter.on_delete_success(Path::new("/k/dup.txt"), 2048);
        reporter.on_delete_failure(
            Path::new("/k/gone.txt"),
            &DeleteError::NotFound(PathBuf::from("/k/gone.txt")),
        );

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.contains("Keeping: /k/keep.txt"));
        assert!(text.contains("Deleted: /k/dup.txt"));
        assert!(text.contains("Error deleting /k/gone.txt"));
    }
}
