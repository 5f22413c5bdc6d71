//! Console prompts.
//!
//! Input is read line by line on a background thread and handed over a
//! channel, so a waiting prompt can notice Ctrl+C through the shutdown flag
//! instead of blocking in `read_line` until Enter is pressed.
//!
//! The parsers ([`parse_scan_mode`], [`parse_action`],
//! [`parse_group_choice`]) are pure; [`ConsolePrompter`] only prints menus
//! and loops until a parser accepts the input.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Local};
use thiserror::Error;
use yansi::Paint;

use crate::actions::resolve::{newest_index, GroupChoice, GroupDecider, Policy, ResolveError};
use crate::duplicates::DuplicateGroup;
use crate::output::format_size;
use crate::scanner::ScanMode;

use super::theme;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Errors from reading console input.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Input reached end of file.
    #[error("input closed")]
    Closed,

    /// Ctrl+C was pressed while waiting for input.
    #[error("interrupted while waiting for input")]
    Interrupted,

    /// Writing the prompt or reading the answer failed.
    #[error("console I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Answer to the action prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionChoice {
    /// Resolve with this policy.
    Run(Policy),
    /// Exit without a summary.
    Quit,
}

/// `1` is flat, `2` is recursive.
#[must_use]
pub fn parse_scan_mode(input: &str) -> Option<ScanMode> {
    match input.trim() {
        "1" => Some(ScanMode::Flat),
        "2" => Some(ScanMode::Recursive),
        _ => None,
    }
}

/// `1` interactive, `2` auto, `3` skip, `4` quit.
#[must_use]
pub fn parse_action(input: &str) -> Option<ActionChoice> {
    match input.trim() {
        "1" => Some(ActionChoice::Run(Policy::Interactive)),
        "2" => Some(ActionChoice::Run(Policy::Auto)),
        "3" => Some(ActionChoice::Run(Policy::Skip)),
        "4" => Some(ActionChoice::Quit),
        _ => None,
    }
}

/// A 1-based file number, `a`, `s` or `q`; case-insensitive.
///
/// Numbers are not range-checked here.
#[must_use]
pub fn parse_group_choice(input: &str) -> Option<GroupChoice> {
    let input = input.trim().to_lowercase();
    match input.as_str() {
        "a" => Some(GroupChoice::KeepNewest),
        "s" => Some(GroupChoice::Skip),
        "q" => Some(GroupChoice::Abort),
        number => number
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .map(GroupChoice::Keep),
    }
}

/// Format a modification time in local time.
#[must_use]
pub fn format_mtime(modified: std::time::SystemTime) -> String {
    DateTime::<Local>::from(modified)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Interactive console front end.
///
/// Prompts are written to `W`; answers come from the reader passed to
/// [`new`](Self::new).
pub struct ConsolePrompter<W: Write> {
    lines: Receiver<io::Result<String>>,
    out: W,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl<W: Write> ConsolePrompter<W> {
    /// Create a prompter reading lines from `input`.
    pub fn new<R: BufRead + Send + 'static>(input: R, out: W) -> Self {
        Self {
            lines: spawn_reader(input),
            out,
            shutdown_flag: None,
        }
    }

    /// Stop waiting for input once `flag` is set.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Consume the prompter and return its writer.
    pub fn into_output(self) -> W {
        self.out
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    fn read_line(&mut self) -> Result<String, PromptError> {
        write!(self.out, "\n  {}  ", "›".paint(theme::KEY))?;
        self.out.flush()?;

        loop {
            if self.is_shutdown_requested() {
                return Err(PromptError::Interrupted);
            }
            match self.lines.recv_timeout(POLL_INTERVAL) {
                Ok(line) => return Ok(line?),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return Err(PromptError::Closed),
            }
        }
    }

    fn invalid(&mut self, message: &str) -> Result<(), PromptError> {
        writeln!(self.out, "  {}", message.paint(theme::ERROR))?;
        Ok(())
    }

    fn menu_item(&mut self, key: &str, label: &str, hint: &str) -> io::Result<()> {
        writeln!(
            self.out,
            "  {}  {}  {}",
            key.paint(theme::KEY),
            label.paint(theme::TEXT),
            hint.paint(theme::DIM)
        )
    }

    /// Ask whether to scan recursively.
    ///
    /// # Errors
    ///
    /// Fails when input is closed, interrupted or unreadable.
    pub fn ask_scan_mode(&mut self, roots: &[PathBuf]) -> Result<ScanMode, PromptError> {
        theme::header(&mut self.out, "SCAN MODE")?;
        for root in roots {
            writeln!(
                self.out,
                "  {}  {}",
                "directory".paint(theme::DIM),
                root.display().paint(theme::TEXT)
            )?;
        }
        writeln!(self.out)?;
        self.menu_item("1", ScanMode::Flat.label(), "(no subdirectories)")?;
        self.menu_item("2", ScanMode::Recursive.label(), "(recursive)")?;

        loop {
            let line = self.read_line()?;
            match parse_scan_mode(&line) {
                Some(mode) => return Ok(mode),
                None => self.invalid("Invalid choice! Please enter 1 or 2.")?,
            }
        }
    }

    /// Ask what to do with the duplicates.
    ///
    /// # Errors
    ///
    /// Fails when input is closed, interrupted or unreadable.
    pub fn ask_action(&mut self) -> Result<ActionChoice, PromptError> {
        theme::header(&mut self.out, "ACTION")?;
        writeln!(
            self.out,
            "  {}\n",
            "What would you like to do with the duplicates?".paint(theme::DIM)
        )?;
        self.menu_item("1", "Interactive mode", "- choose which files to delete")?;
        self.menu_item("2", "Auto-delete mode", "- keep newest files, delete older ones")?;
        self.menu_item("3", "Skip", "- don't delete any files")?;
        self.menu_item("4", "Quit", "- exit the program")?;

        loop {
            let line = self.read_line()?;
            match parse_action(&line) {
                Some(choice) => return Ok(choice),
                None => self.invalid("Invalid choice! Please enter 1, 2, 3, or 4.")?,
            }
        }
    }

    fn show_group(
        &mut self,
        group: &DuplicateGroup,
        position: usize,
        total: usize,
    ) -> io::Result<()> {
        let frame = theme::ACCENT;
        writeln!(
            self.out,
            "\n  {}",
            format!("┌─  Duplicate Group {position} / {total}").paint(frame)
        )?;
        writeln!(
            self.out,
            "  {}  {}",
            "│".paint(frame),
            format!("Files in this group ({} files):", group.len()).paint(theme::DIM)
        )?;

        let newest = newest_index(group);
        for (i, file) in group.files.iter().enumerate() {
            let bullet = if Some(i) == newest {
                "●".paint(theme::SUCCESS)
            } else {
                "○".paint(theme::DIM)
            };
            writeln!(
                self.out,
                "  {}  {}  {}  {}",
                "│".paint(frame),
                (i + 1).paint(theme::KEY),
                bullet,
                file.path.display().paint(theme::TEXT)
            )?;
            writeln!(
                self.out,
                "  {}      {}",
                "│".paint(frame),
                format!(
                    "Size: {} | Modified: {}",
                    format_size(file.size),
                    format_mtime(file.modified)
                )
                .paint(theme::DIM)
            )?;
        }
        writeln!(self.out, "  {}", "└─".paint(frame))?;

        writeln!(self.out, "  {}  Keep this file, delete all others", "[number]".paint(theme::DIM))?;
        writeln!(self.out, "  {}       Auto-keep newest, delete older", "[a]".paint(theme::DIM))?;
        writeln!(self.out, "  {}       Skip this group", "[s]".paint(theme::DIM))?;
        writeln!(self.out, "  {}       Quit interactive mode", "[q]".paint(theme::DIM))
    }

    fn ask_group(
        &mut self,
        group: &DuplicateGroup,
        position: usize,
        total: usize,
    ) -> Result<GroupChoice, PromptError> {
        self.show_group(group, position, total)?;
        loop {
            let line = self.read_line()?;
            match parse_group_choice(&line) {
                Some(GroupChoice::Abort) => {
                    writeln!(self.out, "\n  {}", "Exiting interactive mode...".paint(theme::MUTED))?;
                    return Ok(GroupChoice::Abort);
                }
                Some(GroupChoice::Skip) => {
                    writeln!(self.out, "  {}", "Skipping this group...".paint(theme::DIM))?;
                    return Ok(GroupChoice::Skip);
                }
                Some(choice) => return Ok(choice),
                None => self.invalid("Invalid choice! Please try again.")?,
            }
        }
    }
}

impl<W: Write> GroupDecider for ConsolePrompter<W> {
    fn decide(&mut self, group: &DuplicateGroup, position: usize, total: usize) -> GroupChoice {
        match self.ask_group(group, position, total) {
            Ok(choice) => choice,
            Err(e) => {
                log::debug!("Stopping interactive mode: {}", e);
                GroupChoice::Abort
            }
        }
    }

    fn reject(&mut self, _error: &ResolveError) {
        let _ = self.invalid("Invalid number! Please choose a valid file number.");
    }
}

fn spawn_reader<R: BufRead + Send + 'static>(mut input: R) -> Receiver<io::Result<String>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || loop {
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {
                if tx.send(Ok(line)).is_err() {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                let _ = tx.send(Err(e));
                break;
            }
        }
    });
    rx
}
