//! Console palette.
//!
//! 256-color styles for prompts and reports. Coloring is switched off
//! globally by [`init`] when `--no-color`/`NO_COLOR` is set or stdout is
//! not a terminal.

use std::io::{self, IsTerminal, Write};

use yansi::{Paint, Style};

/// Headers and group frames.
pub const ACCENT: Style = Style::new().fixed(141).bold();
/// Section titles.
pub const TITLE: Style = Style::new().fixed(195).bold();
/// Menu keys and prompt markers.
pub const KEY: Style = Style::new().fixed(67);
/// Primary text such as paths.
pub const TEXT: Style = Style::new().fixed(250);
/// Labels and hints.
pub const DIM: Style = Style::new().fixed(240);
/// Informational notes.
pub const MUTED: Style = Style::new().fixed(103);
/// Completed actions and freed space.
pub const SUCCESS: Style = Style::new().fixed(121).bold();
/// Errors and invalid input.
pub const ERROR: Style = Style::new().fixed(210);

const RULE_WIDTH: usize = 66;

/// Enable or disable coloring for the whole process.
pub fn init(no_color: bool) {
    if no_color || !io::stdout().is_terminal() {
        yansi::disable();
    } else {
        yansi::enable();
    }
}

/// Write a section header followed by a dotted rule.
///
/// # Errors
///
/// Propagates write failures.
pub fn header<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    writeln!(out, "\n  {}  {}", "◆".paint(ACCENT), text.paint(TITLE))?;
    writeln!(out, "{}", "·".repeat(RULE_WIDTH).paint(MUTED))
}

/// Write a dotted rule.
///
/// # Errors
///
/// Propagates write failures.
pub fn rule<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "·".repeat(RULE_WIDTH).paint(DIM))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_plain() {
        yansi::disable();
        let mut buf = Vec::new();
        header(&mut buf, "FINAL SUMMARY").unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("◆  FINAL SUMMARY"));
        assert!(!text.contains('\u{1b}'));
    }
}
