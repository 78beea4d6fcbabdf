//! Terminal rendering of diagnostics.
//!
//! Renders the message, the `--> file:line` arrow, the raw source line and a
//! caret under the failing column:
//!
//! ```text
//! error: stack pop error
//!   --> demo.fl:3
//!    |
//!  3 | 10 x +
//!    |      ^
//! ```

use std::fmt::Write as _;

use crate::Diagnostic;

/// Renders diagnostics for terminal output.
#[derive(Default)]
pub struct TerminalEmitter;

impl TerminalEmitter {
    /// Create an emitter.
    pub fn new() -> Self {
        TerminalEmitter
    }

    /// Render a diagnostic to a string.
    ///
    /// Without a source position only the `severity: message` line is
    /// produced. The caret is byte-indexed into the raw line text, clamped
    /// to the line length.
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}: {}", diagnostic.severity, diagnostic.message);

        if let Some(pos) = &diagnostic.pos {
            let line_label = pos.line().to_string();
            let gutter = " ".repeat(line_label.len());
            let column = (pos.column() as usize).min(pos.line_text().len());

            let _ = writeln!(out, "{gutter}--> {}:{}", pos.filename(), pos.line());
            let _ = writeln!(out, "{gutter} |");
            let _ = writeln!(out, "{line_label} | {}", pos.line_text());
            let _ = writeln!(out, "{gutter} | {}^", " ".repeat(column));
        }

        out
    }

    /// Render a diagnostic to standard error.
    pub fn emit(&self, diagnostic: &Diagnostic) {
        eprint!("{}", self.render(diagnostic));
    }
}
