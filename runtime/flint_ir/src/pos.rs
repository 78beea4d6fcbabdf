//! Source position records.

use std::fmt;
use std::sync::Arc;

/// Position of an operation in the original script text.
///
/// Every operation carries one of these so that a runtime failure can be
/// rendered against the line it came from. The filename and raw line text
/// are shared (`Arc<str>`) because every operation compiled from the same
/// line points at the same strings.
#[derive(Clone, PartialEq, Eq)]
pub struct SourcePos {
    filename: Arc<str>,
    line: u32,
    line_text: Arc<str>,
    column: u32,
}

impl SourcePos {
    /// Create a source position.
    ///
    /// `column` is a zero-based byte index into `line_text`.
    pub fn new(
        filename: impl Into<Arc<str>>,
        line: u32,
        line_text: impl Into<Arc<str>>,
        column: u32,
    ) -> Self {
        SourcePos {
            filename: filename.into(),
            line,
            line_text: line_text.into(),
            column,
        }
    }

    /// The file the operation was compiled from.
    #[inline]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// One-based line number.
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The raw text of the source line.
    #[inline]
    pub fn line_text(&self) -> &str {
        &self.line_text
    }

    /// Zero-based byte index of the operation within the line.
    #[inline]
    pub fn column(&self) -> u32 {
        self.column
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.filename, self.line)
    }
}

impl fmt::Debug for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SourcePos({}:{}:{})",
            self.filename, self.line, self.column
        )
    }
}
