//! Flint Diagnostic - error reporting for the Flint runtime.
//!
//! Converts runtime failures into renderable diagnostics. A [`Diagnostic`]
//! carries a severity, a message and an optional [`SourcePos`]; the
//! [`TerminalEmitter`] renders it with the offending source line and a
//! column caret so the front end can point at exactly where a script failed.

mod diagnostic;
mod emitter;

pub use diagnostic::{Diagnostic, Severity};
pub use emitter::TerminalEmitter;

pub use flint_ir::SourcePos;
