//! Error types for the execution engine.
//!
//! Every fallible operation produces an [`EvalError`]: a structured
//! [`EvalErrorKind`] plus the [`SourcePos`] of the operation that failed.
//! Factory functions are the public construction API; `Display` produces the
//! human message the front end shows, so the kinds can grow structure
//! without breaking rendered output.

use std::fmt;

use flint_diagnostic::Diagnostic;
use flint_ir::SourcePos;

use crate::value::Value;

/// Result of evaluation.
pub type EvalResult<T = Value> = Result<T, EvalError>;

/// Typed error category for structured diagnostics.
///
/// Each variant carries the data the condition needs; matching on the kind
/// replaces string inspection in callers and tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    /// A narrowing accessor was applied to the wrong value variant.
    /// `expected` is the variant's noun ("number", "string", "name",
    /// "code", "pointer").
    TypeMismatch { expected: &'static str },

    /// A name was not found in the frame chain or the global tree.
    UnboundVariable { name: String },

    /// A name resolved to a declared but never-assigned slot.
    UninitialisedVariable { name: String },

    /// Pop on an empty operand stack.
    StackUnderflow,

    /// Re-declaring a name already present in the same scope.
    DuplicateVariable { name: String },

    /// Inserting a key already present in the global tree.
    DuplicateKey { key: String },

    /// A constructed name exceeded the length cap.
    NameTooLong,

    /// Binary `+` on operands that are neither numbers nor code units.
    UnknownOperands,

    /// Integer division or modulo by zero.
    DivisionByZero,

    /// Malformed printf-style format string.
    FormatError { detail: String },

    /// Print applied to a value that is neither number nor text.
    PrintError,

    /// Value-of applied to an unresolvable operand.
    ValueError,

    /// To-name applied to an operand with no name rendering.
    ToNameError,

    /// Assignment whose target is not a declared variable.
    AssignmentVariableNotFound,

    /// Assignment whose value operand cannot be resolved.
    AssignmentValueNotFound,

    /// Catch-all for errors raised by native extension operations.
    Custom { message: String },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected } => write!(f, "{expected} not found"),
            Self::UnboundVariable { name } => write!(f, "variable error: {name} not found"),
            Self::UninitialisedVariable { name } => {
                write!(f, "variable error: {name} not initialised")
            }
            Self::StackUnderflow => write!(f, "stack pop error"),
            Self::DuplicateVariable { name } => write!(f, "variable {name} already defined"),
            Self::DuplicateKey { key } => write!(f, "key {key} already defined"),
            Self::NameTooLong => write!(f, "name too long"),
            Self::UnknownOperands => write!(f, "unknown operands"),
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::FormatError { detail } => write!(f, "format error: {detail}"),
            Self::PrintError => write!(f, "print error"),
            Self::ValueError => write!(f, "value error"),
            Self::ToNameError => write!(f, "to name error"),
            Self::AssignmentVariableNotFound => {
                write!(f, "assignment error, variable not found")
            }
            Self::AssignmentValueNotFound => write!(f, "assignment error, value not found"),
            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// A runtime failure: structured kind plus optional source position.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    /// What went wrong.
    pub kind: EvalErrorKind,
    /// Where it went wrong, when the failing operation carried a position.
    pub pos: Option<SourcePos>,
}

impl EvalError {
    /// Create an error from a kind, with no position yet.
    pub fn new(kind: EvalErrorKind) -> Self {
        EvalError { kind, pos: None }
    }

    /// Create a custom error (native extension operations).
    pub fn custom(message: impl Into<String>) -> Self {
        EvalError::new(EvalErrorKind::Custom {
            message: message.into(),
        })
    }

    /// Attach a source position if none is recorded yet.
    ///
    /// The innermost position wins: an error that already knows where it
    /// happened is not overwritten by an enclosing operation.
    #[must_use]
    pub fn at(mut self, pos: Option<&SourcePos>) -> Self {
        if self.pos.is_none() {
            self.pos = pos.cloned();
        }
        self
    }

    /// Convert to a renderable diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.kind.to_string());
        match &self.pos {
            Some(pos) => diagnostic.with_pos(pos.clone()),
            None => diagnostic,
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl std::error::Error for EvalError {}

// Factory functions

/// Accessor applied to the wrong variant; `expected` is the variant noun.
pub fn type_mismatch(expected: &'static str) -> EvalError {
    EvalError::new(EvalErrorKind::TypeMismatch { expected })
}

/// Name not found in any scope.
pub fn unbound_variable(name: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::UnboundVariable { name: name.into() })
}

/// Name found but its slot holds no value.
pub fn uninitialised_variable(name: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::UninitialisedVariable { name: name.into() })
}

/// Pop on an empty operand stack.
pub fn stack_underflow() -> EvalError {
    EvalError::new(EvalErrorKind::StackUnderflow)
}

/// Duplicate declaration in the same scope.
pub fn duplicate_variable(name: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::DuplicateVariable { name: name.into() })
}

/// Duplicate key in the global tree.
pub fn duplicate_key(key: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::DuplicateKey { key: key.into() })
}

/// A constructed name exceeded the length cap.
pub fn name_too_long() -> EvalError {
    EvalError::new(EvalErrorKind::NameTooLong)
}

/// `+` on operands that are neither numeric nor code.
pub fn unknown_operands() -> EvalError {
    EvalError::new(EvalErrorKind::UnknownOperands)
}

/// Integer division or modulo by zero.
pub fn division_by_zero() -> EvalError {
    EvalError::new(EvalErrorKind::DivisionByZero)
}

/// Malformed format string.
pub fn format_error(detail: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::FormatError {
        detail: detail.into(),
    })
}

/// Print on a value that is neither number nor text.
pub fn print_error() -> EvalError {
    EvalError::new(EvalErrorKind::PrintError)
}

/// Value-of on an unresolvable operand.
pub fn value_error() -> EvalError {
    EvalError::new(EvalErrorKind::ValueError)
}

/// To-name on an operand with no name rendering.
pub fn to_name_error() -> EvalError {
    EvalError::new(EvalErrorKind::ToNameError)
}

/// Assignment target is not a declared variable.
pub fn assignment_variable_not_found() -> EvalError {
    EvalError::new(EvalErrorKind::AssignmentVariableNotFound)
}

/// Assignment value operand cannot be resolved.
pub fn assignment_value_not_found() -> EvalError {
    EvalError::new(EvalErrorKind::AssignmentValueNotFound)
}
