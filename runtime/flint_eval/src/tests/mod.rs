//! Engine-level tests: whole units run against real contexts.
//!
//! Unit-level tests live next to their modules; these exercise the engine
//! through the public surface the compiler and extensions use.

#![allow(clippy::unwrap_used)]

mod concurrency_tests;
mod control_tests;
mod output_tests;

use crate::{
    CodeUnit, ExecContext, Name, OpKind, Operation, PrintHandler, Runtime, SharedRuntime,
};

/// A runtime whose output is captured for assertions.
pub(crate) fn buffered_runtime() -> SharedRuntime {
    SharedRuntime::new(Runtime::with_print_handler(PrintHandler::buffer()))
}

/// A fresh context against a buffered runtime.
pub(crate) fn context() -> ExecContext {
    ExecContext::new(buffered_runtime())
}

/// Build a unit from bare operations.
pub(crate) fn unit(kinds: Vec<OpKind>) -> CodeUnit {
    CodeUnit::new(kinds.into_iter().map(Operation::bare).collect())
}

/// Build a name, panicking on over-length (tests only).
pub(crate) fn name(s: &str) -> Name {
    Name::new(s).unwrap()
}

/// Wrap a unit in a shareable code handle (as `spawn_thread` expects).
pub(crate) fn code_handle(unit: CodeUnit) -> crate::Heap<CodeUnit> {
    crate::Value::code(unit).as_code().unwrap()
}
