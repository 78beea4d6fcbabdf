//! Flint Eval - the execution engine of the Flint scripting language.
//!
//! Flint is a small embeddable stack-based language: scripts compile
//! (externally) into trees of operations, and this crate runs those trees.
//!
//! # Architecture
//!
//! - [`Value`]: the closed five-variant value model (numbers, text, names,
//!   code, indirect references), shared by handle
//! - [`Cache`]: per-context recycling allocator for text buffers
//! - [`OperandStack`] and [`Environment`]: per-context operand stack and
//!   lexical frame chain
//! - [`CodeUnit`] / [`Signal`]: executable units and the three-way
//!   control signal threaded through every execution call
//! - [`NamespaceTree`]: the shared global namespace, a hand-rolled
//!   multiway search tree keyed by `/`-delimited paths
//! - [`Runtime`] / [`ExecContext`]: the shared engine state and the
//!   per-thread execution bundle; [`spawn_thread`] runs a unit on a new
//!   OS thread
//! - [`NativeOp`] / [`NativeModule`]: the extension interface, dispatched
//!   identically to built-ins

pub mod errors;
pub mod exec;
mod cache;
mod code;
mod environment;
mod format;
mod introspect;
mod modules;
mod operators;
mod print_handler;
mod registry;
mod runtime;
mod stack;
mod tree;
mod value;

#[cfg(test)]
mod tests;

pub use cache::{Cache, CacheStats};
pub use code::{CodeBuilder, CodeUnit, OpKind, Operation, Signal};
pub use environment::{Environment, Frame};
pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use introspect::{dump_cache, dump_stack, dump_tree, dump_tree_stats};
pub use modules::{StringModule, ThreadModule};
pub use operators::{evaluate_arith, evaluate_compare, ArithOp, CompareOp};
pub use print_handler::PrintHandler;
pub use registry::{NativeModule, NativeOp, Registrar};
pub use runtime::{spawn_thread, ExecContext, Runtime, SharedRuntime};
pub use stack::OperandStack;
pub use tree::{NamespaceTree, Slot, TreeStats, FANOUT};
pub use value::{Heap, Value};

// Re-export the leaf types evaluation is expressed in.
pub use flint_ir::{Name, SourcePos};
