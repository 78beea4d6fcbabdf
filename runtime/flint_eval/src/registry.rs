//! Native-module registration.
//!
//! Extensions contribute behavior by registering values and operations
//! under global-tree paths. A [`NativeOp`] is the single-method operation
//! interface: given an execution context, perform effects and return a
//! control signal - exactly the contract built-in operations run under, so
//! the dispatch loop treats both identically.
//!
//! Module loading is idempotent: each module's marker key is checked
//! before registration, so loading a module twice is a no-op.

use std::sync::Arc;

use crate::code::{CodeUnit, OpKind, Operation, Signal};
use crate::errors::EvalResult;
use crate::runtime::ExecContext;
use crate::tree::NamespaceTree;
use crate::value::Value;

/// An extension-provided operation.
///
/// Implementations pop their operands from the context's stack, perform
/// their effect, push any result, and return a [`Signal`]. Errors flow
/// through the ordinary [`EvalResult`] channel.
pub trait NativeOp: Send + Sync {
    /// Stable name for Debug output and tracing.
    fn name(&self) -> &'static str;

    /// Perform the operation against `cx`.
    fn run(&self, cx: &mut ExecContext) -> EvalResult<Signal>;
}

/// A loadable native module: a named bundle of registrations.
pub trait NativeModule {
    /// The module's name; `/loaded/<name>` is its idempotency marker.
    fn name(&self) -> &'static str;

    /// Register this module's bindings.
    fn register(&self, reg: &mut Registrar<'_>);
}

/// Collects a module's bindings into the global tree.
pub struct Registrar<'a> {
    tree: &'a NamespaceTree,
    registered: usize,
}

impl<'a> Registrar<'a> {
    pub(crate) fn new(tree: &'a NamespaceTree) -> Self {
        Registrar {
            tree,
            registered: 0,
        }
    }

    /// Bind a value under a global path.
    ///
    /// Returns `false` (and changes nothing) when the path is already
    /// taken - modules shipping overlapping paths keep the first binding.
    pub fn bind_value(&mut self, path: &str, value: Value) -> bool {
        let inserted = self.tree.insert(path, Some(value));
        if inserted {
            self.registered += 1;
        }
        inserted
    }

    /// Bind a native operation under a global path.
    ///
    /// The operation is wrapped in a single-operation executable unit, so
    /// scripts invoke it like any other code value.
    pub fn bind_op(&mut self, path: &str, op: Arc<dyn NativeOp>) -> bool {
        let unit = CodeUnit::new(vec![Operation::bare(OpKind::Native(op))]);
        self.bind_value(path, Value::code(unit))
    }

    /// Number of bindings this registrar has inserted.
    pub fn registered(&self) -> usize {
        self.registered
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct Nop;

    impl NativeOp for Nop {
        fn name(&self) -> &'static str {
            "nop"
        }

        fn run(&self, _cx: &mut ExecContext) -> EvalResult<Signal> {
            Ok(Signal::Continue)
        }
    }

    #[test]
    fn test_bind_value_rejects_duplicates() {
        let tree = NamespaceTree::new();
        let mut reg = Registrar::new(&tree);
        assert!(reg.bind_value("/a/mod", Value::int(1)));
        assert!(!reg.bind_value("/a/mod", Value::int(2)));
        assert_eq!(reg.registered(), 1);
    }

    #[test]
    fn test_bind_op_is_invocable_code() {
        let tree = NamespaceTree::new();
        let mut reg = Registrar::new(&tree);
        assert!(reg.bind_op("/nop/mod", Arc::new(Nop)));

        let slot = tree.find("/nop/mod").unwrap();
        let guard = slot.read();
        let unit = guard.as_ref().unwrap().as_code().unwrap();
        assert_eq!(unit.len(), 1);
    }
}
