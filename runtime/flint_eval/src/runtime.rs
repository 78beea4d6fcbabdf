//! The runtime object and per-thread execution contexts.
//!
//! A [`Runtime`] bundles everything execution threads share: the global
//! namespace tree, the print handler, and module-load bookkeeping. It is an
//! explicit value, not an ambient global, so a process can host several
//! independent runtimes (and tests never bleed state into each other).
//!
//! An [`ExecContext`] bundles everything one thread of control owns
//! privately: the operand stack, the frame chain and the recycling cache,
//! plus a shared handle to the runtime. Spawning a script thread copies
//! one argument value into a fresh context and runs one unit on a new OS
//! thread.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::thread::JoinHandle;

use flint_diagnostic::TerminalEmitter;
use flint_ir::{Name, SourcePos};

use crate::cache::Cache;
use crate::code::{CodeUnit, Signal};
use crate::environment::Environment;
use crate::errors::{
    type_mismatch, unbound_variable, uninitialised_variable, EvalResult,
};
use crate::exec;
use crate::print_handler::PrintHandler;
use crate::registry::{NativeModule, Registrar};
use crate::stack::OperandStack;
use crate::tree::NamespaceTree;
use crate::value::{Heap, Value};

/// Stack size for spawned script threads.
const THREAD_STACK_SIZE: usize = 1024 * 1024;

/// State shared by every execution context of one engine instance.
#[derive(Debug)]
pub struct Runtime {
    globals: NamespaceTree,
    print: PrintHandler,
}

impl Runtime {
    /// A runtime printing to stdout.
    pub fn new() -> Self {
        Runtime {
            globals: NamespaceTree::new(),
            print: PrintHandler::Stdout,
        }
    }

    /// A runtime with a specific print handler (tests use
    /// [`PrintHandler::buffer`]).
    pub fn with_print_handler(print: PrintHandler) -> Self {
        Runtime {
            globals: NamespaceTree::new(),
            print,
        }
    }

    /// The global namespace tree.
    pub fn globals(&self) -> &NamespaceTree {
        &self.globals
    }

    /// The print handler.
    pub fn print_handler(&self) -> &PrintHandler {
        &self.print
    }

    /// Load a native module, idempotently.
    ///
    /// The module's marker key (`/loaded/<name>`) is checked first; a
    /// repeat load registers nothing and returns `false`. Two threads
    /// racing the first load can both enter registration, but duplicate
    /// bindings are rejected key-by-key, so the tree still ends up with
    /// exactly one entry per registered path.
    pub fn load_module(&self, module: &dyn NativeModule) -> bool {
        let marker = format!("/loaded/{}", module.name());
        if self.globals.find(&marker).is_some() {
            tracing::debug!(module = module.name(), "module already loaded");
            return false;
        }

        let mut reg = Registrar::new(&self.globals);
        module.register(&mut reg);
        self.globals.insert(&marker, Some(Value::int(1)));
        tracing::debug!(
            module = module.name(),
            bindings = reg.registered(),
            "module loaded"
        );
        true
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe shared handle to a [`Runtime`].
pub struct SharedRuntime(Arc<Runtime>);

impl SharedRuntime {
    /// Wrap a runtime for sharing.
    pub fn new(runtime: Runtime) -> Self {
        SharedRuntime(Arc::new(runtime))
    }
}

impl Clone for SharedRuntime {
    fn clone(&self) -> Self {
        SharedRuntime(Arc::clone(&self.0))
    }
}

impl Deref for SharedRuntime {
    type Target = Runtime;

    fn deref(&self) -> &Runtime {
        &self.0
    }
}

impl Default for SharedRuntime {
    fn default() -> Self {
        SharedRuntime::new(Runtime::new())
    }
}

impl fmt::Debug for SharedRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedRuntime({:?})", &*self.0)
    }
}

/// Per-thread execution state: operand stack, frame chain, recycling
/// cache, shared runtime handle.
#[derive(Debug)]
pub struct ExecContext {
    /// The operand stack.
    pub stack: OperandStack,
    /// The lexical frame chain.
    pub env: Environment,
    /// The recycling allocator.
    pub cache: Cache,
    runtime: SharedRuntime,
}

impl ExecContext {
    /// A fresh context against `runtime`.
    pub fn new(runtime: SharedRuntime) -> Self {
        ExecContext {
            stack: OperandStack::new(),
            env: Environment::new(),
            cache: Cache::new(),
            runtime,
        }
    }

    /// The shared runtime.
    pub fn runtime(&self) -> &SharedRuntime {
        &self.runtime
    }

    /// Run an executable unit against this context.
    pub fn run(&mut self, unit: &CodeUnit) -> EvalResult<Signal> {
        exec::run_unit(unit, self)
    }

    // Name resolution

    /// The binding for `name`: `None` = not declared, `Some(None)` =
    /// declared but uninitialized. Absolute paths hit the global tree,
    /// relative names walk the frame chain nearest-first. Local names are
    /// never auto-promoted to the tree.
    pub fn get_binding(&self, name: &Name) -> Option<Option<Value>> {
        if name.is_absolute() {
            self.runtime
                .globals()
                .find(name.as_str())
                .map(|slot| slot.read().clone())
        } else {
            self.env.get(name)
        }
    }

    /// The value bound to `name`, or the unbound / uninitialized error.
    pub fn lookup_value(&self, name: &Name, pos: Option<&SourcePos>) -> EvalResult {
        match self.get_binding(name) {
            None => Err(unbound_variable(name.as_str()).at(pos)),
            Some(None) => Err(uninitialised_variable(name.as_str()).at(pos)),
            Some(Some(value)) => Ok(value),
        }
    }

    /// Whether `name` is declared anywhere visible.
    pub fn is_defined(&self, name: &Name) -> bool {
        self.get_binding(name).is_some()
    }

    /// Whether `name` is declared and holds a value.
    pub fn is_initialised(&self, name: &Name) -> bool {
        matches!(self.get_binding(name), Some(Some(_)))
    }

    /// Declare `name`: absolute paths insert an uninitialized entry into
    /// the global tree, relative names go into the innermost frame.
    /// Duplicates (same scope / same key) return `false`.
    pub fn declare(&mut self, name: &Name) -> bool {
        if name.is_absolute() {
            self.runtime.globals().insert(name.as_str(), None)
        } else {
            self.env.declare(name)
        }
    }

    /// Assign to the nearest declaration of `name`; `false` when nothing
    /// declares it. Global writes go through the entry's own lock.
    pub fn assign(&mut self, name: &Name, value: Value) -> bool {
        if name.is_absolute() {
            match self.runtime.globals().find(name.as_str()) {
                Some(slot) => {
                    *slot.write() = Some(value);
                    true
                }
                None => false,
            }
        } else {
            self.env.assign(name, value)
        }
    }

    // Resolution + narrowing, the surface native operations use

    /// Resolve one level of name indirection: a `Name` operand becomes the
    /// value its variable holds; anything else passes through unchanged.
    pub fn resolved(&self, operand: &Value, pos: Option<&SourcePos>) -> EvalResult {
        match operand {
            Value::Name(name) => self.lookup_value(name, pos),
            other => Ok(other.clone()),
        }
    }

    /// Resolve and narrow to a number (`Int` or `Float` value).
    pub fn number_of(&self, operand: &Value, pos: Option<&SourcePos>) -> EvalResult {
        let value = self.resolved(operand, pos)?;
        if value.is_number() {
            Ok(value)
        } else {
            Err(type_mismatch("number").at(pos))
        }
    }

    /// Resolve and narrow to a text handle.
    pub fn text_of(
        &self,
        operand: &Value,
        pos: Option<&SourcePos>,
    ) -> EvalResult<Heap<String>> {
        self.resolved(operand, pos)?.as_text().map_err(|e| e.at(pos))
    }

    /// Resolve and narrow to a code handle.
    pub fn code_of(
        &self,
        operand: &Value,
        pos: Option<&SourcePos>,
    ) -> EvalResult<Heap<CodeUnit>> {
        self.resolved(operand, pos)?.as_code().map_err(|e| e.at(pos))
    }

    /// Resolve and narrow to an indirect-reference handle.
    pub fn reference_of(
        &self,
        operand: &Value,
        pos: Option<&SourcePos>,
    ) -> EvalResult<Heap<Value>> {
        self.resolved(operand, pos)?
            .as_reference()
            .map_err(|e| e.at(pos))
    }

    /// Narrow to a name. Names are not resolved through variables - a name
    /// operand *is* the name.
    pub fn name_of(&self, operand: &Value, pos: Option<&SourcePos>) -> EvalResult<Name> {
        operand.as_name().map_err(|e| e.at(pos))
    }
}

/// Run `unit` on a new OS thread with its own execution context.
///
/// `argument` is pushed onto the fresh context's stack before the unit
/// runs, so the unit sees exactly one operand. The engine does not track
/// or await the thread; the handle is returned for callers that want join
/// semantics. Errors escaping the unit are rendered to stderr and also
/// carried in the handle's result.
pub fn spawn_thread(
    runtime: SharedRuntime,
    unit: Heap<CodeUnit>,
    argument: Value,
) -> std::io::Result<JoinHandle<EvalResult<Signal>>> {
    tracing::debug!("spawning script thread");
    std::thread::Builder::new()
        .name("flint-thread".to_owned())
        .stack_size(THREAD_STACK_SIZE)
        .spawn(move || {
            let mut cx = ExecContext::new(runtime);
            cx.stack.push(argument);
            let result = cx.run(&unit);
            if let Err(error) = &result {
                TerminalEmitter::new().emit(&error.to_diagnostic());
            }
            result
        })
}
