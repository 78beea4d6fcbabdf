//! Thread primitives module.
//!
//! Registers `/create/thread`: pop a code operand and an argument value,
//! and run the code on a new OS thread whose fresh execution context
//! starts with just the argument on its stack. The thread is not awaited;
//! script-level join discipline (a semaphore, a flag in the global tree)
//! is up to the script.

use std::sync::Arc;

use crate::code::Signal;
use crate::errors::{EvalError, EvalResult};
use crate::registry::{NativeModule, NativeOp, Registrar};
use crate::runtime::{spawn_thread, ExecContext};

/// The `thread` module.
pub struct ThreadModule;

impl NativeModule for ThreadModule {
    fn name(&self) -> &'static str {
        "thread"
    }

    fn register(&self, reg: &mut Registrar<'_>) {
        reg.bind_op("/create/thread", Arc::new(Create));
    }
}

/// Pop code and argument, spawn a detached script thread.
struct Create;

impl NativeOp for Create {
    fn name(&self) -> &'static str {
        "thread.create"
    }

    fn run(&self, cx: &mut ExecContext) -> EvalResult<Signal> {
        let code_operand = cx.stack.pop(None)?;
        let unit = cx.code_of(&code_operand, None)?;
        let argument_operand = cx.stack.pop(None)?;
        let argument = cx.resolved(&argument_operand, None)?;

        let handle = spawn_thread(cx.runtime().clone(), unit, argument)
            .map_err(|e| EvalError::custom(format!("can't create thread: {e}")))?;
        // Fire and forget; the spawning context does not track completion.
        drop(handle);

        cx.cache.reclaim(argument_operand);
        Ok(Signal::Continue)
    }
}
