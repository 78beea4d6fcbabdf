//! String operations module.
//!
//! Registers under `/…/string`:
//!
//! - `/concat/string` - pop two text operands, push their concatenation
//! - `/length/string` - pop a text operand, push its byte length

use std::sync::Arc;

use crate::code::Signal;
use crate::errors::EvalResult;
use crate::registry::{NativeModule, NativeOp, Registrar};
use crate::runtime::ExecContext;

/// The `string` module.
pub struct StringModule;

impl NativeModule for StringModule {
    fn name(&self) -> &'static str {
        "string"
    }

    fn register(&self, reg: &mut Registrar<'_>) {
        reg.bind_op("/concat/string", Arc::new(Concat));
        reg.bind_op("/length/string", Arc::new(Length));
    }
}

/// Pop `b` then `a`, push the text `a + b`.
struct Concat;

impl NativeOp for Concat {
    fn name(&self) -> &'static str {
        "string.concat"
    }

    fn run(&self, cx: &mut ExecContext) -> EvalResult<Signal> {
        let right_operand = cx.stack.pop(None)?;
        let left_operand = cx.stack.pop(None)?;
        let right = cx.text_of(&right_operand, None)?;
        let left = cx.text_of(&left_operand, None)?;

        let mut joined = String::with_capacity(left.len() + right.len());
        joined.push_str(&left);
        joined.push_str(&right);
        drop((left, right));

        let result = cx.cache.acquire_text(&joined);
        cx.stack.push(result);
        cx.cache.reclaim(left_operand);
        cx.cache.reclaim(right_operand);
        Ok(Signal::Continue)
    }
}

/// Pop a text operand, push its byte length.
struct Length;

impl NativeOp for Length {
    fn name(&self) -> &'static str {
        "string.length"
    }

    fn run(&self, cx: &mut ExecContext) -> EvalResult<Signal> {
        let operand = cx.stack.pop(None)?;
        let text = cx.text_of(&operand, None)?;
        #[allow(clippy::cast_possible_wrap)]
        let length = cx.cache.acquire_int(text.len() as i64);
        cx.stack.push(length);
        cx.cache.reclaim(operand);
        Ok(Signal::Continue)
    }
}
