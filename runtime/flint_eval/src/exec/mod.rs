//! Executable-unit evaluation.
//!
//! [`run_unit`] drives an operation sequence against an execution context;
//! [`run_op`] is the single dispatch point for every operation kind,
//! built-in or extension-provided. Control-flow operations live in
//! [`control`], variable and namespace operations in [`vars`].

mod control;
mod vars;

use flint_ir::SourcePos;
use flint_stack::ensure_sufficient_stack;

use crate::code::{CodeUnit, OpKind, Operation, Signal};
use crate::errors::{print_error, unknown_operands, EvalResult};
use crate::format;
use crate::introspect;
use crate::operators::{self, ArithOp, CompareOp};
use crate::runtime::ExecContext;
use crate::value::Value;

/// Execute a unit: frame bracketing, sequence execution, signal
/// absorption.
///
/// If the unit declares variables, a frame is pushed first and popped on
/// every exit path (normal stop, signal, error). The first operation
/// yielding a non-`Continue` signal stops the sequence; a `Return` signal
/// is absorbed into `Continue` when the unit is a function boundary, so
/// `return` escapes exactly as far as the nearest function marker.
pub fn run_unit(unit: &CodeUnit, cx: &mut ExecContext) -> EvalResult<Signal> {
    ensure_sufficient_stack(|| {
        let framed = unit.introduces_frame();
        if framed {
            cx.env.push_frame();
        }

        let result = run_sequence(unit, cx);

        if framed {
            cx.env.pop_frame();
        }

        let mut signal = result?;
        if signal == Signal::Return && unit.is_function() {
            signal = Signal::Continue;
        }
        Ok(signal)
    })
}

fn run_sequence(unit: &CodeUnit, cx: &mut ExecContext) -> EvalResult<Signal> {
    for op in unit.ops() {
        let signal = run_op(op, cx)?;
        if signal != Signal::Continue {
            return Ok(signal);
        }
    }
    Ok(Signal::Continue)
}

/// Dispatch one operation.
pub fn run_op(op: &Operation, cx: &mut ExecContext) -> EvalResult<Signal> {
    let pos = op.pos.as_ref();
    match &op.kind {
        // Stack manipulation
        OpKind::Push(value) => {
            cx.stack.push(value.clone());
            Ok(Signal::Continue)
        }
        OpKind::Pop => {
            let value = cx.stack.pop(pos)?;
            cx.cache.reclaim(value);
            Ok(Signal::Continue)
        }
        OpKind::Swap => {
            let a = cx.stack.pop(pos)?;
            let b = cx.stack.pop(pos)?;
            cx.stack.push(a);
            cx.stack.push(b);
            Ok(Signal::Continue)
        }
        OpKind::Dup => {
            let value = cx.stack.pop(pos)?;
            cx.stack.push(value.clone());
            cx.stack.push(value);
            Ok(Signal::Continue)
        }

        // Arithmetic
        OpKind::Add => add(cx, pos),
        OpKind::Sub => arith(cx, ArithOp::Sub, pos),
        OpKind::Mul => arith(cx, ArithOp::Mul, pos),
        OpKind::Div => arith(cx, ArithOp::Div, pos),
        OpKind::Mod => arith(cx, ArithOp::Mod, pos),
        OpKind::BitAnd => arith(cx, ArithOp::BitAnd, pos),
        OpKind::BitOr => arith(cx, ArithOp::BitOr, pos),
        OpKind::BitXor => arith(cx, ArithOp::BitXor, pos),
        OpKind::Shl => arith(cx, ArithOp::Shl, pos),
        OpKind::Shr => arith(cx, ArithOp::Shr, pos),
        OpKind::BitNot => {
            let operand = cx.stack.pop(pos)?;
            let number = cx.number_of(&operand, pos)?;
            let result = operators::evaluate_bit_not(&number).map_err(|e| e.at(pos))?;
            cx.stack.push(result);
            Ok(Signal::Continue)
        }
        OpKind::ToInt => {
            let operand = cx.stack.pop(pos)?;
            let number = cx.number_of(&operand, pos)?;
            let int = number.as_int().map_err(|e| e.at(pos))?;
            let result = cx.cache.acquire_int(int);
            cx.stack.push(result);
            Ok(Signal::Continue)
        }
        OpKind::ToFloat => {
            let operand = cx.stack.pop(pos)?;
            let number = cx.number_of(&operand, pos)?;
            let float = number.as_float().map_err(|e| e.at(pos))?;
            let result = cx.cache.acquire_float(float);
            cx.stack.push(result);
            Ok(Signal::Continue)
        }
        OpKind::Inc => vars::increment(cx, 1, pos),
        OpKind::Dec => vars::increment(cx, -1, pos),

        // Comparison
        OpKind::Lt => compare(cx, CompareOp::Lt, pos),
        OpKind::Le => compare(cx, CompareOp::Le, pos),
        OpKind::Eq => compare(cx, CompareOp::Eq, pos),
        OpKind::Ne => compare(cx, CompareOp::Ne, pos),
        OpKind::Ge => compare(cx, CompareOp::Ge, pos),
        OpKind::Gt => compare(cx, CompareOp::Gt, pos),

        // Logic
        OpKind::And => control::run_and(cx, pos),
        OpKind::Or => control::run_or(cx, pos),
        OpKind::Not => control::run_not(cx, pos),

        // Branching and loops
        OpKind::If => control::run_if(cx, pos),
        OpKind::IfThen => control::run_if_then(cx, pos),
        OpKind::While => control::run_while(cx, pos),

        // Variables
        OpKind::Declare => vars::declare(cx, pos),
        OpKind::Assign => vars::assign(cx, pos),
        OpKind::RefAssign => vars::ref_assign(cx, pos),
        OpKind::Deref => vars::deref(cx, pos),
        OpKind::Defined => vars::defined(cx, pos),
        OpKind::Initialised => vars::initialised(cx, pos),

        // Conversions
        OpKind::ValueOf => vars::value_of(cx, pos),
        OpKind::ToName => vars::to_name(cx, pos),
        OpKind::PathJoin => vars::path_join(cx, pos),

        // Invocation
        OpKind::Execute => {
            let operand = cx.stack.pop(pos)?;
            let unit = cx.code_of(&operand, pos)?;
            run_unit(&unit, cx)
        }
        OpKind::Function => Ok(Signal::Continue),
        OpKind::Return => Ok(Signal::Return),
        OpKind::Break => Ok(Signal::Break),

        // Output
        OpKind::Print => print(cx, false, pos),
        OpKind::PrintLn => print(cx, true, pos),
        OpKind::Printf => printf(cx, false, pos),
        OpKind::Sprintf => printf(cx, true, pos),

        // Introspection
        OpKind::DumpStack => {
            introspect::dump_stack(cx, pos)?;
            Ok(Signal::Continue)
        }
        OpKind::DumpTree => {
            introspect::dump_tree(cx);
            Ok(Signal::Continue)
        }
        OpKind::DumpCache => {
            introspect::dump_cache(cx);
            Ok(Signal::Continue)
        }
        OpKind::TreeStats => {
            introspect::dump_tree_stats(cx);
            Ok(Signal::Continue)
        }

        // Extensions dispatch through the same interface as built-ins.
        OpKind::Native(native) => native.run(cx).map_err(|e| e.at(pos)),
    }
}

/// Binary `+`: numeric addition or code-unit concatenation.
fn add(cx: &mut ExecContext, pos: Option<&SourcePos>) -> EvalResult<Signal> {
    let right = cx.stack.pop(pos)?;
    let left = cx.stack.pop(pos)?;
    let a = cx.resolved(&left, pos)?;
    let b = cx.resolved(&right, pos)?;

    let result = if a.is_number() && b.is_number() {
        operators::evaluate_arith(&a, &b, ArithOp::Add).map_err(|e| e.at(pos))?
    } else if let (Value::Code(first), Value::Code(second)) = (&a, &b) {
        Value::code(first.concat(second))
    } else {
        return Err(unknown_operands().at(pos));
    };

    cx.stack.push(result);
    cx.cache.reclaim(a);
    cx.cache.reclaim(b);
    Ok(Signal::Continue)
}

fn arith(cx: &mut ExecContext, op: ArithOp, pos: Option<&SourcePos>) -> EvalResult<Signal> {
    let right = cx.stack.pop(pos)?;
    let left = cx.stack.pop(pos)?;
    let a = cx.number_of(&left, pos)?;
    let b = cx.number_of(&right, pos)?;
    let result = operators::evaluate_arith(&a, &b, op).map_err(|e| e.at(pos))?;
    cx.stack.push(result);
    Ok(Signal::Continue)
}

fn compare(cx: &mut ExecContext, op: CompareOp, pos: Option<&SourcePos>) -> EvalResult<Signal> {
    let right = cx.stack.pop(pos)?;
    let left = cx.stack.pop(pos)?;
    let a = cx.number_of(&left, pos)?;
    let b = cx.number_of(&right, pos)?;
    let truth = operators::evaluate_compare(&a, &b, op).map_err(|e| e.at(pos))?;
    cx.stack.push(Value::bool(truth));
    Ok(Signal::Continue)
}

/// `print` / `println`: numbers and text only.
fn print(cx: &mut ExecContext, newline: bool, pos: Option<&SourcePos>) -> EvalResult<Signal> {
    let operand = cx.stack.pop(pos)?;
    let value = cx.resolved(&operand, pos)?;

    let rendered = match &value {
        Value::Int(n) => format!("{n}"),
        Value::Float(f) => format!("{f:.3}"),
        Value::Text(t) => t.as_str().to_owned(),
        _ => return Err(print_error().at(pos)),
    };

    let handler = cx.runtime().print_handler();
    if newline {
        handler.println(&rendered);
    } else {
        handler.print(&rendered);
    }

    cx.cache.reclaim(value);
    cx.cache.reclaim(operand);
    Ok(Signal::Continue)
}

/// `printf` / `sprintf`: pop the format string, consume one operand per
/// directive, then either write the result or push it as text.
fn printf(cx: &mut ExecContext, to_stack: bool, pos: Option<&SourcePos>) -> EvalResult<Signal> {
    let format_operand = cx.stack.pop(pos)?;
    let format_text = cx.text_of(&format_operand, pos)?;

    let rendered = format::render_format(cx, &format_text, pos)?;

    if to_stack {
        let value = cx.cache.acquire_text(&rendered);
        cx.stack.push(value);
    } else {
        cx.runtime().print_handler().print(&rendered);
    }

    cx.cache.reclaim(format_operand);
    Ok(Signal::Continue)
}
