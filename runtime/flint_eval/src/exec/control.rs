//! Control-flow operations: loops, branches, short-circuit logic.

use flint_ir::SourcePos;

use crate::code::Signal;
use crate::errors::EvalResult;
use crate::exec::run_unit;
use crate::runtime::ExecContext;
use crate::value::Value;

/// `cond body while`.
///
/// The condition unit is re-evaluated before every iteration, including
/// the final falsifying one; its control signal is discarded. A `Break`
/// from the body terminates this loop and converts to `Continue`; a
/// `Return` propagates outward.
pub(super) fn run_while(cx: &mut ExecContext, pos: Option<&SourcePos>) -> EvalResult<Signal> {
    let body_operand = cx.stack.pop(pos)?;
    let cond_operand = cx.stack.pop(pos)?;
    let cond_unit = cx.code_of(&cond_operand, pos)?;
    let body_unit = cx.code_of(&body_operand, pos)?;

    loop {
        run_unit(&cond_unit, cx)?;
        let cond_result = cx.stack.pop(pos)?;
        let cond_number = cx.number_of(&cond_result, pos)?;
        let go = cond_number.truthy().map_err(|e| e.at(pos))?;
        cx.cache.reclaim(cond_result);
        if !go {
            return Ok(Signal::Continue);
        }

        match run_unit(&body_unit, cx)? {
            Signal::Continue => {}
            Signal::Break => return Ok(Signal::Continue),
            Signal::Return => return Ok(Signal::Return),
        }
    }
}

/// `cond then else if`.
pub(super) fn run_if(cx: &mut ExecContext, pos: Option<&SourcePos>) -> EvalResult<Signal> {
    let else_operand = cx.stack.pop(pos)?;
    let then_operand = cx.stack.pop(pos)?;
    let cond_operand = cx.stack.pop(pos)?;
    let then_unit = cx.code_of(&then_operand, pos)?;
    let else_unit = cx.code_of(&else_operand, pos)?;

    let cond = cx.number_of(&cond_operand, pos)?;
    if cond.truthy().map_err(|e| e.at(pos))? {
        run_unit(&then_unit, cx)
    } else {
        run_unit(&else_unit, cx)
    }
}

/// `cond then ifthen`.
pub(super) fn run_if_then(cx: &mut ExecContext, pos: Option<&SourcePos>) -> EvalResult<Signal> {
    let then_operand = cx.stack.pop(pos)?;
    let cond_operand = cx.stack.pop(pos)?;
    let then_unit = cx.code_of(&then_operand, pos)?;

    let cond = cx.number_of(&cond_operand, pos)?;
    if cond.truthy().map_err(|e| e.at(pos))? {
        run_unit(&then_unit, cx)
    } else {
        Ok(Signal::Continue)
    }
}

/// Short-circuit `and`: the right operand is only evaluated when the left
/// is true.
pub(super) fn run_and(cx: &mut ExecContext, pos: Option<&SourcePos>) -> EvalResult<Signal> {
    let right = cx.stack.pop(pos)?;
    let left = cx.stack.pop(pos)?;

    let left_number = cx.number_of(&left, pos)?;
    let mut truth = left_number.truthy().map_err(|e| e.at(pos))?;
    let mut signal = Signal::Continue;

    if truth {
        let (right_truth, right_signal) = operand_truth(cx, &right, pos)?;
        truth = right_truth;
        signal = right_signal;
    }

    cx.stack.push(Value::bool(truth));
    Ok(signal)
}

/// Short-circuit `or`: the right operand is only evaluated when the left
/// is false.
pub(super) fn run_or(cx: &mut ExecContext, pos: Option<&SourcePos>) -> EvalResult<Signal> {
    let right = cx.stack.pop(pos)?;
    let left = cx.stack.pop(pos)?;

    let left_number = cx.number_of(&left, pos)?;
    let mut truth = left_number.truthy().map_err(|e| e.at(pos))?;
    let mut signal = Signal::Continue;

    if !truth {
        let (right_truth, right_signal) = operand_truth(cx, &right, pos)?;
        truth = right_truth;
        signal = right_signal;
    }

    cx.stack.push(Value::bool(truth));
    Ok(signal)
}

/// Logical `not`.
pub(super) fn run_not(cx: &mut ExecContext, pos: Option<&SourcePos>) -> EvalResult<Signal> {
    let operand = cx.stack.pop(pos)?;
    let number = cx.number_of(&operand, pos)?;
    let truth = number.truthy().map_err(|e| e.at(pos))?;
    cx.stack.push(Value::bool(!truth));
    Ok(Signal::Continue)
}

/// Truth value of a short-circuit right operand.
///
/// A code operand is evaluated lazily: the unit runs, its result is popped
/// as the truth value, and its control signal propagates to the enclosing
/// sequence. Anything else is taken as a number directly.
fn operand_truth(
    cx: &mut ExecContext,
    operand: &Value,
    pos: Option<&SourcePos>,
) -> EvalResult<(bool, Signal)> {
    let resolved = cx.resolved(operand, pos)?;
    if let Value::Code(unit) = &resolved {
        let signal = run_unit(unit, cx)?;
        let result = cx.stack.pop(pos)?;
        let number = cx.number_of(&result, pos)?;
        let truth = number.truthy().map_err(|e| e.at(pos))?;
        cx.cache.reclaim(result);
        Ok((truth, signal))
    } else {
        let number = cx.number_of(&resolved, pos)?;
        Ok((number.truthy().map_err(|e| e.at(pos))?, Signal::Continue))
    }
}
