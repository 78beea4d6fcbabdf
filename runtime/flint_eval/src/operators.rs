//! Numeric operator evaluation.
//!
//! Direct enum-based dispatch for the arithmetic, bitwise and comparison
//! operations. The numeric type set is fixed (`Int` / `Float`), so pattern
//! matching is preferred over anything dynamic; promotion follows the
//! engine rule that any float operand makes the operation a float
//! operation.
//!
//! Integer arithmetic wraps on overflow (two's complement); division and
//! modulo by zero are typed errors. Modulo, the bitwise family and shifts
//! are integer operations and truncate float operands.

use crate::errors::{division_by_zero, type_mismatch, EvalResult};
use crate::value::Value;

/// Binary arithmetic and bitwise operators.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

/// The six comparison orderings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Le,
    Eq,
    Ne,
    Ge,
    Gt,
}

/// Evaluate a binary numeric operation with int/float promotion.
///
/// Callers resolve name indirection first; non-numeric operands fail with
/// a number type mismatch.
pub fn evaluate_arith(left: &Value, right: &Value, op: ArithOp) -> EvalResult {
    match op {
        ArithOp::Add | ArithOp::Sub | ArithOp::Mul | ArithOp::Div => {
            if let (Value::Int(a), Value::Int(b)) = (left, right) {
                eval_int_arith(*a, *b, op)
            } else {
                eval_float_arith(left.as_float()?, right.as_float()?, op)
            }
        }
        // Integer-only operations truncate float operands.
        ArithOp::Mod => {
            let (a, b) = (left.as_int()?, right.as_int()?);
            if b == 0 {
                return Err(division_by_zero());
            }
            Ok(Value::int(a.wrapping_rem(b)))
        }
        ArithOp::BitAnd => Ok(Value::int(left.as_int()? & right.as_int()?)),
        ArithOp::BitOr => Ok(Value::int(left.as_int()? | right.as_int()?)),
        ArithOp::BitXor => Ok(Value::int(left.as_int()? ^ right.as_int()?)),
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        ArithOp::Shl => Ok(Value::int(
            left.as_int()?.wrapping_shl(right.as_int()? as u32),
        )),
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        ArithOp::Shr => Ok(Value::int(
            left.as_int()?.wrapping_shr(right.as_int()? as u32),
        )),
    }
}

fn eval_int_arith(a: i64, b: i64, op: ArithOp) -> EvalResult {
    match op {
        ArithOp::Add => Ok(Value::int(a.wrapping_add(b))),
        ArithOp::Sub => Ok(Value::int(a.wrapping_sub(b))),
        ArithOp::Mul => Ok(Value::int(a.wrapping_mul(b))),
        ArithOp::Div => {
            if b == 0 {
                Err(division_by_zero())
            } else {
                Ok(Value::int(a.wrapping_div(b)))
            }
        }
        _ => Err(type_mismatch("number")),
    }
}

fn eval_float_arith(a: f64, b: f64, op: ArithOp) -> EvalResult {
    match op {
        ArithOp::Add => Ok(Value::float(a + b)),
        ArithOp::Sub => Ok(Value::float(a - b)),
        ArithOp::Mul => Ok(Value::float(a * b)),
        ArithOp::Div => Ok(Value::float(a / b)),
        _ => Err(type_mismatch("number")),
    }
}

/// Evaluate a comparison with int/float promotion.
///
/// Int/Int compares exactly; any float operand compares IEEE 754 style
/// (`NaN` is unequal to everything, unordered comparisons are false).
pub fn evaluate_compare(left: &Value, right: &Value, op: CompareOp) -> EvalResult<bool> {
    use std::cmp::Ordering;

    if let (Value::Int(a), Value::Int(b)) = (left, right) {
        let ord = a.cmp(b);
        return Ok(match op {
            CompareOp::Lt => ord == Ordering::Less,
            CompareOp::Le => ord != Ordering::Greater,
            CompareOp::Eq => ord == Ordering::Equal,
            CompareOp::Ne => ord != Ordering::Equal,
            CompareOp::Ge => ord != Ordering::Less,
            CompareOp::Gt => ord == Ordering::Greater,
        });
    }

    let (a, b) = (left.as_float()?, right.as_float()?);
    let ord = a.partial_cmp(&b);
    Ok(match op {
        CompareOp::Lt => ord == Some(Ordering::Less),
        CompareOp::Le => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
        CompareOp::Eq => ord == Some(Ordering::Equal),
        CompareOp::Ne => ord != Some(Ordering::Equal),
        CompareOp::Ge => matches!(ord, Some(Ordering::Greater | Ordering::Equal)),
        CompareOp::Gt => ord == Some(Ordering::Greater),
    })
}

/// Bitwise not of an integer operand.
pub fn evaluate_bit_not(operand: &Value) -> EvalResult {
    Ok(Value::int(!operand.as_int()?))
}
