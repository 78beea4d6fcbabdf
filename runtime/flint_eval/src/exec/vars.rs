//! Variable, reference and namespace operations.

use flint_ir::{Name, SourcePos};

use crate::code::Signal;
use crate::errors::{
    assignment_value_not_found, assignment_variable_not_found, duplicate_variable,
    name_too_long, to_name_error, value_error, EvalError, EvalResult,
};
use crate::runtime::ExecContext;
use crate::value::Value;

/// `Declare`: pop a name and declare it in the innermost frame, or - for
/// an absolute path - in the global tree.
pub(super) fn declare(cx: &mut ExecContext, pos: Option<&SourcePos>) -> EvalResult<Signal> {
    let operand = cx.stack.pop(pos)?;
    let name = cx.name_of(&operand, pos)?;
    if !cx.declare(&name) {
        return Err(duplicate_variable(name.as_str()).at(pos));
    }
    Ok(Signal::Continue)
}

/// `Assign`: pop a value and a name; store the resolved value in the
/// nearest declaration of the name.
pub(super) fn assign(cx: &mut ExecContext, pos: Option<&SourcePos>) -> EvalResult<Signal> {
    let value_operand = cx.stack.pop(pos)?;
    let name_operand = cx.stack.pop(pos)?;

    let name = name_operand
        .as_name()
        .map_err(|_| assignment_variable_not_found().at(pos))?;
    if !cx.is_defined(&name) {
        return Err(assignment_variable_not_found().at(pos));
    }

    // The value operand goes through one level of name resolution, so
    // `x y =` copies y's current value rather than aliasing the name.
    let value = cx
        .resolved(&value_operand, pos)
        .map_err(|_| assignment_value_not_found().at(pos))?;

    cx.assign(&name, value);
    cx.cache.reclaim(value_operand);
    Ok(Signal::Continue)
}

/// `RefAssign`: pop a value and a name; wrap the raw value in an indirect
/// reference and store it. The value operand is *not* resolved - a name
/// operand yields a reference to that name.
pub(super) fn ref_assign(cx: &mut ExecContext, pos: Option<&SourcePos>) -> EvalResult<Signal> {
    let value_operand = cx.stack.pop(pos)?;
    let name_operand = cx.stack.pop(pos)?;

    let failed = || EvalError::custom("pointer assignment error").at(pos);
    let name = name_operand.as_name().map_err(|_| failed())?;
    if !cx.is_defined(&name) {
        return Err(failed());
    }

    cx.assign(&name, Value::reference(value_operand));
    Ok(Signal::Continue)
}

/// `Deref`: pop a reference (possibly through a name) and push the value
/// it holds.
pub(super) fn deref(cx: &mut ExecContext, pos: Option<&SourcePos>) -> EvalResult<Signal> {
    let operand = cx.stack.pop(pos)?;
    let reference = cx.reference_of(&operand, pos)?;
    cx.stack.push((*reference).clone());
    Ok(Signal::Continue)
}

/// `Inc` / `Dec`: mutate a named numeric variable in place.
pub(super) fn increment(
    cx: &mut ExecContext,
    delta: i64,
    pos: Option<&SourcePos>,
) -> EvalResult<Signal> {
    let operand = cx.stack.pop(pos)?;
    let name = cx.name_of(&operand, pos)?;
    let current = cx.lookup_value(&name, pos)?;

    let next = match current {
        Value::Int(n) => cx.cache.acquire_int(n.wrapping_add(delta)),
        #[allow(clippy::cast_precision_loss)]
        Value::Float(f) => cx.cache.acquire_float(f + delta as f64),
        _ => return Err(crate::errors::type_mismatch("number").at(pos)),
    };

    cx.assign(&name, next);
    Ok(Signal::Continue)
}

/// `Defined`: 1 when the name operand is declared; non-name operands
/// count as defined.
pub(super) fn defined(cx: &mut ExecContext, pos: Option<&SourcePos>) -> EvalResult<Signal> {
    let operand = cx.stack.pop(pos)?;
    let result = match &operand {
        Value::Name(name) => cx.is_defined(name),
        _ => true,
    };
    let value = cx.cache.acquire_int(i64::from(result));
    cx.stack.push(value);
    Ok(Signal::Continue)
}

/// `Initialised`: 1 when the name operand is declared and holds a value;
/// non-name operands count as initialised.
pub(super) fn initialised(cx: &mut ExecContext, pos: Option<&SourcePos>) -> EvalResult<Signal> {
    let operand = cx.stack.pop(pos)?;
    let result = match &operand {
        Value::Name(name) => cx.is_initialised(name),
        _ => true,
    };
    let value = cx.cache.acquire_int(i64::from(result));
    cx.stack.push(value);
    Ok(Signal::Continue)
}

/// `ValueOf`: replace a name operand with the value it is bound to; any
/// other operand passes through unchanged.
pub(super) fn value_of(cx: &mut ExecContext, pos: Option<&SourcePos>) -> EvalResult<Signal> {
    let operand = cx.stack.pop(pos)?;
    let value = match &operand {
        Value::Name(name) => cx
            .lookup_value(name, pos)
            .map_err(|_| value_error().at(pos))?,
        _ => operand,
    };
    cx.stack.push(value);
    Ok(Signal::Continue)
}

/// `ToName`: render a number or text operand (resolving one level of name
/// indirection) as a name.
pub(super) fn to_name(cx: &mut ExecContext, pos: Option<&SourcePos>) -> EvalResult<Signal> {
    let operand = cx.stack.pop(pos)?;
    let source = match &operand {
        Value::Name(name) => cx
            .lookup_value(name, pos)
            .map_err(|_| to_name_error().at(pos))?,
        other => other.clone(),
    };

    let rendered = match &source {
        Value::Int(n) => format!("{n}"),
        Value::Float(f) => format!("{f:.3}"),
        Value::Text(t) => t.as_str().to_owned(),
        _ => return Err(to_name_error().at(pos)),
    };

    let name = Name::new(rendered).map_err(|_| name_too_long().at(pos))?;
    cx.stack.push(Value::name(name));
    cx.cache.reclaim(source);
    Ok(Signal::Continue)
}

/// `PathJoin`: pop a namespace element and an index element and push the
/// absolute name `/<index>/<namespace>`.
pub(super) fn path_join(cx: &mut ExecContext, pos: Option<&SourcePos>) -> EvalResult<Signal> {
    let ns_operand = cx.stack.pop(pos)?;
    let index_operand = cx.stack.pop(pos)?;

    let ns = path_element(&ns_operand, "unknown namespace name", pos)?;
    let index = path_element(&index_operand, "unknown index name", pos)?;

    let joined = Name::join_path(&index, &ns).map_err(|_| name_too_long().at(pos))?;
    cx.stack.push(Value::name(joined));
    cx.cache.reclaim(ns_operand);
    cx.cache.reclaim(index_operand);
    Ok(Signal::Continue)
}

/// Render one path element: a name is spliced verbatim, numbers and text
/// render naturally, anything else fails with `message`.
fn path_element(
    operand: &Value,
    message: &'static str,
    pos: Option<&SourcePos>,
) -> EvalResult<String> {
    match operand {
        Value::Name(n) => Ok(n.as_str().to_owned()),
        Value::Int(n) => Ok(format!("{n}")),
        Value::Float(f) => Ok(format!("{f:.3}")),
        Value::Text(t) => Ok(t.as_str().to_owned()),
        _ => Err(EvalError::custom(message).at(pos)),
    }
}
