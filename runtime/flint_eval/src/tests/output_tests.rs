//! Print, printf, sprintf and the introspection operations.

use super::{context, name, unit};
use crate::{EvalErrorKind, OpKind, Value};

fn output(cx: &crate::ExecContext) -> String {
    cx.runtime().print_handler().output()
}

#[test]
fn test_print_number_and_text() {
    let mut cx = context();
    let main = unit(vec![
        OpKind::Push(Value::int(42)),
        OpKind::Print,
        OpKind::Push(Value::text(" and ")),
        OpKind::Print,
        OpKind::Push(Value::float(1.5)),
        OpKind::PrintLn,
    ]);

    cx.run(&main).unwrap();
    assert_eq!(output(&cx), "42 and 1.500\n");
}

#[test]
fn test_print_resolves_names() {
    let mut cx = context();
    cx.declare(&name("/msg/p"));
    cx.assign(&name("/msg/p"), Value::text("hello"));

    let main = unit(vec![
        OpKind::Push(Value::name(name("/msg/p"))),
        OpKind::PrintLn,
    ]);
    cx.run(&main).unwrap();
    assert_eq!(output(&cx), "hello\n");
}

#[test]
fn test_print_rejects_code() {
    let mut cx = context();
    let main = unit(vec![
        OpKind::Push(Value::code(unit(vec![]))),
        OpKind::Print,
    ]);

    let err = cx.run(&main).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::PrintError);
}

#[test]
fn test_printf_consumes_operands_in_directive_order() {
    let mut cx = context();
    // Operands are pushed so the first directive gets the top of stack.
    let main = unit(vec![
        OpKind::Push(Value::text("world")),
        OpKind::Push(Value::int(7)),
        OpKind::Push(Value::text("n=%d s=%s\\n")),
        OpKind::Printf,
    ]);

    cx.run(&main).unwrap();
    assert_eq!(output(&cx), "n=7 s=world\n");
}

#[test]
fn test_sprintf_pushes_text() {
    let mut cx = context();
    let main = unit(vec![
        OpKind::Push(Value::float(3.14159)),
        OpKind::Push(Value::text("pi=%.2f")),
        OpKind::Sprintf,
    ]);

    cx.run(&main).unwrap();
    let result = cx.stack.pop(None).unwrap();
    assert_eq!(result.as_text().unwrap().as_str(), "pi=3.14");
    // Nothing was written to the handler.
    assert_eq!(output(&cx), "");
}

#[test]
fn test_printf_malformed_format() {
    let mut cx = context();
    let main = unit(vec![
        OpKind::Push(Value::text("%")),
        OpKind::Printf,
    ]);

    let err = cx.run(&main).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::FormatError { .. }));
}

#[test]
fn test_dump_stack_top_first_through_op() {
    let mut cx = context();
    let main = unit(vec![
        OpKind::Push(Value::int(1)),
        OpKind::Push(Value::int(2)),
        OpKind::DumpStack,
    ]);

    cx.run(&main).unwrap();
    assert_eq!(output(&cx), "0: 2\n1: 1\n");
}

#[test]
fn test_dump_tree_through_op() {
    let mut cx = context();
    cx.declare(&name("/a/dump"));
    cx.assign(&name("/a/dump"), Value::int(5));

    let main = unit(vec![OpKind::DumpTree]);
    cx.run(&main).unwrap();
    assert_eq!(output(&cx), "/a/dump: 5\n");
}

#[test]
fn test_dump_cache_through_op() {
    let mut cx = context();
    let main = unit(vec![
        OpKind::Push(Value::int(1)),
        OpKind::Push(Value::text("x=%d")),
        OpKind::Sprintf,
        OpKind::Pop,
        OpKind::DumpCache,
    ]);

    cx.run(&main).unwrap();
    assert!(output(&cx).starts_with("Cache:"));
}

#[test]
fn test_tree_stats_through_op() {
    let mut cx = context();
    cx.declare(&name("/a/ts"));

    let main = unit(vec![OpKind::TreeStats]);
    cx.run(&main).unwrap();
    assert_eq!(output(&cx), "Namespace: depth 1, nodes 1, entries 1\n");
}
