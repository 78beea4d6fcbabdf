//! Control-signal propagation: loops, function boundaries, top level.

use super::{context, name, unit};
use crate::{OpKind, Signal, Value};

/// Read an integer global after a run.
fn global_int(cx: &crate::ExecContext, path: &str) -> i64 {
    cx.lookup_value(&name(path), None).unwrap().as_int().unwrap()
}

#[test]
fn test_while_loop_counts() {
    let mut cx = context();
    cx.declare(&name("/i/w"));
    cx.assign(&name("/i/w"), Value::int(0));

    let cond = unit(vec![
        OpKind::Push(Value::name(name("/i/w"))),
        OpKind::Push(Value::int(3)),
        OpKind::Lt,
    ]);
    let body = unit(vec![OpKind::Push(Value::name(name("/i/w"))), OpKind::Inc]);
    let main = unit(vec![
        OpKind::Push(Value::code(cond)),
        OpKind::Push(Value::code(body)),
        OpKind::While,
    ]);

    assert_eq!(cx.run(&main).unwrap(), Signal::Continue);
    assert_eq!(global_int(&cx, "/i/w"), 3);
}

#[test]
fn test_break_terminates_only_innermost_loop() {
    let mut cx = context();
    cx.declare(&name("/i/b"));
    cx.assign(&name("/i/b"), Value::int(0));
    cx.declare(&name("/hits/b"));
    cx.assign(&name("/hits/b"), Value::int(0));

    // Inner loop would spin forever; the break stops it after one hit.
    let inner_cond = unit(vec![OpKind::Push(Value::int(1))]);
    let inner_body = unit(vec![
        OpKind::Push(Value::name(name("/hits/b"))),
        OpKind::Inc,
        OpKind::Break,
    ]);

    let outer_cond = unit(vec![
        OpKind::Push(Value::name(name("/i/b"))),
        OpKind::Push(Value::int(3)),
        OpKind::Lt,
    ]);
    let outer_body = unit(vec![
        OpKind::Push(Value::code(inner_cond)),
        OpKind::Push(Value::code(inner_body)),
        OpKind::While,
        OpKind::Push(Value::name(name("/i/b"))),
        OpKind::Inc,
    ]);
    let main = unit(vec![
        OpKind::Push(Value::code(outer_cond)),
        OpKind::Push(Value::code(outer_body)),
        OpKind::While,
    ]);

    // The outer loop completes all three iterations: each inner break is
    // absorbed at the inner loop.
    assert_eq!(cx.run(&main).unwrap(), Signal::Continue);
    assert_eq!(global_int(&cx, "/i/b"), 3);
    assert_eq!(global_int(&cx, "/hits/b"), 3);
}

#[test]
fn test_return_absorbed_at_function_boundary() {
    let mut cx = context();
    cx.declare(&name("/r/f"));
    cx.declare(&name("/after/f"));

    let function = unit(vec![
        OpKind::Function,
        OpKind::Push(Value::name(name("/r/f"))),
        OpKind::Push(Value::int(1)),
        OpKind::Assign,
        OpKind::Return,
        // Unreachable past the return.
        OpKind::Push(Value::name(name("/r/f"))),
        OpKind::Push(Value::int(2)),
        OpKind::Assign,
    ]);
    let main = unit(vec![
        OpKind::Push(Value::code(function)),
        OpKind::Execute,
        // Execution resumes here because the function absorbed the return.
        OpKind::Push(Value::name(name("/after/f"))),
        OpKind::Push(Value::int(9)),
        OpKind::Assign,
    ]);

    assert_eq!(cx.run(&main).unwrap(), Signal::Continue);
    assert_eq!(global_int(&cx, "/r/f"), 1);
    assert_eq!(global_int(&cx, "/after/f"), 9);
}

#[test]
fn test_return_escapes_non_function_units() {
    let mut cx = context();
    cx.declare(&name("/stopped/f"));

    // No function marker anywhere: the return reaches the top level and
    // the trailing assignment never runs.
    let inner = unit(vec![OpKind::Return]);
    let main = unit(vec![
        OpKind::Push(Value::code(inner)),
        OpKind::Execute,
        OpKind::Push(Value::name(name("/stopped/f"))),
        OpKind::Push(Value::int(1)),
        OpKind::Assign,
    ]);

    assert_eq!(cx.run(&main).unwrap(), Signal::Return);
    assert!(!cx.is_initialised(&name("/stopped/f")));
}

#[test]
fn test_unguarded_break_reaches_top_level() {
    let mut cx = context();
    let main = unit(vec![OpKind::Break]);
    assert_eq!(cx.run(&main).unwrap(), Signal::Break);
}

#[test]
fn test_condition_runs_once_per_iteration() {
    let mut cx = context();
    cx.declare(&name("/i/d"));
    cx.assign(&name("/i/d"), Value::int(0));
    cx.declare(&name("/evals/d"));
    cx.assign(&name("/evals/d"), Value::int(0));

    // The condition unit counts its own evaluations.
    let cond = unit(vec![
        OpKind::Push(Value::name(name("/evals/d"))),
        OpKind::Inc,
        OpKind::Push(Value::name(name("/i/d"))),
        OpKind::Push(Value::int(2)),
        OpKind::Lt,
    ]);
    let body = unit(vec![OpKind::Push(Value::name(name("/i/d"))), OpKind::Inc]);
    let main = unit(vec![
        OpKind::Push(Value::code(cond)),
        OpKind::Push(Value::code(body)),
        OpKind::While,
    ]);

    cx.run(&main).unwrap();
    // Two passing evaluations plus the final falsifying one.
    assert_eq!(global_int(&cx, "/i/d"), 2);
    assert_eq!(global_int(&cx, "/evals/d"), 3);
}

#[test]
fn test_break_skips_further_condition_evaluations() {
    let mut cx = context();
    cx.declare(&name("/evals/d2"));
    cx.assign(&name("/evals/d2"), Value::int(0));

    let cond = unit(vec![
        OpKind::Push(Value::name(name("/evals/d2"))),
        OpKind::Inc,
        OpKind::Push(Value::int(1)),
    ]);
    let body = unit(vec![OpKind::Break]);
    let main = unit(vec![
        OpKind::Push(Value::code(cond)),
        OpKind::Push(Value::code(body)),
        OpKind::While,
    ]);

    cx.run(&main).unwrap();
    // One evaluation let the body run; the break adds zero more.
    assert_eq!(global_int(&cx, "/evals/d2"), 1);
}

#[test]
fn test_if_takes_the_right_branch() {
    let mut cx = context();
    cx.declare(&name("/r/if"));

    let then_unit = unit(vec![
        OpKind::Push(Value::name(name("/r/if"))),
        OpKind::Push(Value::int(1)),
        OpKind::Assign,
    ]);
    let else_unit = unit(vec![
        OpKind::Push(Value::name(name("/r/if"))),
        OpKind::Push(Value::int(2)),
        OpKind::Assign,
    ]);
    let main = unit(vec![
        OpKind::Push(Value::int(0)),
        OpKind::Push(Value::code(then_unit)),
        OpKind::Push(Value::code(else_unit)),
        OpKind::If,
    ]);

    cx.run(&main).unwrap();
    assert_eq!(global_int(&cx, "/r/if"), 2);
}

#[test]
fn test_ifthen_skips_when_false() {
    let mut cx = context();
    cx.declare(&name("/r/it"));

    let then_unit = unit(vec![
        OpKind::Push(Value::name(name("/r/it"))),
        OpKind::Push(Value::int(1)),
        OpKind::Assign,
    ]);
    let main = unit(vec![
        OpKind::Push(Value::int(0)),
        OpKind::Push(Value::code(then_unit)),
        OpKind::IfThen,
    ]);

    cx.run(&main).unwrap();
    assert!(!cx.is_initialised(&name("/r/it")));
}

#[test]
fn test_short_circuit_and_skips_rhs_unit() {
    let mut cx = context();
    cx.declare(&name("/ran/sc"));
    cx.assign(&name("/ran/sc"), Value::int(0));

    let rhs = unit(vec![
        OpKind::Push(Value::name(name("/ran/sc"))),
        OpKind::Inc,
        OpKind::Push(Value::int(1)),
    ]);

    // False lhs: the code operand must not run.
    let main = unit(vec![
        OpKind::Push(Value::int(0)),
        OpKind::Push(Value::code(rhs.clone())),
        OpKind::And,
    ]);
    cx.run(&main).unwrap();
    assert!(!cx.stack.pop(None).unwrap().truthy().unwrap());
    assert_eq!(global_int(&cx, "/ran/sc"), 0);

    // True lhs: now it runs and supplies the result.
    let main = unit(vec![
        OpKind::Push(Value::int(1)),
        OpKind::Push(Value::code(rhs)),
        OpKind::And,
    ]);
    cx.run(&main).unwrap();
    assert!(cx.stack.pop(None).unwrap().truthy().unwrap());
    assert_eq!(global_int(&cx, "/ran/sc"), 1);
}

#[test]
fn test_short_circuit_or_skips_rhs_when_true() {
    let mut cx = context();
    cx.declare(&name("/ran/or"));
    cx.assign(&name("/ran/or"), Value::int(0));

    let rhs = unit(vec![
        OpKind::Push(Value::name(name("/ran/or"))),
        OpKind::Inc,
        OpKind::Push(Value::int(0)),
    ]);

    let main = unit(vec![
        OpKind::Push(Value::int(1)),
        OpKind::Push(Value::code(rhs)),
        OpKind::Or,
    ]);
    cx.run(&main).unwrap();
    assert!(cx.stack.pop(None).unwrap().truthy().unwrap());
    assert_eq!(global_int(&cx, "/ran/or"), 0);
}

#[test]
fn test_loop_break_through_executed_code() {
    let mut cx = context();
    cx.declare(&name("/i/x"));
    cx.assign(&name("/i/x"), Value::int(0));

    // The body invokes a code value that breaks; the break must still
    // terminate the loop (Execute propagates signals).
    let breaker = unit(vec![OpKind::Break]);
    let cond = unit(vec![OpKind::Push(Value::int(1))]);
    let body = unit(vec![
        OpKind::Push(Value::name(name("/i/x"))),
        OpKind::Inc,
        OpKind::Push(Value::code(breaker)),
        OpKind::Execute,
    ]);
    let main = unit(vec![
        OpKind::Push(Value::code(cond)),
        OpKind::Push(Value::code(body)),
        OpKind::While,
    ]);

    assert_eq!(cx.run(&main).unwrap(), Signal::Continue);
    assert_eq!(global_int(&cx, "/i/x"), 1);
}
