//! Multi-context execution: private state stays private, shared state is
//! reached through the global tree.

use std::time::Duration;

use super::{buffered_runtime, code_handle, name, unit};
use crate::{spawn_thread, CodeUnit, ExecContext, OpKind, Signal, ThreadModule, Value};

/// A thread body that takes its argument from the stack, increments a
/// private local `rounds` times while also reading a shared global path,
/// and writes the final value to `result_path`.
fn counting_unit(result_path: &str, rounds: i64) -> CodeUnit {
    let acc = name("acc");
    let i = name("i");
    let cond = unit(vec![
        OpKind::Push(Value::name(i.clone())),
        OpKind::Push(Value::int(rounds)),
        OpKind::Lt,
    ]);
    let body = unit(vec![
        OpKind::Push(Value::name(acc.clone())),
        OpKind::Inc,
        OpKind::Push(Value::name(i.clone())),
        OpKind::Inc,
        // Touch an unrelated shared counter every round.
        OpKind::Push(Value::name(name("/unrelated/shared"))),
        OpKind::ValueOf,
        OpKind::Pop,
    ]);

    unit(vec![
        // Bind the stack argument to a private local.
        OpKind::Push(Value::name(acc.clone())),
        OpKind::Declare,
        OpKind::Push(Value::name(acc.clone())),
        OpKind::Swap,
        OpKind::Assign,
        // Private loop counter.
        OpKind::Push(Value::name(i.clone())),
        OpKind::Declare,
        OpKind::Push(Value::name(i)),
        OpKind::Push(Value::int(0)),
        OpKind::Assign,
        OpKind::Push(Value::code(cond)),
        OpKind::Push(Value::code(body)),
        OpKind::While,
        // Publish the final value.
        OpKind::Push(Value::name(name(result_path))),
        OpKind::Push(Value::name(acc)),
        OpKind::Assign,
    ])
}

#[test]
fn test_two_threads_no_cross_contamination() {
    let runtime = buffered_runtime();
    let mut main = ExecContext::new(runtime.clone());
    main.declare(&name("/unrelated/shared"));
    main.assign(&name("/unrelated/shared"), Value::int(0));
    main.declare(&name("/0/result"));
    main.declare(&name("/1/result"));

    let first = spawn_thread(
        runtime.clone(),
        code_handle(counting_unit("/0/result", 100)),
        Value::int(1),
    )
    .unwrap();
    let second = spawn_thread(
        runtime.clone(),
        code_handle(counting_unit("/1/result", 100)),
        Value::int(2),
    )
    .unwrap();

    assert_eq!(first.join().unwrap().unwrap(), Signal::Continue);
    assert_eq!(second.join().unwrap().unwrap(), Signal::Continue);

    let a = main.lookup_value(&name("/0/result"), None).unwrap();
    let b = main.lookup_value(&name("/1/result"), None).unwrap();
    assert_eq!(a.as_int().unwrap(), 101);
    assert_eq!(b.as_int().unwrap(), 102);
}

#[test]
fn test_spawned_context_starts_with_only_the_argument() {
    let runtime = buffered_runtime();

    // The body publishes the lone stack operand - the argument.
    let body = unit(vec![
        OpKind::Push(Value::name(name("/depth/spawn"))),
        OpKind::Swap,
        OpKind::Assign,
    ]);
    let mut main = ExecContext::new(runtime.clone());
    main.declare(&name("/depth/spawn"));

    let handle = spawn_thread(
        runtime,
        code_handle(body),
        Value::int(77),
    )
    .unwrap();
    handle.join().unwrap().unwrap();

    let got = main.lookup_value(&name("/depth/spawn"), None).unwrap();
    assert_eq!(got.as_int().unwrap(), 77);
}

#[test]
fn test_thread_error_is_reported_through_handle() {
    let runtime = buffered_runtime();
    // Popping with an empty stack beyond the argument underflows.
    let body = unit(vec![OpKind::Pop, OpKind::Pop]);

    let handle = spawn_thread(
        runtime,
        code_handle(body),
        Value::int(1),
    )
    .unwrap();

    let result = handle.join().unwrap();
    assert_eq!(
        result.unwrap_err().kind,
        crate::EvalErrorKind::StackUnderflow
    );
}

#[test]
fn test_create_thread_native_op() {
    let runtime = buffered_runtime();
    let mut cx = ExecContext::new(runtime.clone());
    runtime.load_module(&ThreadModule);
    cx.declare(&name("/done/ct"));

    let body = unit(vec![
        OpKind::Push(Value::name(name("/done/ct"))),
        OpKind::Swap,
        OpKind::Assign,
    ]);
    let main = unit(vec![
        OpKind::Push(Value::int(7)),
        OpKind::Push(Value::code(body)),
        OpKind::Push(Value::name(name("/create/thread"))),
        OpKind::Execute,
    ]);
    cx.run(&main).unwrap();

    // The op is fire-and-forget; poll the published slot.
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    loop {
        if cx.is_initialised(&name("/done/ct")) {
            break;
        }
        assert!(
            std::time::Instant::now() < deadline,
            "spawned thread never published"
        );
        std::thread::sleep(Duration::from_millis(5));
    }
    let got = cx.lookup_value(&name("/done/ct"), None).unwrap();
    assert_eq!(got.as_int().unwrap(), 7);
}

#[test]
fn test_shared_counter_updates_visible_across_contexts() {
    let runtime = buffered_runtime();
    let mut writer = ExecContext::new(runtime.clone());
    writer.declare(&name("/tick/cc"));
    writer.assign(&name("/tick/cc"), Value::int(0));

    // Bump the shared counter from a spawned context.
    let body = unit(vec![
        OpKind::Pop,
        OpKind::Push(Value::name(name("/tick/cc"))),
        OpKind::Inc,
    ]);
    let handle = spawn_thread(
        runtime.clone(),
        code_handle(body),
        Value::int(0),
    )
    .unwrap();
    handle.join().unwrap().unwrap();

    let reader = ExecContext::new(runtime);
    let got = reader.lookup_value(&name("/tick/cc"), None).unwrap();
    assert_eq!(got.as_int().unwrap(), 1);
}
