//! Interactive debugging dumps.
//!
//! Three introspection entry points, all writing through the runtime's
//! print handler: the operand stack (top first), the global tree (full
//! in-order traversal with rendered values), and the recycling-cache
//! counters. Output is for humans at a prompt; no stable format is
//! promised.

use flint_ir::SourcePos;

use crate::errors::EvalResult;
use crate::runtime::ExecContext;

/// Dump the operand stack, top entry first.
pub fn dump_stack(cx: &ExecContext, _pos: Option<&SourcePos>) -> EvalResult<()> {
    let handler = cx.runtime().print_handler();
    for (i, value) in cx.stack.iter_top_first().enumerate() {
        handler.println(&format!("{i}: {}", value.render()));
    }
    Ok(())
}

/// Dump every global tree entry with its current value.
pub fn dump_tree(cx: &ExecContext) {
    let handler = cx.runtime().print_handler();
    cx.runtime().globals().traverse(|key, slot| {
        let rendered = match &*slot.read() {
            Some(value) => value.render(),
            None => "...undefined...".to_owned(),
        };
        handler.println(&format!("{key}: {rendered}"));
    });
}

/// Dump the recycling-cache counters.
pub fn dump_cache(cx: &ExecContext) {
    let stats = cx.cache.stats();
    cx.runtime().print_handler().println(&format!(
        "Cache: numbers {}, texts created {}, reused {}, pooled {}",
        stats.numbers, stats.texts_created, stats.texts_reused, stats.texts_pooled
    ));
}

/// Print the global tree's shape counters.
pub fn dump_tree_stats(cx: &ExecContext) {
    let stats = cx.runtime().globals().stats();
    cx.runtime().print_handler().println(&format!(
        "Namespace: depth {}, nodes {}, entries {}",
        stats.depth, stats.nodes, stats.entries
    ));
}
