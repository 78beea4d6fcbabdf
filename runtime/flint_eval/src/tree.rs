//! The global namespace tree.
//!
//! A balanced multiway search tree mapping hierarchical path strings
//! (`/<index>/<namespace>`) to shared variable slots. Fan-out is bounded at
//! [`FANOUT`] keys and `FANOUT + 1` children per node; leaf versus internal
//! is fixed when a node is created. Inserting into a full node splits it
//! into two half-full siblings and propagates the median pair upward,
//! growing the tree by one level when the split reaches the root.
//!
//! Entries are never removed - the tree only grows. Duplicate-key inserts
//! are rejected rather than overwritten; callers wanting upsert semantics
//! find the slot first and write through it.
//!
//! Keys compare byte-wise, so numeric path segments sort lexicographically:
//! `"/10/x"` comes before `"/2/x"`. Callers that need numeric iteration
//! order must account for this themselves.
//!
//! The whole tree sits behind a reader/writer lock: `find` and `traverse`
//! take the shared side, `insert` the exclusive side. Slots are themselves
//! individually locked so two threads can mutate different entries without
//! touching the tree lock.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::value::Value;

/// Keys per node. A node holds at most this many entries and, when
/// internal, one more child than entries.
pub const FANOUT: usize = 6;

/// A shared, individually locked variable slot. `None` is a declared but
/// uninitialized entry.
pub type Slot = Arc<RwLock<Option<Value>>>;

/// Tree shape counters, reported by the diagnostics surface.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Levels from root to leaf (0 when empty).
    pub depth: usize,
    /// Total node count.
    pub nodes: usize,
    /// Total entry count.
    pub entries: usize,
}

/// One (key, slot) pair.
#[derive(Debug)]
struct Entry {
    key: Box<str>,
    slot: Slot,
}

/// A tree node. `entries` is sorted and bounded by [`FANOUT`] (transiently
/// one more during a split); `children` is empty for leaves and
/// `entries.len() + 1` for internal nodes.
#[derive(Debug)]
struct Node {
    leaf: bool,
    entries: Vec<Entry>,
    children: Vec<Box<Node>>,
}

impl Node {
    fn new_leaf() -> Self {
        Node {
            leaf: true,
            entries: Vec::with_capacity(FANOUT),
            children: Vec::new(),
        }
    }
}

/// Outcome of inserting into a subtree.
enum Inserted {
    /// Entry placed without overflowing this subtree's root.
    Done,
    /// Key already present; nothing changed.
    Duplicate,
    /// This node overflowed and split: the node itself is now the left
    /// sibling, `median` and `right` must be placed in the parent.
    Split { median: Entry, right: Box<Node> },
}

/// Insert `entry` into the subtree rooted at `node`. `nodes` counts the
/// nodes created by splits.
fn insert_into(node: &mut Node, entry: Entry, nodes: &mut usize) -> Inserted {
    let idx = match node
        .entries
        .binary_search_by(|e| e.key.as_ref().cmp(&*entry.key))
    {
        Ok(_) => return Inserted::Duplicate,
        Err(idx) => idx,
    };

    if node.leaf {
        node.entries.insert(idx, entry);
    } else {
        match insert_into(&mut node.children[idx], entry, nodes) {
            Inserted::Split { median, right } => {
                node.entries.insert(idx, median);
                node.children.insert(idx + 1, right);
            }
            other => return other,
        }
    }

    if node.entries.len() > FANOUT {
        *nodes += 1;
        Inserted::Split {
            median: split_median(node),
            right: split_right(node),
        }
    } else {
        Inserted::Done
    }
}

/// Detach the overflowing node's upper half as a new right sibling.
///
/// With `FANOUT + 1` entries the median index is `FANOUT / 2`; the left
/// sibling (the node itself) and the right sibling each keep `FANOUT / 2`
/// entries.
fn split_right(node: &mut Node) -> Box<Node> {
    let right_entries = node.entries.split_off(FANOUT / 2 + 1);
    let right_children = if node.leaf {
        Vec::new()
    } else {
        node.children.split_off(FANOUT / 2 + 1)
    };
    Box::new(Node {
        leaf: node.leaf,
        entries: right_entries,
        children: right_children,
    })
}

/// Remove and return the median entry after [`split_right`] has detached
/// everything above it.
fn split_median(node: &mut Node) -> Entry {
    // split_right leaves FANOUT / 2 + 1 entries; the last one is the median.
    match node.entries.pop() {
        Some(entry) => entry,
        // entries.len() > FANOUT guarantees a median exists.
        None => unreachable!("split of an empty node"),
    }
}

/// Interior state guarded by the tree lock.
#[derive(Debug, Default)]
struct TreeInner {
    root: Option<Box<Node>>,
    stats: TreeStats,
}

/// The global namespace tree. See the module docs for semantics.
#[derive(Debug, Default)]
pub struct NamespaceTree {
    inner: RwLock<TreeInner>,
}

impl NamespaceTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        NamespaceTree::default()
    }

    /// Insert a new entry with the given initial value.
    ///
    /// Returns `false` when the key is already present (the tree is
    /// unchanged). Takes the exclusive side of the tree lock.
    pub fn insert(&self, key: &str, initial: Option<Value>) -> bool {
        let entry = Entry {
            key: key.into(),
            slot: Arc::new(RwLock::new(initial)),
        };

        let mut inner = self.inner.write();
        match inner.root.take() {
            None => {
                let mut root = Node::new_leaf();
                root.entries.push(entry);
                inner.root = Some(Box::new(root));
                inner.stats = TreeStats {
                    depth: 1,
                    nodes: 1,
                    entries: 1,
                };
                true
            }
            Some(mut root) => {
                let mut nodes = inner.stats.nodes;
                let outcome = insert_into(&mut root, entry, &mut nodes);
                match outcome {
                    Inserted::Duplicate => {
                        inner.root = Some(root);
                        false
                    }
                    Inserted::Done => {
                        inner.root = Some(root);
                        inner.stats.nodes = nodes;
                        inner.stats.entries += 1;
                        true
                    }
                    Inserted::Split { median, right } => {
                        // The old root became the left sibling; grow a new
                        // internal root above the pair.
                        let new_root = Node {
                            leaf: false,
                            entries: vec![median],
                            children: vec![root, right],
                        };
                        inner.root = Some(Box::new(new_root));
                        inner.stats.nodes = nodes + 1;
                        inner.stats.depth += 1;
                        inner.stats.entries += 1;
                        true
                    }
                }
            }
        }
    }

    /// Point lookup. Returns a clone of the slot handle so the caller can
    /// read or write the entry after the tree lock is released.
    pub fn find(&self, key: &str) -> Option<Slot> {
        let inner = self.inner.read();
        let mut node = inner.root.as_deref()?;
        loop {
            match node
                .entries
                .binary_search_by(|e| e.key.as_ref().cmp(key))
            {
                Ok(idx) => return Some(node.entries[idx].slot.clone()),
                Err(idx) => {
                    if node.leaf {
                        return None;
                    }
                    node = &node.children[idx];
                }
            }
        }
    }

    /// Visit every entry in byte-wise key order under the shared lock.
    pub fn traverse(&self, mut f: impl FnMut(&str, &Slot)) {
        fn visit(node: &Node, f: &mut impl FnMut(&str, &Slot)) {
            for (i, entry) in node.entries.iter().enumerate() {
                if !node.leaf {
                    visit(&node.children[i], f);
                }
                f(&entry.key, &entry.slot);
            }
            if !node.leaf {
                if let Some(last) = node.children.last() {
                    visit(last, f);
                }
            }
        }

        let inner = self.inner.read();
        if let Some(root) = inner.root.as_deref() {
            visit(root, &mut f);
        }
    }

    /// Shape counters.
    pub fn stats(&self) -> TreeStats {
        self.inner.read().stats
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.inner.read().stats.entries
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
