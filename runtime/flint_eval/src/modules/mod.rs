//! Built-in native modules.
//!
//! These are deliberately small: enough surface to exercise the
//! registration contract end to end (idempotent load, path bindings,
//! native-op dispatch). Heavier functionality belongs in out-of-tree
//! extensions built on the same [`NativeModule`](crate::NativeModule) /
//! [`NativeOp`](crate::NativeOp) interfaces.

mod strings;
mod threads;

pub use strings::StringModule;
pub use threads::ThreadModule;
