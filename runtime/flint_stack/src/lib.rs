//! Stack safety utilities for deep recursion.
//!
//! Executing an executable unit recurses for every nested unit (loop bodies,
//! branches, invoked code values), so deeply nested scripts can exhaust the
//! OS stack. This crate wraps the `stacker` crate to grow the stack on
//! demand; on WASM targets the closure is called directly (WASM has its own
//! stack management).

/// Ensure sufficient stack space is available before executing `f`.
///
/// On native targets, grows the stack when less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    /// Minimum stack space to keep available (100KB red zone).
    const RED_ZONE: usize = 100 * 1024;

    /// Stack space to allocate when growing (1MB).
    const STACK_PER_RECURSION: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version - just call directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
