//! Heap wrapper for enforced shared ownership.
//!
//! `Heap<T>` wraps `Arc<T>` and is the ONLY way the value system allocates
//! on the heap. The constructor is `pub(super)`, so external code must go
//! through `Value`'s factory methods; cloning a handle is the engine's
//! "hold", dropping it is the "release", and releasing below zero is
//! unconstructible.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A heap-allocated value wrapper.
///
/// # Thread Safety
/// Uses `Arc` internally, so handles move freely between execution threads.
///
/// # Zero-Cost Abstraction
/// `#[repr(transparent)]` keeps the layout identical to `Arc<T>`.
#[repr(transparent)]
pub struct Heap<T: ?Sized>(Arc<T>);

impl<T> Heap<T> {
    /// Create a new heap-allocated value.
    ///
    /// `pub(super)` - only the value module allocates; external code uses
    /// `Value` factories.
    #[inline]
    pub(super) fn new(value: T) -> Self {
        Heap(Arc::new(value))
    }

    /// Recover the payload if this is the only handle.
    ///
    /// The recycling cache uses this to take back a uniquely-owned buffer;
    /// shared payloads are returned untouched.
    #[inline]
    pub fn try_recover(this: Self) -> Result<T, Self> {
        Arc::try_unwrap(this.0).map_err(Heap)
    }

    /// Whether two handles share one allocation.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Number of live handles to this allocation.
    #[inline]
    pub fn handle_count(this: &Self) -> usize {
        Arc::strong_count(&this.0)
    }
}

impl<T: ?Sized> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(Arc::clone(&self.0))
    }
}

impl<T: ?Sized + PartialEq> PartialEq for Heap<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        *self.0 == *other.0
    }
}

impl<T: ?Sized + Eq> Eq for Heap<T> {}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: ?Sized + fmt::Display> fmt::Display for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: ?Sized> AsRef<T> for Heap<T> {
    #[inline]
    fn as_ref(&self) -> &T {
        &self.0
    }
}
