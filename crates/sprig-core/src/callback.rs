#![forbid(unsafe_code)]

//! Zero-argument callbacks with identity semantics.
//!
//! Listener sets and cleanup registries are *sets*: registering the same
//! callback twice must be idempotent, and removal must find the exact
//! callback that was registered. Closures have no structural equality, so
//! [`Callback`] compares by the address of its shared allocation.

use std::fmt;
use std::rc::Rc;

/// A shared zero-argument callback compared by identity.
///
/// Cloning yields a handle to the same callback; clones are equal to each
/// other and to nothing else.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn()>);

/// A callback subscribed to an [`Observable`](crate::Observable).
pub type Listener = Callback;

/// A callback that reverses a previously established side effect.
pub type Teardown = Callback;

impl Callback {
    /// Wrap a closure.
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the callback.
    pub fn call(&self) {
        (self.0)()
    }

    /// Whether both handles point at the same callback.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Callback {}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callback")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}
