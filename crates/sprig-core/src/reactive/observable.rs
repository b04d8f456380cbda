#![forbid(unsafe_code)]

//! Observable value cell with change notification and version tracking.
//!
//! # Design
//!
//! [`Observable<T>`] wraps a value of type `T` in shared, reference-counted
//! storage (`Rc<RefCell<..>>`). When an update produces a value that differs
//! from the current one (by [`SameValue`]), the value is stored and every
//! registered [`Listener`] is invoked synchronously, in registration order.
//!
//! Listeners are zero-argument callbacks that read the cell themselves. The
//! listener set is keyed by callback identity: subscribing the same
//! [`Listener`] twice is idempotent, and unsubscribing one that was never
//! registered does nothing.
//!
//! # Performance
//!
//! | Operation       | Complexity                 |
//! |-----------------|----------------------------|
//! | `get()`         | O(1) + clone of `T`        |
//! | `set()`         | O(L) where L = listeners   |
//! | `subscribe()`   | O(L) (identity check)      |
//! | `unsubscribe()` | O(L)                       |
//!
//! # Failure Modes
//!
//! - **Listener panic**: contained by [`run_isolated`]; the remaining
//!   listeners still run and `set()` returns normally.
//! - **Re-entrant set**: allowed. The listener snapshot is taken before any
//!   listener runs, so a nested `set()` notifies the full set again before the
//!   outer notification continues.
//! - **Listener leak**: listeners hold whatever they capture until they are
//!   unsubscribed. Nothing is released automatically.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::callback::Listener;
use crate::isolate::run_isolated;
use crate::same_value::SameValue;

/// Shared interior for [`Observable<T>`].
struct ObservableInner<T> {
    value: T,
    version: u64,
    listeners: Vec<Listener>,
}

/// The argument to [`Observable::apply`]: a literal replacement, or a
/// transform of the previous value.
pub enum Update<'a, T> {
    Replace(T),
    With(Box<dyn FnOnce(&T) -> T + 'a>),
}

impl<'a, T> Update<'a, T> {
    /// Derive the next value from the current one.
    pub fn with(f: impl FnOnce(&T) -> T + 'a) -> Self {
        Self::With(Box::new(f))
    }
}

impl<T> From<T> for Update<'_, T> {
    fn from(value: T) -> Self {
        Self::Replace(value)
    }
}

impl<T> fmt::Debug for Update<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace(_) => f.write_str("Update::Replace(..)"),
            Self::With(_) => f.write_str("Update::With(..)"),
        }
    }
}

/// A shared, version-tracked value with change notification.
///
/// Cloning an `Observable` creates a new handle to the **same** inner state:
/// both handles see the same value and share listeners.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 on each value-changing mutation.
/// 2. An update whose result is the same value as the current one (see
///    [`SameValue`]) is a no-op.
/// 3. Listeners are notified in registration order.
/// 4. The listener set never holds the same [`Listener`] twice.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

// Manual Clone: shares the same Rc.
impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("listener_count", &inner.listeners.len())
            .finish()
    }
}

impl<T: Default + Clone + SameValue + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + SameValue + 'static> Observable<T> {
    /// Create a new observable with the given initial value.
    ///
    /// The initial version is 0 and no listeners are registered.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value. Returns the value now held by the cell.
    ///
    /// When `value` is the same value as the current one nothing is stored
    /// and no listener runs. Floats compare by bit pattern with every `NaN`
    /// alike, so `NaN` repeats are quiet and `0.0` to `-0.0` is a change.
    pub fn set(&self, value: T) -> T {
        self.store(value)
    }

    /// Derive the next value from the current one. Returns the value now
    /// held by the cell.
    ///
    /// `f` sees a snapshot of the current value; the cell is not borrowed
    /// while it runs.
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> T {
        let current = self.get();
        self.store(f(&current))
    }

    /// Apply either kind of [`Update`].
    pub fn apply(&self, update: Update<'_, T>) -> T {
        match update {
            Update::Replace(value) => self.set(value),
            Update::With(f) => self.update(f),
        }
    }

    /// Add `listener` to the listener set. Registering a listener that is
    /// already present is a no-op.
    pub fn subscribe(&self, listener: &Listener) {
        let mut inner = self.inner.borrow_mut();
        if !inner.listeners.iter().any(|l| l.ptr_eq(listener)) {
            inner.listeners.push(listener.clone());
        }
    }

    /// Remove `listener` from the listener set. Removing a listener that was
    /// never registered is a no-op.
    pub fn unsubscribe(&self, listener: &Listener) {
        self.inner
            .borrow_mut()
            .listeners
            .retain(|l| !l.ptr_eq(listener));
    }

    /// Whether `listener` is currently registered.
    #[must_use]
    pub fn is_subscribed(&self, listener: &Listener) -> bool {
        self.inner
            .borrow()
            .listeners
            .iter()
            .any(|l| l.ptr_eq(listener))
    }

    /// Subscribe a callback that receives the new value on each change.
    ///
    /// Returns a [`Subscription`] guard. Dropping the guard unsubscribes the
    /// callback. The callback holds only a weak handle to this cell.
    pub fn watch(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let weak = self.downgrade();
        let listener = Listener::new(move || {
            if let Some(cell) = weak.upgrade() {
                let value = cell.get();
                callback(&value);
            }
        });
        self.subscribe(&listener);

        let weak = self.downgrade();
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(cell) = weak.upgrade() {
                    cell.unsubscribe(&listener);
                }
            })),
        }
    }

    /// Current version number. Increments by 1 on each value-changing
    /// mutation. Useful for dirty-checking.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of currently registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// A handle that does not keep the cell alive.
    #[must_use]
    pub fn downgrade(&self) -> WeakObservable<T> {
        WeakObservable {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether both handles refer to the same cell.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn store(&self, next: T) -> T {
        let stored = {
            let mut inner = self.inner.borrow_mut();
            if inner.value.same_value(&next) {
                return inner.value.clone();
            }
            inner.value = next;
            inner.version += 1;
            inner.value.clone()
        };
        self.notify();
        stored
    }

    /// Run every listener registered at the time of the call.
    fn notify(&self) {
        // Snapshot first so no borrow is held while listeners run.
        let listeners: Vec<Listener> = self.inner.borrow().listeners.clone();
        for listener in &listeners {
            run_isolated("observable listener", || listener.call());
        }
    }
}

/// Non-owning handle to an [`Observable`].
pub struct WeakObservable<T> {
    inner: Weak<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for WeakObservable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T> WeakObservable<T> {
    /// The cell, if any strong handle is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Observable<T>> {
        self.inner.upgrade().map(|inner| Observable { inner })
    }
}

impl<T> fmt::Debug for WeakObservable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakObservable")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

/// RAII guard for a callback registered with [`Observable::watch`].
///
/// Dropping the `Subscription` removes the callback from the cell's listener
/// set immediately.
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Keep the callback registered for the lifetime of the cell.
    pub fn forget(mut self) {
        self.detach = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.detach.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
