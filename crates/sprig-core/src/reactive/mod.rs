#![forbid(unsafe_code)]

//! Reactive values and teardown bookkeeping for sprig.
//!
//! This module provides the change-tracking primitives the materializer binds
//! into the document:
//!
//! - [`Observable`]: a shared, version-tracked value with synchronous,
//!   identity-keyed listener notification.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//! - [`CleanupRegistry`]: a set of teardown callbacks flushed in bulk.
//!
//! # Architecture
//!
//! Both types use `Rc<RefCell<..>>` for single-threaded shared ownership.
//! Listener and teardown sets are snapshotted before iteration and no borrow
//! is held while a callback runs, so callbacks may freely call back into the
//! cell or registry that invoked them.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per mutation that changes the value.
//! 2. Listeners are notified in registration order, each at most once per
//!    change, and each observes the new value through `get()`.
//! 3. Setting the same value as the current one (see
//!    [`SameValue`](crate::SameValue)) is a no-op (no version bump, no
//!    notifications).
//! 4. A panicking listener or teardown never prevents the others from running.
//! 5. A flush runs every teardown registered at flush start exactly once and
//!    leaves the registry empty.

pub mod cleanup;
pub mod observable;

pub use cleanup::{CleanupRegistry, FlushReport};
pub use observable::{Observable, Subscription, Update, WeakObservable};
