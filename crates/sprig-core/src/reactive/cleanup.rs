#![forbid(unsafe_code)]

//! Teardown registry for bindings established during materialization.
//!
//! Every side effect the materializer sets up (an event listener on an
//! element, a text node subscribed to an [`Observable`](super::Observable))
//! registers a [`Teardown`] here. [`CleanupRegistry::flush_all`] reverses all
//! of them at once.
//!
//! The registry is a context object, not a process global: whoever creates it
//! decides its scope, and clones share the same set.
//!
//! [`CleanupRegistry::scoped`] narrows that further: teardowns registered
//! while its closure runs land in a fresh registry handed back to the caller,
//! so one batch of bindings (a routed page, say) can be released without
//! touching the rest.

use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

use crate::callback::Teardown;
use crate::isolate::run_isolated;

/// Outcome of a [`CleanupRegistry::flush_all`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Teardowns invoked (including those that panicked).
    pub executed: usize,
    /// Teardowns that panicked. Their failure was contained.
    pub failed: usize,
    /// Teardowns registered while the flush was running. They were dropped
    /// without being invoked.
    pub discarded: usize,
}

#[derive(Default)]
struct Inner {
    teardowns: Vec<Teardown>,
    /// Capture targets of active [`CleanupRegistry::scoped`] calls, innermost
    /// last.
    scopes: Vec<CleanupRegistry>,
}

/// A shared set of teardown callbacks.
///
/// Membership is by callback identity; registering the same [`Teardown`]
/// twice keeps one entry.
#[derive(Clone, Default)]
pub struct CleanupRegistry {
    inner: Rc<RefCell<Inner>>,
}

/// Pops the capture target pushed by [`CleanupRegistry::scoped`], also when
/// the closure unwinds.
struct ScopeGuard<'a> {
    registry: &'a CleanupRegistry,
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.registry.inner.borrow_mut().scopes.pop();
    }
}

impl CleanupRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `teardown` to the set, or to the innermost active
    /// [`scoped`](Self::scoped) capture.
    pub fn register(&self, teardown: Teardown) {
        let scope = self.inner.borrow().scopes.last().cloned();
        if let Some(scope) = scope {
            scope.register(teardown);
            return;
        }
        let mut inner = self.inner.borrow_mut();
        if !inner.teardowns.iter().any(|t| t.ptr_eq(&teardown)) {
            inner.teardowns.push(teardown);
        }
    }

    /// Wrap `f` in a [`Teardown`], register it, and return the handle so the
    /// caller can run or unregister it individually.
    pub fn register_fn(&self, f: impl Fn() + 'static) -> Teardown {
        let teardown = Teardown::new(f);
        self.register(teardown.clone());
        teardown
    }

    /// Remove `teardown` without running it. Returns whether it was present.
    ///
    /// Active captures are searched too.
    pub fn unregister(&self, teardown: &Teardown) -> bool {
        let scopes = {
            let mut inner = self.inner.borrow_mut();
            let before = inner.teardowns.len();
            inner.teardowns.retain(|t| !t.ptr_eq(teardown));
            if inner.teardowns.len() != before {
                return true;
            }
            inner.scopes.clone()
        };
        scopes.iter().any(|scope| scope.unregister(teardown))
    }

    /// Run `f`, collecting every teardown registered on this registry (or a
    /// clone of it) while `f` runs into a new registry, which is returned
    /// alongside `f`'s result. Nested calls capture into the innermost scope.
    pub fn scoped<R>(&self, f: impl FnOnce() -> R) -> (R, CleanupRegistry) {
        let scope = CleanupRegistry::new();
        self.inner.borrow_mut().scopes.push(scope.clone());
        let guard = ScopeGuard { registry: self };
        let result = f();
        drop(guard);
        (result, scope)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().teardowns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().teardowns.is_empty()
    }

    /// Run every registered teardown exactly once, then clear the set.
    ///
    /// A panicking teardown is contained and the rest still run. Teardowns
    /// registered by a teardown during the flush are cleared along with the
    /// rest and reported in [`FlushReport::discarded`].
    pub fn flush_all(&self) -> FlushReport {
        let batch = mem::take(&mut self.inner.borrow_mut().teardowns);
        let mut report = FlushReport {
            executed: batch.len(),
            ..FlushReport::default()
        };

        for teardown in &batch {
            if !run_isolated("cleanup teardown", || teardown.call()) {
                report.failed += 1;
            }
        }

        let late = mem::take(&mut self.inner.borrow_mut().teardowns);
        report.discarded = late.len();
        if report.discarded > 0 {
            tracing::debug!(
                discarded = report.discarded,
                "dropped teardowns registered during flush"
            );
        }

        tracing::debug!(
            executed = report.executed,
            failed = report.failed,
            "cleanup registry flushed"
        );
        report
    }
}

impl std::fmt::Debug for CleanupRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanupRegistry")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counting(registry: &CleanupRegistry, hits: &Rc<Cell<u32>>) -> Teardown {
        let h = Rc::clone(hits);
        registry.register_fn(move || h.set(h.get() + 1))
    }

    #[test]
    fn flush_runs_each_once_and_clears() {
        let registry = CleanupRegistry::new();
        let hits = Rc::new(Cell::new(0));
        counting(&registry, &hits);
        counting(&registry, &hits);
        assert_eq!(registry.len(), 2);

        let report = registry.flush_all();
        assert_eq!(hits.get(), 2);
        assert_eq!(report.executed, 2);
        assert!(registry.is_empty());

        registry.flush_all();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn duplicate_registration_keeps_one_entry() {
        let registry = CleanupRegistry::new();
        let hits = Rc::new(Cell::new(0));
        let t = counting(&registry, &hits);
        registry.register(t.clone());
        registry.register(t);
        assert_eq!(registry.len(), 1);
        registry.flush_all();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn failing_teardown_does_not_block_others() {
        let registry = CleanupRegistry::new();
        let hits = Rc::new(Cell::new(0));
        counting(&registry, &hits);
        registry.register_fn(|| panic!("teardown failed"));
        counting(&registry, &hits);

        let report = registry.flush_all();
        assert_eq!(hits.get(), 2);
        assert_eq!(report.executed, 3);
        assert_eq!(report.failed, 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn late_registrations_are_cleared_not_run() {
        let registry = CleanupRegistry::new();
        let late_ran = Rc::new(Cell::new(false));
        let (r, flag) = (registry.clone(), Rc::clone(&late_ran));
        registry.register_fn(move || {
            let flag = Rc::clone(&flag);
            r.register_fn(move || flag.set(true));
        });

        let report = registry.flush_all();
        assert_eq!(report.discarded, 1);
        assert!(registry.is_empty());
        assert!(!late_ran.get());
    }

    #[test]
    fn unregister_removes_without_running() {
        let registry = CleanupRegistry::new();
        let hits = Rc::new(Cell::new(0));
        let t = counting(&registry, &hits);
        assert!(registry.unregister(&t));
        assert!(!registry.unregister(&t));
        registry.flush_all();
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn scoped_registrations_go_to_the_scope() {
        let registry = CleanupRegistry::new();
        let hits = Rc::new(Cell::new(0));
        counting(&registry, &hits);

        let ((), scope) = registry.scoped(|| {
            counting(&registry.clone(), &hits);
            counting(&registry, &hits);
        });
        assert_eq!(registry.len(), 1);
        assert_eq!(scope.len(), 2);

        scope.flush_all();
        assert_eq!(hits.get(), 2);
        assert_eq!(registry.len(), 1);

        counting(&registry, &hits);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn nested_scopes_capture_innermost() {
        let registry = CleanupRegistry::new();
        let (inner, outer) = registry.scoped(|| {
            registry.register_fn(|| {});
            let ((), inner) = registry.scoped(|| {
                registry.register_fn(|| {});
                registry.register_fn(|| {});
            });
            inner
        });
        assert_eq!(outer.len(), 1);
        assert_eq!(inner.len(), 2);
        assert!(registry.is_empty());
    }

    #[test]
    fn scope_ends_when_closure_panics() {
        let registry = CleanupRegistry::new();
        let r = registry.clone();
        let caught = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            r.scoped(|| -> u8 { panic!("render failed") });
        }));
        assert!(caught.is_err());
        registry.register_fn(|| {});
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unregister_reaches_active_scope() {
        let registry = CleanupRegistry::new();
        let (found, scope) = registry.scoped(|| {
            let t = registry.register_fn(|| {});
            registry.unregister(&t)
        });
        assert!(found);
        assert!(scope.is_empty());
    }

    #[test]
    fn clones_share_the_set() {
        let a = CleanupRegistry::new();
        let b = a.clone();
        a.register_fn(|| {});
        assert_eq!(b.len(), 1);
        b.flush_all();
        assert!(a.is_empty());
    }
}
