#![forbid(unsafe_code)]

//! The external navigation signal.
//!
//! A [`Navigator`] is the router's view of "where the user is": a readable
//! and writable path fragment plus a change notification. In a browser this
//! is `location.hash` and the `hashchange` event; [`MemoryLocation`] is the
//! in-process equivalent.
//!
//! Writing the fragment is expected to eventually fire the change
//! notification, but whether it does so synchronously is up to the
//! implementation. The router never renders from a write directly.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use sprig_core::{Listener, run_isolated};

/// The navigation signal rejected a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorError {
    pub message: String,
}

impl NavigatorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for NavigatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "navigation failed: {}", self.message)
    }
}

impl std::error::Error for NavigatorError {}

/// Readable, writable, observable path fragment.
///
/// Clones must share state: a listener subscribed through one clone is
/// notified for writes made through another.
pub trait Navigator: Clone + 'static {
    /// Current fragment without the leading `#` (empty when unset).
    fn fragment(&self) -> String;

    /// Replace the fragment. A leading `#` is ignored.
    fn set_fragment(&self, fragment: &str) -> Result<(), NavigatorError>;

    /// Register a change listener. Idempotent by identity.
    fn subscribe(&self, listener: &Listener);

    /// Remove a change listener. No-op when absent.
    fn unsubscribe(&self, listener: &Listener);
}

#[derive(Default)]
struct MemoryState {
    fragment: RefCell<String>,
    listeners: RefCell<Vec<Listener>>,
    auto_dispatch: Cell<bool>,
    dispatched: Cell<u64>,
}

/// In-memory navigator with `location.hash` semantics.
///
/// By default a write does not notify anyone; call
/// [`dispatch_hash_change`](Self::dispatch_hash_change) to deliver the
/// change, as a test harness without a real browser has to. With
/// [`with_auto_dispatch`](Self::with_auto_dispatch) every write that changes
/// the fragment notifies synchronously, like a browser would (minus the task
/// boundary).
#[derive(Clone, Default)]
pub struct MemoryLocation {
    state: Rc<MemoryState>,
}

impl MemoryLocation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A location that notifies on every changing write.
    #[must_use]
    pub fn with_auto_dispatch() -> Self {
        let location = Self::new();
        location.state.auto_dispatch.set(true);
        location
    }

    /// Start at `fragment` without notifying.
    #[must_use]
    pub fn at(fragment: &str) -> Self {
        let location = Self::new();
        *location.state.fragment.borrow_mut() = strip_hash(fragment).to_owned();
        location
    }

    /// The externally visible form: `#/about`, or empty when no fragment is
    /// set.
    #[must_use]
    pub fn hash(&self) -> String {
        let fragment = self.state.fragment.borrow();
        if fragment.is_empty() {
            String::new()
        } else {
            format!("#{fragment}")
        }
    }

    /// Notify every listener, in registration order.
    pub fn dispatch_hash_change(&self) {
        let snapshot = self.state.listeners.borrow().clone();
        self.state.dispatched.set(self.state.dispatched.get() + 1);
        tracing::trace!(
            listeners = snapshot.len(),
            fragment = %self.state.fragment.borrow(),
            "hashchange dispatched"
        );
        for listener in &snapshot {
            run_isolated("hashchange listener", || listener.call());
        }
    }

    /// Number of change notifications delivered so far.
    #[must_use]
    pub fn dispatch_count(&self) -> u64 {
        self.state.dispatched.get()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.state.listeners.borrow().len()
    }
}

impl Navigator for MemoryLocation {
    fn fragment(&self) -> String {
        self.state.fragment.borrow().clone()
    }

    fn set_fragment(&self, fragment: &str) -> Result<(), NavigatorError> {
        let fragment = strip_hash(fragment);
        let changed = {
            let mut current = self.state.fragment.borrow_mut();
            if *current == fragment {
                false
            } else {
                fragment.clone_into(&mut current);
                true
            }
        };
        if changed && self.state.auto_dispatch.get() {
            self.dispatch_hash_change();
        }
        Ok(())
    }

    fn subscribe(&self, listener: &Listener) {
        let mut listeners = self.state.listeners.borrow_mut();
        if !listeners.iter().any(|l| l.ptr_eq(listener)) {
            listeners.push(listener.clone());
        }
    }

    fn unsubscribe(&self, listener: &Listener) {
        self.state
            .listeners
            .borrow_mut()
            .retain(|l| !l.ptr_eq(listener));
    }
}

impl fmt::Debug for MemoryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryLocation")
            .field("fragment", &self.state.fragment.borrow())
            .field("listeners", &self.listener_count())
            .field("auto_dispatch", &self.state.auto_dispatch.get())
            .finish()
    }
}

pub(crate) fn strip_hash(fragment: &str) -> &str {
    fragment.strip_prefix('#').unwrap_or(fragment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(location: &MemoryLocation) -> Rc<Cell<u32>> {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        location.subscribe(&Listener::new(move || h.set(h.get() + 1)));
        hits
    }

    #[test]
    fn hash_form() {
        let location = MemoryLocation::new();
        assert_eq!(location.hash(), "");
        location.set_fragment("/about").unwrap();
        assert_eq!(location.hash(), "#/about");
        assert_eq!(location.fragment(), "/about");
        location.set_fragment("#/x").unwrap();
        assert_eq!(location.fragment(), "/x");
        location.set_fragment("").unwrap();
        assert_eq!(location.hash(), "");
    }

    #[test]
    fn writes_do_not_notify_by_default() {
        let location = MemoryLocation::new();
        let hits = counter(&location);
        location.set_fragment("/a").unwrap();
        assert_eq!(hits.get(), 0);
        location.dispatch_hash_change();
        assert_eq!(hits.get(), 1);
        assert_eq!(location.dispatch_count(), 1);
    }

    #[test]
    fn auto_dispatch_fires_only_on_change() {
        let location = MemoryLocation::with_auto_dispatch();
        let hits = counter(&location);
        location.set_fragment("/a").unwrap();
        location.set_fragment("#/a").unwrap();
        location.set_fragment("/b").unwrap();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn clones_share_state() {
        let location = MemoryLocation::new();
        let other = location.clone();
        let hits = counter(&other);
        location.set_fragment("/shared").unwrap();
        location.dispatch_hash_change();
        assert_eq!(other.fragment(), "/shared");
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn subscribe_is_idempotent_and_unsubscribe_silences() {
        let location = MemoryLocation::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let listener = Listener::new(move || h.set(h.get() + 1));
        location.subscribe(&listener);
        location.subscribe(&listener);
        assert_eq!(location.listener_count(), 1);
        location.dispatch_hash_change();
        location.unsubscribe(&listener);
        location.dispatch_hash_change();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn panicking_listener_does_not_block_others() {
        let location = MemoryLocation::at("#/start");
        location.subscribe(&Listener::new(|| panic!("listener bug")));
        let hits = counter(&location);
        location.dispatch_hash_change();
        assert_eq!(hits.get(), 1);
        assert_eq!(location.fragment(), "/start");
    }
}
