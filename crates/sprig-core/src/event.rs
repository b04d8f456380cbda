#![forbid(unsafe_code)]

//! Host-independent events.
//!
//! Backends translate their native events into [`Event`] before invoking an
//! [`EventListener`], and read [`Event::default_prevented`] back afterwards
//! to suppress the platform's default action.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// An event delivered to an [`EventListener`].
#[derive(Debug)]
pub struct Event {
    kind: String,
    cancelable: bool,
    default_prevented: Cell<bool>,
}

impl Event {
    /// A non-cancelable event of the given type (e.g. `"input"`).
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            cancelable: false,
            default_prevented: Cell::new(false),
        }
    }

    /// A cancelable event of the given type (e.g. `"click"`).
    pub fn cancelable(kind: impl Into<String>) -> Self {
        Self {
            cancelable: true,
            ..Self::new(kind)
        }
    }

    /// Event type, lowercase by convention.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn is_cancelable(&self) -> bool {
        self.cancelable
    }

    /// Request that the host skip its default action.
    ///
    /// Has no effect on non-cancelable events, matching DOM semantics.
    pub fn prevent_default(&self) {
        if self.cancelable {
            self.default_prevented.set(true);
        }
    }

    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// A shared event callback compared by identity.
///
/// Removal from a host must target the exact listener that was added, so
/// equality is pointer identity, as with [`Callback`](crate::Callback).
#[derive(Clone)]
pub struct EventListener(Rc<dyn Fn(&Event)>);

impl EventListener {
    pub fn new(f: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for EventListener {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for EventListener {}

impl fmt::Debug for EventListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventListener")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prevent_default_on_cancelable() {
        let ev = Event::cancelable("click");
        assert!(!ev.default_prevented());
        ev.prevent_default();
        assert!(ev.default_prevented());
    }

    #[test]
    fn prevent_default_ignored_when_not_cancelable() {
        let ev = Event::new("input");
        ev.prevent_default();
        assert!(!ev.default_prevented());
    }

    #[test]
    fn listener_receives_event() {
        let seen = Rc::new(Cell::new(false));
        let s = Rc::clone(&seen);
        let listener = EventListener::new(move |ev| s.set(ev.kind() == "click"));
        listener.call(&Event::cancelable("click"));
        assert!(seen.get());
    }
}
