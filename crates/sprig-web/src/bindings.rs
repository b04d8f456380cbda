#![forbid(unsafe_code)]

//! Bookkeeping for listeners handed to the platform.
//!
//! The platform only accepts its own function objects, so every
//! [`EventListener`] attached to a node is wrapped once, and the wrapper must
//! be kept alive until it is removed. Removal has to pass the platform the
//! very same wrapper, which is found here by `(node, event, listener
//! identity)`.

use sprig_core::EventListener;

struct Binding<N, C> {
    node: N,
    event: String,
    listener: EventListener,
    wrapper: C,
}

impl<N: PartialEq, C> Binding<N, C> {
    fn matches(&self, node: &N, event: &str, listener: &EventListener) -> bool {
        self.node == *node && self.event == event && self.listener.ptr_eq(listener)
    }
}

/// Live wrappers keyed by node, event name, and listener identity.
pub(crate) struct ListenerBindings<N, C> {
    entries: Vec<Binding<N, C>>,
}

impl<N: PartialEq, C> ListenerBindings<N, C> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn contains(&self, node: &N, event: &str, listener: &EventListener) -> bool {
        self.entries
            .iter()
            .any(|b| b.matches(node, event, listener))
    }

    /// Record `wrapper`. An existing binding for the same key is kept and the
    /// new wrapper is handed back.
    pub(crate) fn insert(
        &mut self,
        node: N,
        event: &str,
        listener: EventListener,
        wrapper: C,
    ) -> Option<C> {
        if self.contains(&node, event, &listener) {
            return Some(wrapper);
        }
        self.entries.push(Binding {
            node,
            event: event.to_owned(),
            listener,
            wrapper,
        });
        None
    }

    /// Take the wrapper for this key out of the table.
    pub(crate) fn remove(&mut self, node: &N, event: &str, listener: &EventListener) -> Option<C> {
        let index = self
            .entries
            .iter()
            .position(|b| b.matches(node, event, listener))?;
        Some(self.entries.swap_remove(index).wrapper)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn insert_is_keyed_by_identity() {
        let mut table = ListenerBindings::new();
        let a = EventListener::new(|_| {});
        let b = EventListener::new(|_| {});

        assert_eq!(table.insert(1, "click", a.clone(), "wa"), None);
        assert_eq!(table.insert(1, "click", a.clone(), "dup"), Some("dup"));
        assert_eq!(table.insert(1, "click", b.clone(), "wb"), None);
        assert_eq!(table.insert(2, "click", a.clone(), "wa2"), None);
        assert_eq!(table.insert(1, "input", a.clone(), "wa3"), None);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn remove_returns_the_original_wrapper() {
        let mut table = ListenerBindings::new();
        let a = EventListener::new(|_| {});
        table.insert("n", "click", a.clone(), 10);
        table.insert("n", "keydown", a.clone(), 20);

        assert_eq!(table.remove(&"n", "keydown", &a), Some(20));
        assert_eq!(table.remove(&"n", "keydown", &a), None);
        assert!(table.contains(&"n", "click", &a));
        assert_eq!(table.remove(&"m", "click", &a), None);
        assert_eq!(table.len(), 1);
    }
}
