#![forbid(unsafe_code)]

//! [`Navigator`] over `window.location.hash`.
//!
//! Only compiled on `wasm32` targets.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use sprig_core::{Listener, run_isolated};
use sprig_router::{Navigator, NavigatorError};

use crate::host::js_message;

struct Shared {
    window: Window,
    listeners: RefCell<Vec<Listener>>,
    on_hash_change: RefCell<Option<Closure<dyn Fn()>>>,
}

impl Shared {
    fn dispatch(&self) {
        let snapshot = self.listeners.borrow().clone();
        tracing::debug!(listeners = snapshot.len(), "hashchange");
        for listener in &snapshot {
            run_isolated("hashchange listener", || listener.call());
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Some(handler) = self.on_hash_change.get_mut().take() {
            let _ = self.window.remove_event_listener_with_callback(
                "hashchange",
                handler.as_ref().unchecked_ref(),
            );
        }
    }
}

/// The browser's hash fragment and its `hashchange` event.
///
/// One `hashchange` handler is installed on the window per location (and
/// its clones) and removed when the last clone is dropped.
#[derive(Clone)]
pub struct HashLocation {
    shared: Rc<Shared>,
}

impl HashLocation {
    pub fn new() -> Result<Self, NavigatorError> {
        let window = web_sys::window().ok_or_else(|| NavigatorError::new("no global window"))?;
        let shared = Rc::new(Shared {
            window,
            listeners: RefCell::new(Vec::new()),
            on_hash_change: RefCell::new(None),
        });

        let weak: Weak<Shared> = Rc::downgrade(&shared);
        let handler = Closure::<dyn Fn()>::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.dispatch();
            }
        });
        shared
            .window
            .add_event_listener_with_callback("hashchange", handler.as_ref().unchecked_ref())
            .map_err(|err| NavigatorError::new(js_message(&err)))?;
        *shared.on_hash_change.borrow_mut() = Some(handler);

        Ok(Self { shared })
    }

    /// The externally visible form, `#/about`.
    #[must_use]
    pub fn hash(&self) -> String {
        self.shared.window.location().hash().unwrap_or_default()
    }
}

impl Navigator for HashLocation {
    fn fragment(&self) -> String {
        let hash = self.hash();
        hash.strip_prefix('#').unwrap_or(&hash).to_owned()
    }

    fn set_fragment(&self, fragment: &str) -> Result<(), NavigatorError> {
        self.shared
            .window
            .location()
            .set_hash(fragment)
            .map_err(|err| NavigatorError::new(js_message(&err)))
    }

    fn subscribe(&self, listener: &Listener) {
        let mut listeners = self.shared.listeners.borrow_mut();
        if !listeners.iter().any(|l| l.ptr_eq(listener)) {
            listeners.push(listener.clone());
        }
    }

    fn unsubscribe(&self, listener: &Listener) {
        self.shared
            .listeners
            .borrow_mut()
            .retain(|l| !l.ptr_eq(listener));
    }
}

impl fmt::Debug for HashLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashLocation")
            .field("hash", &self.hash())
            .field("listeners", &self.shared.listeners.borrow().len())
            .finish()
    }
}
