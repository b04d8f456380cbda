#![forbid(unsafe_code)]

//! sprig: a small client UI toolkit.
//!
//! Three pieces, layered:
//!
//! - [`sprig_core`]: [`Observable`] cells with synchronous change notification and
//!   the [`CleanupRegistry`] that tears bindings down in bulk.
//! - [`sprig_dom`]: the [`Materializer`], which builds nodes of any document
//!   [`Host`] from a tag, a [`Props`] bag, and children, binding observables
//!   as live text.
//! - [`sprig_router`]: a hash [`Router`] with [`navigate`] and [`link()`].
//!
//! With the `web` feature on `wasm32`, `sprig_web` provides the browser host and
//! hash location. Everywhere else, [`HeadlessHost`] and [`MemoryLocation`]
//! run the same code in memory.
//!
//! # Example
//!
//! ```
//! use sprig::prelude::*;
//!
//! let mat = Materializer::new(HeadlessHost::new());
//! let count = Observable::new(0);
//!
//! let c = count.clone();
//! let button = mat
//!     .h(
//!         "button",
//!         Props::new().on("click", move |_| {
//!             c.update(|n| n + 1);
//!         }),
//!         children!["Clicked ", &count, " times"],
//!     )
//!     .unwrap();
//!
//! button.click();
//! button.click();
//! assert_eq!(button.text_content(), "Clicked 2 times");
//! ```

pub use sprig_core;
pub use sprig_dom;
pub use sprig_router;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use sprig_web;

pub use sprig_core::{
    CleanupRegistry, Event, EventListener, FlushReport, Listener, Observable, SameValue,
    Subscription, Teardown, TextValue, Update,
};
pub use sprig_dom::{
    Child, HeadlessHost, Host, HostError, MaterializeError, Materializer, NodeRef, PropValue,
    Props, StyleMap, children,
};
pub use sprig_router::{
    MemoryLocation, Navigator, NavigatorError, RenderOutcome, Router, RouterConfig, RouterError,
    Routes, TeardownPolicy, link, navigate,
};

/// Everything needed to build a page.
pub mod prelude {
    pub use sprig_core::{CleanupRegistry, Event, Listener, Observable};
    pub use sprig_dom::{
        Child, HeadlessHost, Host, Materializer, NodeRef, Props, StyleMap, children,
    };
    pub use sprig_router::{MemoryLocation, Navigator, Router, Routes, link, navigate};
}
