#![forbid(unsafe_code)]

//! Core: reactive cells, teardown bookkeeping, and host-independent events.
//!
//! # Role in sprig
//! `sprig-core` knows nothing about documents or elements. It owns the pieces
//! every other crate shares:
//!
//! - **[`Observable`]**: a single mutable value with synchronous change
//!   notification.
//! - **[`CleanupRegistry`]**: a lifecycle-scoped set of teardown callbacks,
//!   flushed in bulk.
//! - **[`Event`] / [`EventListener`]**: the event shape handed to listeners
//!   by any host backend.
//! - **[`TextValue`]**: how values become text content, including "holes"
//!   that render as nothing.
//!
//! # How it fits in the system
//! `sprig-dom` wires observables into text nodes and registers teardowns in a
//! [`CleanupRegistry`]; `sprig-router` re-runs that wiring on every route
//! change. Everything runs synchronously on one thread, so shared state uses
//! `Rc<RefCell<..>>` rather than locks.

pub mod callback;
pub mod event;
pub mod isolate;
pub mod reactive;
pub mod same_value;
pub mod text;

pub use callback::{Callback, Listener, Teardown};
pub use event::{Event, EventListener};
pub use isolate::run_isolated;
pub use reactive::{CleanupRegistry, FlushReport, Observable, Subscription, Update};
pub use same_value::SameValue;
pub use text::{TextValue, format_number};
