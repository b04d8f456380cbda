#![forbid(unsafe_code)]

//! Failure isolation for user callbacks.
//!
//! Listener fan-out (cell notifications, event dispatch, cleanup flushes)
//! must keep going when one callback fails. Callbacks are infallible
//! closures, so "failure" means a panic; [`run_isolated`] contains it, logs
//! it, and reports whether the callback completed.
//!
//! Containment requires unwinding. Under `panic = "abort"` (and on
//! `wasm32-unknown-unknown`, which always aborts) a panicking callback still
//! takes the process down.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Run `f`, containing any panic it raises.
///
/// Returns `true` when `f` ran to completion. `context` names the kind of
/// callback in the log record.
pub fn run_isolated(context: &'static str, f: impl FnOnce()) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => true,
        Err(payload) => {
            tracing::warn!(
                context,
                panic = panic_message(payload.as_ref()),
                "callback panicked; continuing with remaining callbacks"
            );
            false
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}
