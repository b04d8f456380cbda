#![forbid(unsafe_code)]

//! Browser glue: console reporting, panic hook, mount lookup.
//!
//! Only compiled on `wasm32` targets.

use js_sys::Reflect;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Node;

use sprig_dom::HostError;

use crate::host::js_message;

/// Write `msg` with `console.error`, if there is a console.
pub fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

/// Route panic messages to the browser console. Idempotent.
pub fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

/// The first element matching `selector`, for use as a router mount.
pub fn mount_point(selector: &str) -> Result<Node, HostError> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| HostError::new("mount_point", "no global document"))?;
    document
        .query_selector(selector)
        .map_err(|err| HostError::new("mount_point", js_message(&err)))?
        .map(Node::from)
        .ok_or_else(|| HostError::new("mount_point", format!("nothing matches {selector:?}")))
}
