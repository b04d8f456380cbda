#![forbid(unsafe_code)]

//! Browser backend for sprig.
//!
//! - [`WebHost`]: [`sprig_dom::Host`] over the real document via `web_sys`.
//! - [`HashLocation`]: [`sprig_router::Navigator`] over `location.hash` and
//!   the `hashchange` event.
//! - [`install_panic_hook`], [`console_error`], [`mount_point`]: startup glue.
//!
//! Everything except the listener bookkeeping is compiled on `wasm32` only;
//! on other targets this crate is empty.
//!
//! ```ignore
//! use sprig_dom::{Child, Materializer, Props};
//! use sprig_router::{Router, Routes};
//! use sprig_web::{HashLocation, WebHost, install_panic_hook, mount_point};
//!
//! install_panic_hook();
//! let mat = Materializer::new(WebHost::new()?);
//! let home = mat.clone();
//! let routes =
//!     Routes::new().route("/", move || home.h("h1", Props::new(), [Child::from("Home")]));
//! let router = Router::new(mat, HashLocation::new()?);
//! router.init(mount_point("#app")?, routes)?;
//! // The router lives as long as the page.
//! router.forget();
//! ```

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod bindings;

#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod location;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use host::WebHost;
#[cfg(target_arch = "wasm32")]
pub use location::HashLocation;
#[cfg(target_arch = "wasm32")]
pub use wasm::{console_error, install_panic_hook, mount_point};
