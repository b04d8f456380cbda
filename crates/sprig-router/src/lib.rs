#![forbid(unsafe_code)]

//! Hash-fragment routing for sprig.
//!
//! # Role in sprig
//! `sprig-router` swaps whole pages in and out of one mount element based on
//! an external navigation signal:
//!
//! - **[`Navigator`]**: the signal (a path fragment plus a change
//!   notification). [`MemoryLocation`] is the in-process implementation;
//!   `sprig-web` provides one over `window.location.hash`.
//! - **[`Routes`]**: path → render function.
//! - **[`Router`]**: subscribes to the navigator and re-renders on change.
//! - **[`navigate`] / [`link()`]**: write the signal, directly or from an
//!   anchor's click.
//!
//! # Example
//!
//! ```
//! use sprig_dom::{Child, HeadlessHost, Materializer, Props};
//! use sprig_router::{MemoryLocation, Router, Routes, navigate};
//!
//! let mat = Materializer::new(HeadlessHost::new());
//! let mount = mat.h("div", Props::new().set("id", "app"), []).unwrap();
//! let location = MemoryLocation::new();
//!
//! let home = mat.clone();
//! let about = mat.clone();
//! let routes = Routes::new()
//!     .route("/", move || home.h("h1", Props::new(), [Child::from("Home")]))
//!     .route("/about", move || about.h("h1", Props::new(), [Child::from("About")]));
//!
//! let router = Router::new(mat, location.clone());
//! router.init(mount.clone(), routes).unwrap();
//! assert_eq!(mount.text_content(), "Home");
//!
//! navigate(&location, "about").unwrap();
//! location.dispatch_hash_change();
//! assert_eq!(mount.text_content(), "About");
//! ```

pub mod link;
pub mod navigator;
pub mod router;
pub mod routes;

pub use link::{link, navigate};
pub use navigator::{MemoryLocation, Navigator, NavigatorError};
pub use router::{
    RenderOutcome, Router, RouterConfig, RouterError, RouterState, TeardownPolicy, canonical_path,
    normalize_target,
};
pub use routes::{RenderFn, Routes};
