#![forbid(unsafe_code)]

//! Element materialization for sprig.
//!
//! # Role in sprig
//! `sprig-dom` turns a tag name, a property bag, and a list of children into
//! a real node of some document [`Host`]. It owns:
//!
//! - **[`Host`]**: the seam to the platform document (node creation,
//!   attributes, listeners, tree mutation).
//! - **[`HeadlessHost`]**: an in-memory document for tests and non-browser
//!   targets.
//! - **[`property`]**: the typed table deciding property vs. attribute
//!   assignment.
//! - **[`Materializer`]**: the `h(tag, props, children)` builder, including
//!   reactive text bindings and their teardown registration.
//!
//! # Example
//!
//! ```
//! use sprig_core::Observable;
//! use sprig_dom::{Child, HeadlessHost, Host, Materializer, Props};
//!
//! let mat = Materializer::new(HeadlessHost::new());
//! let count = Observable::new(0);
//! let el = mat
//!     .h("p", Props::new().set("id", "count"), [Child::from("Count: "), Child::from(&count)])
//!     .unwrap();
//! assert_eq!(mat.host().text_content(&el), "Count: 0");
//!
//! count.set(3);
//! assert_eq!(mat.host().text_content(&el), "Count: 3");
//! ```

pub mod child;
pub mod error;
pub mod headless;
pub mod host;
pub mod materialize;
pub mod property;
pub mod props;

pub use child::{Child, ReactiveText};
pub use error::{HostError, MaterializeError};
pub use headless::{HeadlessHost, NodeRef};
pub use host::Host;
pub use materialize::Materializer;
pub use property::{PropertyKind, PropertySpec, PropertyValue, Scalar, is_event_handler};
pub use props::{PropValue, Props, StyleMap};

/// Build a `Vec<Child<_>>` from heterogeneous values.
///
/// Each expression is converted with `Child::from`, so strings, numbers,
/// booleans (holes), options, and `&Observable<_>` can be mixed freely.
/// Wrap host nodes with [`Child::node`] unless the host's node type has a
/// `From` impl (as [`NodeRef`] does).
#[macro_export]
macro_rules! children {
    () => { ::std::vec::Vec::new() };
    ($($child:expr),+ $(,)?) => {
        ::std::vec![$($crate::Child::from($child)),+]
    };
}
