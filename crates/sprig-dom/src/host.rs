#![forbid(unsafe_code)]

//! The document host seam.
//!
//! sprig never touches a platform document directly. Everything it needs
//! (creating nodes, setting attributes and properties, attaching listeners,
//! mutating the tree) goes through [`Host`]. `sprig-web` implements it over
//! `web-sys`; [`HeadlessHost`](crate::HeadlessHost) implements it in memory.
//!
//! Hosts are cheap handles: `Clone` shares the underlying document, so the
//! materializer can move a clone into each binding closure.

use sprig_core::EventListener;

use crate::error::HostError;
use crate::property::PropertyValue;

/// A document that sprig can build into.
pub trait Host: Clone + 'static {
    /// Handle to a node in this document. Equality is node identity.
    type Node: Clone + PartialEq + std::fmt::Debug + 'static;

    fn create_element(&self, tag: &str) -> Result<Self::Node, HostError>;

    fn create_text_node(&self, text: &str) -> Result<Self::Node, HostError>;

    /// Replace the text of a text node, or all children of an element with a
    /// single text node.
    fn set_text_content(&self, node: &Self::Node, text: &str) -> Result<(), HostError>;

    /// Concatenated text of `node` and its descendants.
    fn text_content(&self, node: &Self::Node) -> String;

    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> Result<(), HostError>;

    fn get_attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Assign one entry of the element's live style object. Later writes to
    /// the same name overwrite earlier ones.
    fn set_style_property(&self, node: &Self::Node, name: &str, value: &str)
    -> Result<(), HostError>;

    /// Assign a native property. Only called for names the
    /// [`property`](crate::property) table knows for the element's tag.
    fn set_property(
        &self,
        node: &Self::Node,
        name: &str,
        value: &PropertyValue,
    ) -> Result<(), HostError>;

    fn add_event_listener(
        &self,
        node: &Self::Node,
        event: &str,
        listener: &EventListener,
    ) -> Result<(), HostError>;

    /// Remove exactly `listener` for `event`. Removing a listener that is not
    /// attached is a no-op.
    fn remove_event_listener(
        &self,
        node: &Self::Node,
        event: &str,
        listener: &EventListener,
    ) -> Result<(), HostError>;

    /// Append `child` to `parent`, detaching it from any previous parent.
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError>;

    /// Replace all children of `parent` with `child`.
    fn replace_children(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError>;

    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;
}
