#![forbid(unsafe_code)]

//! Headless document for tests and non-browser targets.
//!
//! `HeadlessHost` implements [`Host`] over an in-memory node tree. It is
//! designed for:
//!
//! - **Unit and integration tests** of materialization and routing without a
//!   browser or JS engine
//! - **Snapshot testing** through [`NodeRef::outer_html`]
//! - **Event simulation** through [`NodeRef::dispatch_event`] and
//!   [`NodeRef::click`]
//!
//! Nodes are `Rc` handles; equality is node identity. Property writes for
//! reflected properties (`id`, `className`, `href`, ...) update the matching
//! attribute, as a browser would.
//!
//! # Example
//!
//! ```
//! use sprig_dom::{HeadlessHost, Host};
//!
//! let host = HeadlessHost::new();
//! let div = host.create_element("div").unwrap();
//! let text = host.create_text_node("hello").unwrap();
//! host.append_child(&div, &text).unwrap();
//! host.set_attribute(&div, "class", "greeting").unwrap();
//! assert_eq!(div.outer_html(), r#"<div class="greeting">hello</div>"#);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use sprig_core::{Event, EventListener, format_number, run_isolated};

use crate::child::Child;
use crate::error::HostError;
use crate::host::Host;
use crate::property::{self, PropertyValue};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Default)]
struct ElementData {
    tag: String,
    attributes: Vec<(String, String)>,
    properties: Vec<(String, PropertyValue)>,
    style: Vec<(String, String)>,
    listeners: Vec<(String, EventListener)>,
}

#[derive(Debug)]
enum NodeKind {
    Element(ElementData),
    Text(String),
}

struct NodeData {
    kind: NodeKind,
    parent: Weak<RefCell<NodeData>>,
    children: Vec<NodeRef>,
}

/// Handle to a node of a [`HeadlessHost`] document.
#[derive(Clone)]
pub struct NodeRef(Rc<RefCell<NodeData>>);

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for NodeRef {}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.borrow().kind {
            NodeKind::Element(el) => write!(f, "NodeRef(<{}>)", el.tag),
            NodeKind::Text(text) => write!(f, "NodeRef(#text {text:?})"),
        }
    }
}

impl NodeRef {
    fn new(kind: NodeKind) -> Self {
        Self(Rc::new(RefCell::new(NodeData {
            kind,
            parent: Weak::new(),
            children: Vec::new(),
        })))
    }

    fn with_element<R>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut ElementData) -> R,
    ) -> Result<R, HostError> {
        match &mut self.0.borrow_mut().kind {
            NodeKind::Element(el) => Ok(f(el)),
            NodeKind::Text(_) => Err(HostError::new(op, "node is not an element")),
        }
    }

    /// Lowercase tag name, or `None` for text nodes.
    #[must_use]
    pub fn tag_name(&self) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Element(el) => Some(el.tag.clone()),
            NodeKind::Text(_) => None,
        }
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self.0.borrow().kind, NodeKind::Text(_))
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeRef> {
        self.0.borrow().parent.upgrade().map(NodeRef)
    }

    #[must_use]
    pub fn children(&self) -> Vec<NodeRef> {
        self.0.borrow().children.clone()
    }

    #[must_use]
    pub fn text_content(&self) -> String {
        let data = self.0.borrow();
        match &data.kind {
            NodeKind::Text(text) => text.clone(),
            NodeKind::Element(_) => data.children.iter().map(NodeRef::text_content).collect(),
        }
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Element(el) => el
                .attributes
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone()),
            NodeKind::Text(_) => None,
        }
    }

    /// Native property value. Reflected properties that were never assigned
    /// read their attribute.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<PropertyValue> {
        let tag = self.tag_name()?;
        let stored = self.with_element("property", |el| {
            el.properties
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        });
        if let Ok(Some(value)) = stored {
            return Some(value);
        }
        let spec = property::lookup(&tag, name)?;
        let attr = self.attribute(spec.reflects?);
        Some(match spec.kind {
            property::PropertyKind::Bool => PropertyValue::Bool(attr.is_some()),
            kind => kind.coerce(&property::Scalar::Text(attr.unwrap_or_default())),
        })
    }

    /// Entry of the element's style object.
    #[must_use]
    pub fn style_property(&self, name: &str) -> Option<String> {
        self.with_element("style_property", |el| {
            el.style
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        })
        .ok()
        .flatten()
    }

    /// Number of listeners attached for `event`.
    #[must_use]
    pub fn listener_count(&self, event: &str) -> usize {
        self.with_element("listener_count", |el| {
            el.listeners.iter().filter(|(e, _)| e == event).count()
        })
        .unwrap_or(0)
    }

    /// Deliver `event` to this node's listeners for its type, in attachment
    /// order. A panicking listener is contained and the rest still run.
    ///
    /// Returns `false` if a listener called
    /// [`prevent_default`](Event::prevent_default).
    pub fn dispatch_event(&self, event: &Event) -> bool {
        let listeners: Vec<EventListener> = self
            .with_element("dispatch_event", |el| {
                el.listeners
                    .iter()
                    .filter(|(e, _)| e == event.kind())
                    .map(|(_, l)| l.clone())
                    .collect()
            })
            .unwrap_or_default();
        for listener in &listeners {
            run_isolated("dom event listener", || listener.call(event));
        }
        !event.default_prevented()
    }

    /// Dispatch a cancelable `click`. Returns `false` if the default action
    /// was prevented.
    pub fn click(&self) -> bool {
        self.dispatch_event(&Event::cancelable("click"))
    }

    /// Serialize the subtree as HTML.
    #[must_use]
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let data = self.0.borrow();
        let el = match &data.kind {
            NodeKind::Text(text) => {
                out.push_str(&escape_text(text));
                return;
            }
            NodeKind::Element(el) => el,
        };

        out.push('<');
        out.push_str(&el.tag);
        for (name, value) in &el.attributes {
            if name == "style" && !el.style.is_empty() {
                continue;
            }
            push_attribute(out, name, value);
        }
        if !el.style.is_empty() {
            let css = el
                .style
                .iter()
                .map(|(k, v)| format!("{}: {v}", kebab_case(k)))
                .collect::<Vec<_>>()
                .join("; ");
            push_attribute(out, "style", &css);
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&el.tag.as_str()) {
            return;
        }
        for child in &data.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&el.tag);
        out.push('>');
    }

    fn is_ancestor_of(&self, node: &NodeRef) -> bool {
        let mut cursor = Some(node.clone());
        while let Some(current) = cursor {
            if current == *self {
                return true;
            }
            cursor = current.parent();
        }
        false
    }

    fn detach(&self) {
        let Some(parent) = self.parent() else {
            return;
        };
        parent.0.borrow_mut().children.retain(|c| c != self);
        self.0.borrow_mut().parent = Weak::new();
    }

    fn clear_children(&self) {
        let old = std::mem::take(&mut self.0.borrow_mut().children);
        for child in old {
            child.0.borrow_mut().parent = Weak::new();
        }
    }
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&value.replace('&', "&amp;").replace('"', "&quot;"));
    out.push('"');
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn valid_tag_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| {
                c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '>' | '/' | '=')
            })
}

/// In-memory [`Host`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessHost;

impl HeadlessHost {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Host for HeadlessHost {
    type Node = NodeRef;

    fn create_element(&self, tag: &str) -> Result<NodeRef, HostError> {
        if !valid_tag_name(tag) {
            return Err(HostError::new("create_element", format!("invalid tag name {tag:?}")));
        }
        Ok(NodeRef::new(NodeKind::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            ..ElementData::default()
        })))
    }

    fn create_text_node(&self, text: &str) -> Result<NodeRef, HostError> {
        Ok(NodeRef::new(NodeKind::Text(text.to_owned())))
    }

    fn set_text_content(&self, node: &NodeRef, text: &str) -> Result<(), HostError> {
        if let NodeKind::Text(current) = &mut node.0.borrow_mut().kind {
            text.clone_into(current);
            return Ok(());
        }
        node.clear_children();
        if !text.is_empty() {
            let child = self.create_text_node(text)?;
            self.append_child(node, &child)?;
        }
        Ok(())
    }

    fn text_content(&self, node: &NodeRef) -> String {
        node.text_content()
    }

    fn set_attribute(&self, node: &NodeRef, name: &str, value: &str) -> Result<(), HostError> {
        if !valid_attribute_name(name) {
            return Err(HostError::new("set_attribute", format!("invalid attribute name {name:?}")));
        }
        node.with_element("set_attribute", |el| {
            match el.attributes.iter_mut().find(|(k, _)| k == name) {
                Some(slot) => value.clone_into(&mut slot.1),
                None => el.attributes.push((name.to_owned(), value.to_owned())),
            }
        })
    }

    fn get_attribute(&self, node: &NodeRef, name: &str) -> Option<String> {
        node.attribute(name)
    }

    fn set_style_property(&self, node: &NodeRef, name: &str, value: &str) -> Result<(), HostError> {
        node.with_element("set_style_property", |el| {
            match el.style.iter_mut().find(|(k, _)| k == name) {
                Some(slot) => value.clone_into(&mut slot.1),
                None => el.style.push((name.to_owned(), value.to_owned())),
            }
        })
    }

    fn set_property(
        &self,
        node: &NodeRef,
        name: &str,
        value: &PropertyValue,
    ) -> Result<(), HostError> {
        let Some(tag) = node.tag_name() else {
            return Err(HostError::new("set_property", "node is not an element"));
        };
        if matches!(name, "textContent" | "innerText") {
            let text = match value {
                PropertyValue::Text(s) => s.clone(),
                PropertyValue::Number(n) => format_number(*n),
                PropertyValue::Bool(b) => b.to_string(),
            };
            return self.set_text_content(node, &text);
        }

        node.with_element("set_property", |el| {
            match el.properties.iter_mut().find(|(k, _)| k == name) {
                Some(slot) => slot.1 = value.clone(),
                None => el.properties.push((name.to_owned(), value.clone())),
            }
        })?;

        tracing::trace!(tag = %tag, name, "property assigned");
        let Some(attr) = property::lookup(&tag, name).and_then(|spec| spec.reflects) else {
            return Ok(());
        };
        match value.reflected() {
            Some(text) => self.set_attribute(node, attr, &text),
            None => {
                node.with_element("set_property", |el| el.attributes.retain(|(k, _)| k != attr))
            }
        }
    }

    fn add_event_listener(
        &self,
        node: &NodeRef,
        event: &str,
        listener: &EventListener,
    ) -> Result<(), HostError> {
        node.with_element("add_event_listener", |el| {
            let present = el
                .listeners
                .iter()
                .any(|(e, l)| e == event && l.ptr_eq(listener));
            if !present {
                el.listeners.push((event.to_owned(), listener.clone()));
            }
        })
    }

    fn remove_event_listener(
        &self,
        node: &NodeRef,
        event: &str,
        listener: &EventListener,
    ) -> Result<(), HostError> {
        node.with_element("remove_event_listener", |el| {
            el.listeners.retain(|(e, l)| !(e == event && l.ptr_eq(listener)));
        })
    }

    fn append_child(&self, parent: &NodeRef, child: &NodeRef) -> Result<(), HostError> {
        if parent.is_text() {
            return Err(HostError::new("append_child", "text nodes cannot have children"));
        }
        if child.is_ancestor_of(parent) {
            return Err(HostError::new(
                "append_child",
                "the new child is an ancestor of the parent",
            ));
        }
        child.detach();
        child.0.borrow_mut().parent = Rc::downgrade(&parent.0);
        parent.0.borrow_mut().children.push(child.clone());
        Ok(())
    }

    fn replace_children(&self, parent: &NodeRef, child: &NodeRef) -> Result<(), HostError> {
        if child.is_ancestor_of(parent) {
            return Err(HostError::new(
                "replace_children",
                "the new child is an ancestor of the parent",
            ));
        }
        parent.clear_children();
        self.append_child(parent, child)
    }

    fn children(&self, node: &NodeRef) -> Vec<NodeRef> {
        node.children()
    }
}

impl From<NodeRef> for Child<NodeRef> {
    fn from(node: NodeRef) -> Self {
        Self::Node(node)
    }
}

impl From<&NodeRef> for Child<NodeRef> {
    fn from(node: &NodeRef) -> Self {
        Self::Node(node.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    fn host() -> HeadlessHost {
        HeadlessHost::new()
    }

    #[test]
    fn invalid_tag_is_rejected() {
        assert!(host().create_element("").is_err());
        assert!(host().create_element("1div").is_err());
        assert!(host().create_element("my-widget").is_ok());
    }

    #[test]
    fn tag_is_lowercased() {
        let el = host().create_element("DIV").unwrap();
        assert_eq!(el.tag_name().as_deref(), Some("div"));
    }

    #[test]
    fn append_moves_node_between_parents() {
        let h = host();
        let a = h.create_element("div").unwrap();
        let b = h.create_element("div").unwrap();
        let t = h.create_text_node("x").unwrap();
        h.append_child(&a, &t).unwrap();
        h.append_child(&b, &t).unwrap();
        assert!(a.children().is_empty());
        assert_eq!(b.children(), vec![t.clone()]);
        assert_eq!(t.parent(), Some(b));
    }

    #[test]
    fn cycles_are_rejected() {
        let h = host();
        let outer = h.create_element("div").unwrap();
        let inner = h.create_element("div").unwrap();
        h.append_child(&outer, &inner).unwrap();
        assert!(h.append_child(&inner, &outer).is_err());
        assert!(h.append_child(&inner, &inner).is_err());
    }

    #[test]
    fn replace_children_detaches_old() {
        let h = host();
        let root = h.create_element("main").unwrap();
        let old = h.create_text_node("old").unwrap();
        let new = h.create_text_node("new").unwrap();
        h.append_child(&root, &old).unwrap();
        h.replace_children(&root, &new).unwrap();
        assert_eq!(root.text_content(), "new");
        assert_eq!(old.parent(), None);
    }

    #[test]
    fn set_text_content_on_element_replaces_children() {
        let h = host();
        let p = h.create_element("p").unwrap();
        h.append_child(&p, &h.create_element("b").unwrap()).unwrap();
        h.set_text_content(&p, "plain").unwrap();
        assert_eq!(p.outer_html(), "<p>plain</p>");
        h.set_text_content(&p, "").unwrap();
        assert!(p.children().is_empty());
    }

    #[test]
    fn reflected_properties_update_attributes() {
        let h = host();
        let input = h.create_element("input").unwrap();
        h.set_property(&input, "className", &PropertyValue::Text("wide".into())).unwrap();
        h.set_property(&input, "disabled", &PropertyValue::Bool(true)).unwrap();
        h.set_property(&input, "value", &PropertyValue::Text("typed".into())).unwrap();
        assert_eq!(input.attribute("class").as_deref(), Some("wide"));
        assert_eq!(input.attribute("disabled").as_deref(), Some(""));
        assert_eq!(input.attribute("value"), None);
        assert_eq!(input.property("value"), Some(PropertyValue::Text("typed".into())));

        h.set_property(&input, "disabled", &PropertyValue::Bool(false)).unwrap();
        assert_eq!(input.attribute("disabled"), None);
    }

    #[test]
    fn unassigned_reflected_property_reads_attribute() {
        let h = host();
        let a = h.create_element("a").unwrap();
        h.set_attribute(&a, "href", "#/x").unwrap();
        assert_eq!(a.property("href"), Some(PropertyValue::Text("#/x".into())));
        assert_eq!(a.property("hidden"), Some(PropertyValue::Bool(false)));
    }

    #[test]
    fn invalid_attribute_name_is_rejected() {
        let h = host();
        let div = h.create_element("div").unwrap();
        assert!(h.set_attribute(&div, "bad name", "x").is_err());
        assert!(h.set_attribute(&div, "", "x").is_err());
    }

    #[test]
    fn listeners_are_a_set_per_event() {
        let h = host();
        let btn = h.create_element("button").unwrap();
        let hits = Rc::new(Cell::new(0));
        let hc = Rc::clone(&hits);
        let listener = EventListener::new(move |_| hc.set(hc.get() + 1));
        h.add_event_listener(&btn, "click", &listener).unwrap();
        h.add_event_listener(&btn, "click", &listener).unwrap();
        assert_eq!(btn.listener_count("click"), 1);

        assert!(btn.click());
        assert_eq!(hits.get(), 1);

        h.remove_event_listener(&btn, "click", &listener).unwrap();
        btn.click();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn panicking_event_listener_is_contained() {
        let h = host();
        let btn = h.create_element("button").unwrap();
        let hits = Rc::new(Cell::new(0));
        let hc = Rc::clone(&hits);
        h.add_event_listener(&btn, "click", &EventListener::new(|_| panic!("handler bug")))
            .unwrap();
        h.add_event_listener(&btn, "click", &EventListener::new(move |_| hc.set(hc.get() + 1)))
            .unwrap();
        btn.click();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn prevented_click_reports_false() {
        let h = host();
        let a = h.create_element("a").unwrap();
        h.add_event_listener(&a, "click", &EventListener::new(|ev| ev.prevent_default()))
            .unwrap();
        assert!(!a.click());
    }

    #[test]
    fn outer_html_serializes_style_and_escapes() {
        let h = host();
        let div = h.create_element("div").unwrap();
        h.set_style_property(&div, "backgroundColor", "red").unwrap();
        h.set_style_property(&div, "color", "blue").unwrap();
        h.set_style_property(&div, "backgroundColor", "green").unwrap();
        h.set_attribute(&div, "title", "a \"quote\"").unwrap();
        h.append_child(&div, &h.create_text_node("1 < 2 & 3").unwrap()).unwrap();
        h.append_child(&div, &h.create_element("br").unwrap()).unwrap();
        assert_eq!(
            div.outer_html(),
            concat!(
                r#"<div title="a &quot;quote&quot;" style="background-color: green; color: blue">"#,
                "1 &lt; 2 &amp; 3<br></div>",
            )
        );
    }
}
