#![forbid(unsafe_code)]

//! [`Host`] over the browser document.
//!
//! Only compiled on `wasm32` targets.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Node};

use sprig_core::{Event, EventListener, run_isolated};
use sprig_dom::{Host, HostError, PropertyValue};

use crate::bindings::ListenerBindings;

type DomHandler = Closure<dyn Fn(web_sys::Event)>;

/// A document host backed by `web_sys`.
///
/// Cloning shares the document and the listener table.
#[derive(Clone)]
pub struct WebHost {
    document: Document,
    bindings: Rc<RefCell<ListenerBindings<Node, DomHandler>>>,
}

impl WebHost {
    /// Host for the global `document`.
    pub fn new() -> Result<Self, HostError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| HostError::new("document", "no global document"))?;
        Ok(Self::with_document(document))
    }

    pub fn with_document(document: Document) -> Self {
        Self {
            document,
            bindings: Rc::new(RefCell::new(ListenerBindings::new())),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Number of listeners currently attached through this host.
    #[must_use]
    pub fn bound_listener_count(&self) -> usize {
        self.bindings.borrow().len()
    }
}

impl fmt::Debug for WebHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebHost")
            .field("bound_listeners", &self.bound_listener_count())
            .finish_non_exhaustive()
    }
}

pub(crate) fn js_message(err: &JsValue) -> String {
    if let Some(s) = err.as_string() {
        return s;
    }
    if let Some(e) = err.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    format!("{err:?}")
}

fn js_error(op: &'static str) -> impl Fn(JsValue) -> HostError {
    move |err| HostError::new(op, js_message(&err))
}

fn as_element<'a>(op: &'static str, node: &'a Node) -> Result<&'a Element, HostError> {
    node.dyn_ref::<Element>()
        .ok_or_else(|| HostError::new(op, "node is not an element"))
}

fn to_js(value: &PropertyValue) -> JsValue {
    match value {
        PropertyValue::Bool(b) => JsValue::from_bool(*b),
        PropertyValue::Number(n) => JsValue::from_f64(*n),
        PropertyValue::Text(s) => JsValue::from_str(s),
    }
}

impl Host for WebHost {
    type Node = Node;

    fn create_element(&self, tag: &str) -> Result<Node, HostError> {
        self.document
            .create_element(tag)
            .map(Node::from)
            .map_err(js_error("create_element"))
    }

    fn create_text_node(&self, text: &str) -> Result<Node, HostError> {
        Ok(self.document.create_text_node(text).into())
    }

    fn set_text_content(&self, node: &Node, text: &str) -> Result<(), HostError> {
        node.set_text_content(Some(text));
        Ok(())
    }

    fn text_content(&self, node: &Node) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_attribute(&self, node: &Node, name: &str, value: &str) -> Result<(), HostError> {
        as_element("set_attribute", node)?
            .set_attribute(name, value)
            .map_err(js_error("set_attribute"))
    }

    fn get_attribute(&self, node: &Node, name: &str) -> Option<String> {
        node.dyn_ref::<Element>()?.get_attribute(name)
    }

    fn set_style_property(&self, node: &Node, name: &str, value: &str) -> Result<(), HostError> {
        let style = Reflect::get(node, &JsValue::from_str("style"))
            .map_err(js_error("set_style_property"))?;
        if !style.is_object() {
            return Err(HostError::new("set_style_property", "node has no style object"));
        }
        Reflect::set(&style, &JsValue::from_str(name), &JsValue::from_str(value))
            .map_err(js_error("set_style_property"))?;
        Ok(())
    }

    fn set_property(
        &self,
        node: &Node,
        name: &str,
        value: &PropertyValue,
    ) -> Result<(), HostError> {
        Reflect::set(node, &JsValue::from_str(name), &to_js(value))
            .map_err(js_error("set_property"))?;
        Ok(())
    }

    fn add_event_listener(
        &self,
        node: &Node,
        event: &str,
        listener: &EventListener,
    ) -> Result<(), HostError> {
        if self.bindings.borrow().contains(node, event, listener) {
            return Ok(());
        }

        let handler = listener.clone();
        let wrapper = DomHandler::new(move |dom_event: web_sys::Event| {
            let kind = dom_event.type_();
            let event = if dom_event.cancelable() {
                Event::cancelable(kind)
            } else {
                Event::new(kind)
            };
            run_isolated("dom event listener", || handler.call(&event));
            if event.default_prevented() {
                dom_event.prevent_default();
            }
        });
        node.add_event_listener_with_callback(event, wrapper.as_ref().unchecked_ref())
            .map_err(js_error("add_event_listener"))?;

        tracing::trace!(event, "dom listener attached");
        self.bindings
            .borrow_mut()
            .insert(node.clone(), event, listener.clone(), wrapper);
        Ok(())
    }

    fn remove_event_listener(
        &self,
        node: &Node,
        event: &str,
        listener: &EventListener,
    ) -> Result<(), HostError> {
        let Some(wrapper) = self.bindings.borrow_mut().remove(node, event, listener) else {
            return Ok(());
        };
        tracing::trace!(event, "dom listener detached");
        node.remove_event_listener_with_callback(event, wrapper.as_ref().unchecked_ref())
            .map_err(js_error("remove_event_listener"))
    }

    fn append_child(&self, parent: &Node, child: &Node) -> Result<(), HostError> {
        parent
            .append_child(child)
            .map(drop)
            .map_err(js_error("append_child"))
    }

    fn replace_children(&self, parent: &Node, child: &Node) -> Result<(), HostError> {
        if child.contains(Some(parent)) {
            return Err(HostError::new(
                "replace_children",
                "the new child is an ancestor of the parent",
            ));
        }
        while let Some(old) = parent.first_child() {
            parent
                .remove_child(&old)
                .map_err(js_error("replace_children"))?;
        }
        self.append_child(parent, child)
    }

    fn children(&self, node: &Node) -> Vec<Node> {
        let list = node.child_nodes();
        (0..list.length()).filter_map(|i| list.item(i)).collect()
    }
}
