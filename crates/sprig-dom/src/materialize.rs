#![forbid(unsafe_code)]

//! The element materializer: `h(tag, props, children)`.
//!
//! # Property application
//!
//! Per key, in bag order:
//!
//! 1. [`PropValue::Absent`] is skipped.
//! 2. `style`: text is written as the raw `style` attribute; a [`StyleMap`]
//!    is merged onto the live style object; anything else is
//!    [`MaterializeError::InvalidPropertyValue`].
//! 3. `on<event>` holding a listener: attached for the lowercased event
//!    name, and a teardown removing exactly that listener is registered.
//! 4. A non-listener value under an event handler name (`onclick`,
//!    `onSubmit`, ...) is dropped, as assigning a string to a handler
//!    property does nothing. No inline handler attribute is ever written.
//! 5. A key the [`property`](crate::property) table knows for the tag is
//!    assigned as a native property, coerced to its native type.
//! 6. Anything else becomes a string attribute.
//!
//! # Children
//!
//! Holes contribute nothing, text becomes a new text node, nodes are moved
//! into the element, and reactive sources become a text node that is
//! re-rendered in place on every change. Each reactive binding registers a
//! teardown that unsubscribes it.
//!
//! [`StyleMap`]: crate::StyleMap

use std::rc::Rc;

use sprig_core::{CleanupRegistry, EventListener, Listener};

use crate::child::{Child, ReactiveText};
use crate::error::MaterializeError;
use crate::host::Host;
use crate::property;
use crate::props::{PropValue, Props, StyleMap};

/// Builds host nodes and records the teardown of every binding it makes.
///
/// Cloning shares both the host and the [`CleanupRegistry`].
#[derive(Debug, Clone)]
pub struct Materializer<H: Host> {
    host: H,
    registry: CleanupRegistry,
}

impl<H: Host> Materializer<H> {
    /// A materializer with a fresh, private cleanup registry.
    pub fn new(host: H) -> Self {
        Self::with_registry(host, CleanupRegistry::new())
    }

    /// A materializer registering teardowns into `registry`.
    pub fn with_registry(host: H, registry: CleanupRegistry) -> Self {
        Self { host, registry }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn registry(&self) -> &CleanupRegistry {
        &self.registry
    }

    /// Create a `tag` element, apply `props`, and append `children` in order.
    ///
    /// # Errors
    ///
    /// [`MaterializeError::InvalidPropertyValue`] for a value that cannot be
    /// applied to its key, [`MaterializeError::Host`] when the host rejects
    /// an operation. Work already done on the element is not rolled back.
    pub fn h<I>(&self, tag: &str, props: Props, children: I) -> Result<H::Node, MaterializeError>
    where
        I: IntoIterator<Item = Child<H::Node>>,
    {
        let el = self.host.create_element(tag)?;
        self.apply_props(tag, &el, props)?;
        self.append_children(&el, children)?;
        Ok(el)
    }

    /// A standalone text node.
    pub fn text(&self, text: &str) -> Result<H::Node, MaterializeError> {
        Ok(self.host.create_text_node(text)?)
    }

    /// Append `children` to an existing node, with the same rules as
    /// [`h`](Self::h).
    pub fn append_children<I>(&self, parent: &H::Node, children: I) -> Result<(), MaterializeError>
    where
        I: IntoIterator<Item = Child<H::Node>>,
    {
        for child in children {
            self.append_child(parent, child)?;
        }
        Ok(())
    }

    fn apply_props(&self, tag: &str, el: &H::Node, props: Props) -> Result<(), MaterializeError> {
        for (key, value) in props {
            match value {
                PropValue::Absent => {}
                value if key == "style" => self.apply_style(el, value)?,
                PropValue::Listener(listener) if is_event_key(&key) => {
                    self.bind_listener(el, &key[2..].to_ascii_lowercase(), listener)?;
                }
                PropValue::Scalar(scalar) if property::is_event_handler(&key) => {
                    tracing::debug!(
                        key = %key,
                        found = scalar.type_name(),
                        "ignoring non-listener event handler value"
                    );
                }
                PropValue::Scalar(scalar) => match property::lookup(tag, &key) {
                    Some(spec) => {
                        tracing::trace!(tag, key = %key, "assigning native property");
                        self.host.set_property(el, &key, &spec.kind.coerce(&scalar))?;
                    }
                    None => self
                        .host
                        .set_attribute(el, &key, &scalar.to_attribute_string())?,
                },
                other @ (PropValue::Listener(_) | PropValue::Style(_)) => {
                    return Err(MaterializeError::InvalidPropertyValue {
                        key,
                        found: other.type_name(),
                    });
                }
            }
        }
        Ok(())
    }

    fn apply_style(&self, el: &H::Node, value: PropValue) -> Result<(), MaterializeError> {
        match value {
            PropValue::Scalar(property::Scalar::Text(css)) => {
                self.host.set_attribute(el, "style", &css)?;
            }
            PropValue::Style(map) => self.merge_style(el, &map)?,
            other => {
                return Err(MaterializeError::InvalidPropertyValue {
                    key: "style".to_owned(),
                    found: other.type_name(),
                });
            }
        }
        Ok(())
    }

    fn merge_style(&self, el: &H::Node, map: &StyleMap) -> Result<(), MaterializeError> {
        for (name, value) in map.iter() {
            self.host.set_style_property(el, name, value)?;
        }
        Ok(())
    }

    fn bind_listener(
        &self,
        el: &H::Node,
        event: &str,
        listener: EventListener,
    ) -> Result<(), MaterializeError> {
        self.host.add_event_listener(el, event, &listener)?;

        let host = self.host.clone();
        let el = el.clone();
        let event = event.to_owned();
        self.registry.register_fn(move || {
            if let Err(err) = host.remove_event_listener(&el, &event, &listener) {
                tracing::debug!(%err, event = %event, "event listener removal failed");
            }
        });
        Ok(())
    }

    fn append_child(
        &self,
        parent: &H::Node,
        child: Child<H::Node>,
    ) -> Result<(), MaterializeError> {
        match child {
            Child::Hole => {}
            Child::Reactive(source) => self.append_reactive(parent, source)?,
            Child::Node(node) => self.host.append_child(parent, &node)?,
            Child::Text(text) => {
                let node = self.host.create_text_node(&text)?;
                self.host.append_child(parent, &node)?;
            }
        }
        Ok(())
    }

    /// One text node, rendered now and re-rendered in place on each change.
    fn append_reactive(
        &self,
        parent: &H::Node,
        source: Rc<dyn ReactiveText>,
    ) -> Result<(), MaterializeError> {
        let node = self.host.create_text_node("")?;
        self.host.append_child(parent, &node)?;

        let render = {
            let host = self.host.clone();
            let read = source.reader();
            move || {
                if let Err(err) = host.set_text_content(&node, &read()) {
                    tracing::warn!(%err, "reactive text update failed");
                }
            }
        };
        render();

        let listener = Listener::new(render);
        source.subscribe(&listener);
        self.registry.register_fn(move || source.unsubscribe(&listener));
        Ok(())
    }
}

fn is_event_key(key: &str) -> bool {
    key.len() > 2 && key.starts_with("on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessHost, NodeRef};
    use crate::property::PropertyValue;
    use pretty_assertions::assert_eq;
    use sprig_core::Observable;
    use std::cell::Cell;

    fn mat() -> Materializer<HeadlessHost> {
        Materializer::new(HeadlessHost::new())
    }

    #[test]
    fn builds_element_with_text_children() {
        let m = mat();
        let el = m
            .h("p", Props::new(), [Child::from("a"), Child::from(1), Child::from("b")])
            .unwrap();
        assert_eq!(el.outer_html(), "<p>a1b</p>");
        assert_eq!(el.children().len(), 3);
    }

    #[test]
    fn holes_contribute_no_nodes() {
        let m = mat();
        let el = m
            .h(
                "div",
                Props::new(),
                [
                    Child::from(true),
                    Child::from(false),
                    Child::from(None::<&str>),
                    Child::Hole,
                ],
            )
            .unwrap();
        assert!(el.children().is_empty());
    }

    #[test]
    fn nested_nodes_are_moved_in() {
        let m = mat();
        let inner = m.h("span", Props::new(), [Child::from("x")]).unwrap();
        let outer = m.h("div", Props::new(), [Child::from(&inner)]).unwrap();
        assert_eq!(inner.parent(), Some(outer.clone()));
        assert_eq!(outer.outer_html(), "<div><span>x</span></div>");
    }

    #[test]
    fn absent_values_are_skipped() {
        let m = mat();
        let el = m
            .h("div", Props::new().set("title", None::<String>).set("style", None::<String>), [])
            .unwrap();
        assert_eq!(el.outer_html(), "<div></div>");
    }

    #[test]
    fn style_text_sets_attribute() {
        let m = mat();
        let el = m.h("div", Props::new().style("color: red"), []).unwrap();
        assert_eq!(el.attribute("style").as_deref(), Some("color: red"));
    }

    #[test]
    fn style_map_merges_in_order() {
        let m = mat();
        let map = StyleMap::new()
            .set("color", "red")
            .set("fontSize", "12px")
            .set("color", "blue");
        let el = m.h("div", Props::new().style_map(map), []).unwrap();
        assert_eq!(el.style_property("color").as_deref(), Some("blue"));
        assert_eq!(el.style_property("fontSize").as_deref(), Some("12px"));
    }

    #[test]
    fn invalid_style_value_is_an_error() {
        let m = mat();
        let err = m.h("div", Props::new().set("style", 3), []).unwrap_err();
        assert_eq!(
            err,
            MaterializeError::InvalidPropertyValue {
                key: "style".into(),
                found: "number"
            }
        );
        let err = m.h("div", Props::new().set("style", true), []).unwrap_err();
        assert!(matches!(err, MaterializeError::InvalidPropertyValue { found: "boolean", .. }));
    }

    #[test]
    fn listener_under_non_event_key_is_an_error() {
        let m = mat();
        let props = Props::new().set("title", EventListener::new(|_| {}));
        assert!(matches!(
            m.h("div", props, []),
            Err(MaterializeError::InvalidPropertyValue { found: "listener", .. })
        ));
    }

    #[test]
    fn native_properties_keep_their_type() {
        let m = mat();
        let el = m
            .h(
                "input",
                Props::new()
                    .set("disabled", "yes")
                    .set("tabIndex", "4")
                    .set("value", 12)
                    .set("data-role", "search")
                    .set("class", "field"),
                [],
            )
            .unwrap();
        assert_eq!(el.property("disabled"), Some(PropertyValue::Bool(true)));
        assert_eq!(el.property("tabIndex"), Some(PropertyValue::Number(4.0)));
        assert_eq!(el.property("value"), Some(PropertyValue::Text("12".into())));
        assert_eq!(el.attribute("data-role").as_deref(), Some("search"));
        assert_eq!(el.attribute("class").as_deref(), Some("field"));
        assert_eq!(el.property("class"), None);
    }

    #[test]
    fn event_listener_is_attached_with_lowercased_name() {
        let m = mat();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let el = m
            .h("button", Props::new().on("Click", move |_| h.set(h.get() + 1)), [])
            .unwrap();
        assert_eq!(el.listener_count("click"), 1);
        el.click();
        assert_eq!(hits.get(), 1);
        assert_eq!(m.registry().len(), 1);
    }

    #[test]
    fn string_under_event_handler_writes_nothing() {
        let m = mat();
        let el = m
            .h(
                "div",
                Props::new().set("onclick", "alert(1)").set("onMouseOver", "steal()"),
                [],
            )
            .unwrap();
        assert_eq!(el.outer_html(), "<div></div>");
        assert_eq!(el.attribute("onclick"), None);
        assert_eq!(el.property("onclick"), None);
        assert_eq!(el.listener_count("click"), 0);
        assert!(m.registry().is_empty());
    }

    #[test]
    fn on_prefixed_non_handler_key_stays_an_attribute() {
        let m = mat();
        let el = m.h("div", Props::new().set("one", "1"), []).unwrap();
        assert_eq!(el.attribute("one").as_deref(), Some("1"));
    }

    #[test]
    fn flushing_registry_removes_listeners() {
        let m = mat();
        let el = m.h("button", Props::new().on("click", |_| {}), []).unwrap();
        m.registry().flush_all();
        assert_eq!(el.listener_count("click"), 0);
    }

    #[test]
    fn reactive_child_renders_and_updates_in_place() {
        let m = mat();
        let count = Observable::new(0);
        let el = m
            .h("p", Props::new(), [Child::from("n="), Child::from(&count)])
            .unwrap();
        let text_node: NodeRef = el.children()[1].clone();
        assert_eq!(el.text_content(), "n=0");

        for i in 1..=5 {
            count.set(i);
            assert_eq!(el.text_content(), format!("n={i}"));
            assert_eq!(el.children()[1], text_node);
        }
        assert_eq!(el.children().len(), 2);
    }

    #[test]
    fn reactive_hole_renders_empty_text_node() {
        let m = mat();
        let label = Observable::new(None::<String>);
        let el = m.h("span", Props::new(), [Child::from(&label)]).unwrap();
        assert_eq!(el.children().len(), 1);
        assert_eq!(el.text_content(), "");
        label.set(Some("ready".into()));
        assert_eq!(el.text_content(), "ready");
    }

    #[test]
    fn teardown_unsubscribes_reactive_binding() {
        let m = mat();
        let count = Observable::new(1);
        let el = m.h("p", Props::new(), [Child::from(&count)]).unwrap();
        assert_eq!(count.listener_count(), 1);

        let report = m.registry().flush_all();
        assert_eq!(report.executed, 1);
        assert_eq!(count.listener_count(), 0);

        count.set(2);
        assert_eq!(el.text_content(), "1");
    }

    #[test]
    fn host_errors_propagate() {
        let m = mat();
        assert!(matches!(
            m.h("not a tag", Props::new(), []),
            Err(MaterializeError::Host(_))
        ));
        assert!(matches!(
            m.h("div", Props::new().set("bad key", "x"), []),
            Err(MaterializeError::Host(_))
        ));
    }
}
