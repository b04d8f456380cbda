//! Materializer integration tests
//!
//! Exercises the full pipeline: property bag + children → headless document,
//! verifying reactive text identity, teardown through the shared registry,
//! and the serialized shape of nested trees.

use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sprig_core::{CleanupRegistry, Observable};
use sprig_dom::{
    Child, HeadlessHost, Host, MaterializeError, Materializer, NodeRef, PropertyValue, Props,
    StyleMap, children,
};

fn materializer() -> Materializer<HeadlessHost> {
    Materializer::new(HeadlessHost::new())
}

// ---------------------------------------------------------------------------
// Tree shape
// ---------------------------------------------------------------------------

#[test]
fn nested_tree_serializes() {
    let m = materializer();
    let item = |label: &str| m.h("li", Props::new(), [Child::from(label)]).unwrap();
    let list = m
        .h(
            "ul",
            Props::new().set("className", "menu"),
            [Child::from(item("home")), Child::from(item("about"))],
        )
        .unwrap();
    let root = m
        .h(
            "nav",
            Props::new()
                .set("id", "main")
                .style_map(StyleMap::new().set("display", "flex")),
            children![&list, "end"],
        )
        .unwrap();

    assert_eq!(
        root.outer_html(),
        "<nav id=\"main\" style=\"display: flex\">\
         <ul class=\"menu\"><li>home</li><li>about</li></ul>end</nav>"
    );
}

#[test]
fn children_macro_mixes_kinds() {
    let m = materializer();
    let name = Observable::new(String::from("Ada"));
    let el = m
        .h(
            "p",
            Props::new(),
            children!["Hi ", &name, false, None::<&str>, "!", 3],
        )
        .unwrap();
    assert_eq!(el.children().len(), 4);
    assert_eq!(el.text_content(), "Hi Ada!3");
}

#[test]
fn holes_leave_element_empty() {
    let m = materializer();
    let el = m
        .h("div", Props::new(), children![true, false, (), None::<String>])
        .unwrap();
    assert!(m.host().children(&el).is_empty());
    assert_eq!(el.outer_html(), "<div></div>");
}

#[test]
fn void_elements_have_no_closing_tag() {
    let m = materializer();
    let el = m
        .h("input", Props::new().set("type", "checkbox").set("checked", true), [])
        .unwrap();
    assert_eq!(el.outer_html(), "<input type=\"checkbox\">");
    assert_eq!(el.property("checked"), Some(PropertyValue::Bool(true)));
}

// ---------------------------------------------------------------------------
// Reactive text
// ---------------------------------------------------------------------------

#[test]
fn counter_text_updates_in_place() {
    let m = materializer();
    let count = Observable::new(0);
    let el = m
        .h(
            "p",
            Props::new().set("id", "count"),
            [Child::from("Count: "), Child::from(&count)],
        )
        .unwrap();
    let bound = el.children()[1].clone();

    for _ in 0..10 {
        count.update(|n| n + 1);
    }

    assert_eq!(el.text_content(), "Count: 10");
    assert_eq!(el.children()[1], bound, "text node identity must survive updates");
    assert_eq!(el.children().len(), 2);
}

#[test]
fn one_source_bound_in_two_places() {
    let m = materializer();
    let label = Observable::new("a");
    let left = m.h("span", Props::new(), [Child::from(&label)]).unwrap();
    let right = m.h("span", Props::new(), [Child::from(&label)]).unwrap();
    assert_eq!(label.listener_count(), 2);

    label.set("b");
    assert_eq!(left.text_content(), "b");
    assert_eq!(right.text_content(), "b");
}

#[test]
fn shared_registry_tears_down_every_binding() {
    let registry = CleanupRegistry::new();
    let m = Materializer::with_registry(HeadlessHost::new(), registry.clone());
    let count = Observable::new(1);
    let clicks = Rc::new(Cell::new(0));
    let c = Rc::clone(&clicks);

    let button: NodeRef = m
        .h(
            "button",
            Props::new().on("click", move |_| c.set(c.get() + 1)),
            [Child::from(&count)],
        )
        .unwrap();
    assert_eq!(registry.len(), 2);

    button.click();
    assert_eq!(clicks.get(), 1);

    let report = registry.flush_all();
    assert_eq!(report.executed, 2);
    assert_eq!(report.failed, 0);
    assert!(registry.is_empty());

    count.set(5);
    button.click();
    assert_eq!(button.text_content(), "1");
    assert_eq!(clicks.get(), 1);
    assert_eq!(count.listener_count(), 0);
}

#[test]
fn bindings_survive_detaching_the_element() {
    let m = materializer();
    let count = Observable::new(0);
    let holder = m.h("div", Props::new(), []).unwrap();
    let el = m.h("p", Props::new(), [Child::from(&count)]).unwrap();
    m.host().append_child(&holder, &el).unwrap();

    let empty = m.text("").unwrap();
    m.host().replace_children(&holder, &empty).unwrap();
    count.set(7);
    assert_eq!(el.text_content(), "7");
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn invalid_style_value_is_rejected() {
    let m = materializer();
    let result = m.h("div", Props::new().set("style", false), [Child::from("x")]);
    assert_eq!(
        result.unwrap_err(),
        MaterializeError::InvalidPropertyValue {
            key: "style".to_owned(),
            found: "boolean",
        }
    );
}

#[test]
fn style_map_under_other_key_is_rejected() {
    let m = materializer();
    let props = Props::new().set("css", StyleMap::new().set("color", "red"));
    let err = m.h("div", props, []).unwrap_err();
    assert_eq!(err.to_string(), "invalid value for property \"css\": style map");
}

// ---------------------------------------------------------------------------
// Property-based: reactive text always mirrors the source
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn reactive_text_mirrors_last_value(values in proptest::collection::vec(any::<i32>(), 1..32)) {
        let m = materializer();
        let cell = Observable::new(0i32);
        let el = m.h("span", Props::new(), [Child::from(&cell)]).unwrap();
        let node = el.children()[0].clone();

        for v in &values {
            cell.set(*v);
            prop_assert_eq!(el.text_content(), v.to_string());
        }
        prop_assert_eq!(el.children().len(), 1);
        prop_assert_eq!(&el.children()[0], &node);
    }
}
