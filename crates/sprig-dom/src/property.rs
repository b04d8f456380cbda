#![forbid(unsafe_code)]

//! Typed property table: which keys are native element properties.
//!
//! A property-bag key is applied as a native property when the element's
//! interface has a settable property of that name; everything else becomes a
//! string attribute. Instead of probing the element at runtime, the decision
//! is made against this table, which also records each property's native type
//! (so `disabled: "yes"` becomes `true`, `tabIndex: "3"` becomes `3.0`) and
//! which attribute, if any, the property reflects.
//!
//! Names are case-sensitive, as on the platform: `className` is a property,
//! `class` is an attribute.

use sprig_core::format_number;

/// Native type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Bool,
    Number,
    Text,
}

/// One entry of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertySpec {
    pub name: &'static str,
    pub kind: PropertyKind,
    /// Content attribute kept in sync with the property, if any.
    pub reflects: Option<&'static str>,
}

/// A loosely typed value from a property bag.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Number(f64),
    Text(String),
}

/// A value coerced to a property's native type.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

const fn spec(
    name: &'static str,
    kind: PropertyKind,
    reflects: Option<&'static str>,
) -> PropertySpec {
    PropertySpec {
        name,
        kind,
        reflects,
    }
}

use PropertyKind::{Bool, Number, Text};

/// Properties every HTML element has.
const GLOBAL: &[PropertySpec] = &[
    spec("id", Text, Some("id")),
    spec("className", Text, Some("class")),
    spec("title", Text, Some("title")),
    spec("lang", Text, Some("lang")),
    spec("dir", Text, Some("dir")),
    spec("hidden", Bool, Some("hidden")),
    spec("tabIndex", Number, Some("tabindex")),
    spec("accessKey", Text, Some("accesskey")),
    spec("draggable", Bool, None),
    spec("textContent", Text, None),
    spec("innerText", Text, None),
];

const ANCHOR: &[PropertySpec] = &[
    spec("href", Text, Some("href")),
    spec("target", Text, Some("target")),
    spec("download", Text, Some("download")),
    spec("rel", Text, Some("rel")),
    spec("hreflang", Text, Some("hreflang")),
    spec("type", Text, Some("type")),
];

const INPUT: &[PropertySpec] = &[
    spec("value", Text, None),
    spec("checked", Bool, None),
    spec("defaultValue", Text, Some("value")),
    spec("defaultChecked", Bool, Some("checked")),
    spec("disabled", Bool, Some("disabled")),
    spec("readOnly", Bool, Some("readonly")),
    spec("required", Bool, Some("required")),
    spec("type", Text, Some("type")),
    spec("name", Text, Some("name")),
    spec("placeholder", Text, Some("placeholder")),
    spec("min", Text, Some("min")),
    spec("max", Text, Some("max")),
    spec("step", Text, Some("step")),
    spec("maxLength", Number, Some("maxlength")),
    spec("autofocus", Bool, Some("autofocus")),
];

const BUTTON: &[PropertySpec] = &[
    spec("disabled", Bool, Some("disabled")),
    spec("type", Text, Some("type")),
    spec("name", Text, Some("name")),
    spec("value", Text, Some("value")),
    spec("autofocus", Bool, Some("autofocus")),
];

const TEXTAREA: &[PropertySpec] = &[
    spec("value", Text, None),
    spec("disabled", Bool, Some("disabled")),
    spec("readOnly", Bool, Some("readonly")),
    spec("required", Bool, Some("required")),
    spec("name", Text, Some("name")),
    spec("placeholder", Text, Some("placeholder")),
    spec("rows", Number, Some("rows")),
    spec("cols", Number, Some("cols")),
];

const SELECT: &[PropertySpec] = &[
    spec("value", Text, None),
    spec("disabled", Bool, Some("disabled")),
    spec("multiple", Bool, Some("multiple")),
    spec("name", Text, Some("name")),
    spec("selectedIndex", Number, None),
];

const OPTION: &[PropertySpec] = &[
    spec("value", Text, Some("value")),
    spec("selected", Bool, None),
    spec("disabled", Bool, Some("disabled")),
    spec("label", Text, Some("label")),
];

const IMG: &[PropertySpec] = &[
    spec("src", Text, Some("src")),
    spec("alt", Text, Some("alt")),
    spec("width", Number, Some("width")),
    spec("height", Number, Some("height")),
];

const LABEL: &[PropertySpec] = &[spec("htmlFor", Text, Some("for"))];

const FORM: &[PropertySpec] = &[
    spec("action", Text, Some("action")),
    spec("method", Text, Some("method")),
    spec("noValidate", Bool, Some("novalidate")),
];

fn tag_table(tag: &str) -> &'static [PropertySpec] {
    match tag.to_ascii_lowercase().as_str() {
        "a" => ANCHOR,
        "input" => INPUT,
        "button" => BUTTON,
        "textarea" => TEXTAREA,
        "select" => SELECT,
        "option" => OPTION,
        "img" => IMG,
        "label" => LABEL,
        "form" => FORM,
        _ => &[],
    }
}

/// The property named `name` on elements of type `tag`, if the element
/// interface has one.
#[must_use]
pub fn lookup(tag: &str, name: &str) -> Option<&'static PropertySpec> {
    tag_table(tag)
        .iter()
        .chain(GLOBAL)
        .find(|spec| spec.name == name)
}

/// Event handler content attributes. Writing one of these installs inline
/// script, so they never receive a string.
const EVENT_HANDLERS: &[&str] = &[
    "onabort",
    "onanimationend",
    "onanimationiteration",
    "onanimationstart",
    "onauxclick",
    "onbeforeinput",
    "onblur",
    "oncancel",
    "oncanplay",
    "oncanplaythrough",
    "onchange",
    "onclick",
    "onclose",
    "oncontextmenu",
    "oncopy",
    "oncuechange",
    "oncut",
    "ondblclick",
    "ondrag",
    "ondragend",
    "ondragenter",
    "ondragleave",
    "ondragover",
    "ondragstart",
    "ondrop",
    "ondurationchange",
    "onemptied",
    "onended",
    "onerror",
    "onfocus",
    "onfocusin",
    "onfocusout",
    "onformdata",
    "ongotpointercapture",
    "oninput",
    "oninvalid",
    "onkeydown",
    "onkeypress",
    "onkeyup",
    "onload",
    "onloadeddata",
    "onloadedmetadata",
    "onloadstart",
    "onlostpointercapture",
    "onmousedown",
    "onmouseenter",
    "onmouseleave",
    "onmousemove",
    "onmouseout",
    "onmouseover",
    "onmouseup",
    "onpaste",
    "onpause",
    "onplay",
    "onplaying",
    "onpointercancel",
    "onpointerdown",
    "onpointerenter",
    "onpointerleave",
    "onpointermove",
    "onpointerout",
    "onpointerover",
    "onpointerup",
    "onprogress",
    "onratechange",
    "onreset",
    "onresize",
    "onscroll",
    "onscrollend",
    "onsecuritypolicyviolation",
    "onseeked",
    "onseeking",
    "onselect",
    "onselectionchange",
    "onselectstart",
    "onslotchange",
    "onstalled",
    "onsubmit",
    "onsuspend",
    "ontimeupdate",
    "ontoggle",
    "ontouchcancel",
    "ontouchend",
    "ontouchmove",
    "ontouchstart",
    "ontransitioncancel",
    "ontransitionend",
    "ontransitionrun",
    "ontransitionstart",
    "onvolumechange",
    "onwaiting",
    "onwheel",
];

/// Whether `name` is an event handler property, compared without regard to
/// ASCII case (`onClick` names the same content attribute as `onclick`).
#[must_use]
pub fn is_event_handler(name: &str) -> bool {
    EVENT_HANDLERS
        .iter()
        .any(|handler| handler.eq_ignore_ascii_case(name))
}

impl PropertyKind {
    /// Coerce a loosely typed value to this kind, following the platform's
    /// conversion rules (truthiness for booleans, numeric parse for numbers).
    #[must_use]
    pub fn coerce(self, scalar: &Scalar) -> PropertyValue {
        match (self, scalar) {
            (Bool, Scalar::Bool(b)) => PropertyValue::Bool(*b),
            (Bool, Scalar::Number(n)) => PropertyValue::Bool(*n != 0.0 && !n.is_nan()),
            (Bool, Scalar::Text(s)) => PropertyValue::Bool(!s.is_empty()),
            (Number, Scalar::Bool(b)) => PropertyValue::Number(if *b { 1.0 } else { 0.0 }),
            (Number, Scalar::Number(n)) => PropertyValue::Number(*n),
            (Number, Scalar::Text(s)) => {
                let trimmed = s.trim();
                let n = if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse().unwrap_or(f64::NAN)
                };
                PropertyValue::Number(n)
            }
            (Text, scalar) => PropertyValue::Text(scalar.to_attribute_string()),
        }
    }
}

impl Scalar {
    /// String coercion used for attribute assignment.
    #[must_use]
    pub fn to_attribute_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
            Self::Text(s) => s.clone(),
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Text(_) => "string",
        }
    }
}

impl PropertyValue {
    /// String form written to a reflected attribute. `None` for a `false`
    /// boolean, which removes the attribute.
    #[must_use]
    pub fn reflected(&self) -> Option<String> {
        match self {
            Self::Bool(true) => Some(String::new()),
            Self::Bool(false) => None,
            Self::Number(n) => Some(format_number(*n)),
            Self::Text(s) => Some(s.clone()),
        }
    }
}
