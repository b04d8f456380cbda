#![forbid(unsafe_code)]

//! Property bags.
//!
//! A [`Props`] is an ordered list of `(key, value)` pairs with object
//! semantics: setting an existing key replaces its value in place. Two key
//! shapes are special during materialization:
//!
//! - `style`: raw attribute text or a [`StyleMap`].
//! - `on<event>` holding a listener: attached as an event listener for the
//!   lowercased event name.
//!
//! All other keys go through the [`property`](crate::property) table.

use sprig_core::{Event, EventListener};

use crate::property::Scalar;

/// Ordered style declarations, merged onto an element's live style object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap {
    entries: Vec<(String, String)>,
}

impl StyleMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration. Names may be camelCase (`backgroundColor`) or
    /// hyphenated (`background-color`).
    #[must_use]
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((name.into(), value.into()));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A value in a property bag.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    /// Treated as if the key were not present.
    Absent,
    Scalar(Scalar),
    Style(StyleMap),
    Listener(EventListener),
}

impl PropValue {
    /// Short name of the value's type, as used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Scalar(scalar) => scalar.type_name(),
            Self::Style(_) => "style map",
            Self::Listener(_) => "listener",
        }
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        Self::Scalar(Scalar::Text(s.to_owned()))
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        Self::Scalar(Scalar::Text(s))
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        Self::Scalar(Scalar::Bool(b))
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        Self::Scalar(Scalar::Number(n))
    }
}

macro_rules! number_prop {
    ($($t:ty),*) => {
        $(impl From<$t> for PropValue {
            fn from(n: $t) -> Self {
                Self::Scalar(Scalar::Number(f64::from(n)))
            }
        })*
    };
}

number_prop!(i8, i16, i32, u8, u16, u32, f32);

impl From<StyleMap> for PropValue {
    fn from(map: StyleMap) -> Self {
        Self::Style(map)
    }
}

impl From<EventListener> for PropValue {
    fn from(listener: EventListener) -> Self {
        Self::Listener(listener)
    }
}

impl<T: Into<PropValue>> From<Option<T>> for PropValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

/// An ordered property bag with object semantics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    entries: Vec<(String, PropValue)>,
}

impl Props {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`. An existing entry keeps its position and takes the new
    /// value.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// In-place form of [`set`](Self::set).
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Raw `style` attribute text.
    #[must_use]
    pub fn style(self, css: impl Into<String>) -> Self {
        self.set("style", css.into())
    }

    /// Style declarations merged onto the element's style object.
    #[must_use]
    pub fn style_map(self, map: StyleMap) -> Self {
        self.set("style", map)
    }

    /// Attach `handler` for `event` (stored under `on<event>`).
    #[must_use]
    pub fn on(self, event: &str, handler: impl Fn(&Event) + 'static) -> Self {
        self.set(format!("on{event}"), EventListener::new(handler))
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<PropValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Keep only the entries for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &PropValue) -> bool) {
        self.entries.retain(|(k, v)| keep(k, v));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Props {
    type Item = (String, PropValue);
    type IntoIter = std::vec::IntoIter<(String, PropValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Self::new();
        for (k, v) in iter {
            props.insert(k, v);
        }
        props
    }
}

impl std::fmt::Display for PropValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar(scalar) => f.write_str(&scalar.to_attribute_string()),
            other => f.write_str(other.type_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_in_place() {
        let props = Props::new().set("a", 1).set("b", 2).set("a", 3);
        let keys: Vec<_> = props.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(props.get("a"), Some(&PropValue::Scalar(Scalar::Number(3.0))));
    }

    #[test]
    fn none_is_absent() {
        let props = Props::new().set("title", None::<&str>);
        assert_eq!(props.get("title"), Some(&PropValue::Absent));
    }

    #[test]
    fn on_prefixes_event_name() {
        let props = Props::new().on("click", |_| {});
        assert!(matches!(props.get("onclick"), Some(PropValue::Listener(_))));
    }

    #[test]
    fn remove_and_retain() {
        let mut props: Props = [("x", "1"), ("y", "2"), ("z", "3")].into_iter().collect();
        assert_eq!(props.remove("y"), Some(PropValue::from("2")));
        assert_eq!(props.remove("y"), None);
        props.retain(|k, _| k != "z");
        assert_eq!(props.len(), 1);
    }

    #[test]
    fn style_map_collects_in_order() {
        let map: StyleMap = [("color", "red"), ("color", "blue")].into_iter().collect();
        let entries: Vec<_> = map.iter().collect();
        assert_eq!(entries, [("color", "red"), ("color", "blue")]);
    }
}
