#![forbid(unsafe_code)]

//! Child descriptors accepted by the materializer.

use std::fmt;
use std::rc::Rc;

use sprig_core::{Listener, Observable, SameValue, TextValue};

/// A reactive source that renders as a single text node.
///
/// Implemented for every [`Observable<T>`] whose value is a [`TextValue`].
pub trait ReactiveText {
    /// A reader producing the current text (empty for holes). The reader
    /// must not keep the source alive, since it ends up inside one of the
    /// source's own listeners.
    fn reader(&self) -> Box<dyn Fn() -> String>;

    fn subscribe(&self, listener: &Listener);

    fn unsubscribe(&self, listener: &Listener);
}

impl<T> ReactiveText for Observable<T>
where
    T: TextValue + Clone + SameValue + 'static,
{
    fn reader(&self) -> Box<dyn Fn() -> String> {
        let weak = self.downgrade();
        Box::new(move || {
            weak.upgrade()
                .and_then(|cell| cell.with(TextValue::to_text))
                .unwrap_or_default()
        })
    }

    fn subscribe(&self, listener: &Listener) {
        Observable::subscribe(self, listener);
    }

    fn unsubscribe(&self, listener: &Listener) {
        Observable::unsubscribe(self, listener);
    }
}

/// One entry of a child list.
pub enum Child<N> {
    /// Contributes nothing.
    Hole,
    /// A new text node.
    Text(String),
    /// An existing node, moved into the parent.
    Node(N),
    /// A text node kept in sync with a reactive source.
    Reactive(Rc<dyn ReactiveText>),
}

impl<N> Child<N> {
    pub fn node(node: N) -> Self {
        Self::Node(node)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Bind any reactive source.
    pub fn reactive(source: impl ReactiveText + 'static) -> Self {
        Self::Reactive(Rc::new(source))
    }

    /// Text child from any [`TextValue`]; holes become [`Child::Hole`].
    pub fn value(value: &impl TextValue) -> Self {
        value.to_text().map_or(Self::Hole, Self::Text)
    }

    #[must_use]
    pub fn is_hole(&self) -> bool {
        matches!(self, Self::Hole)
    }
}

impl<N: fmt::Debug> fmt::Debug for Child<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hole => f.write_str("Hole"),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Self::Reactive(_) => f.write_str("Reactive(..)"),
        }
    }
}

impl<N> From<&str> for Child<N> {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl<N> From<String> for Child<N> {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl<N> From<&String> for Child<N> {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl<N> From<bool> for Child<N> {
    fn from(_: bool) -> Self {
        Self::Hole
    }
}

impl<N> From<()> for Child<N> {
    fn from((): ()) -> Self {
        Self::Hole
    }
}

macro_rules! number_child {
    ($($t:ty),*) => {
        $(impl<N> From<$t> for Child<N> {
            fn from(n: $t) -> Self {
                Self::value(&n)
            }
        })*
    };
}

number_child!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl<N, T: Into<Child<N>>> From<Option<T>> for Child<N> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Hole, Into::into)
    }
}

impl<N, T> From<&Observable<T>> for Child<N>
where
    T: TextValue + Clone + SameValue + 'static,
{
    fn from(cell: &Observable<T>) -> Self {
        Self::Reactive(Rc::new(cell.clone()))
    }
}

impl<N, T> From<Observable<T>> for Child<N>
where
    T: TextValue + Clone + SameValue + 'static,
{
    fn from(cell: Observable<T>) -> Self {
        Self::Reactive(Rc::new(cell))
    }
}
