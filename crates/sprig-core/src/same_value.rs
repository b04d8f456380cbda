#![forbid(unsafe_code)]

//! Same-value comparison for observable cells.
//!
//! [`Observable::set`](crate::Observable::set) skips the write and the
//! notification when the candidate is the *same value* as the current one.
//! For most types that is `==`. Floats differ: every `NaN` is the same value
//! as every other `NaN`, and `0.0` is not the same value as `-0.0`, so the
//! float impls compare bit patterns instead.
//!
//! Implement [`SameValue`] for your own `PartialEq` types with
//! [`same_value_by_eq!`](crate::same_value_by_eq):
//!
//! ```
//! use sprig_core::{Observable, same_value_by_eq};
//!
//! #[derive(Clone, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//! same_value_by_eq!(Point);
//!
//! let cell = Observable::new(Point { x: 0, y: 0 });
//! cell.set(Point { x: 0, y: 0 });
//! assert_eq!(cell.version(), 0);
//! ```

use std::borrow::Cow;
use std::rc::Rc;

/// Equality as used by the change check of an observable cell.
pub trait SameValue {
    /// Whether `self` and `other` are indistinguishable to listeners.
    fn same_value(&self, other: &Self) -> bool;
}

/// Implement [`SameValue`] through `PartialEq` for the listed types.
#[macro_export]
macro_rules! same_value_by_eq {
    ($($t:ty),* $(,)?) => {
        $(impl $crate::SameValue for $t {
            fn same_value(&self, other: &Self) -> bool {
                self == other
            }
        })*
    };
}

same_value_by_eq!(
    bool, char, (), str, String, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize,
);

impl SameValue for f64 {
    fn same_value(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits() || (self.is_nan() && other.is_nan())
    }
}

impl SameValue for f32 {
    fn same_value(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits() || (self.is_nan() && other.is_nan())
    }
}

impl SameValue for Cow<'_, str> {
    fn same_value(&self, other: &Self) -> bool {
        self == other
    }
}

impl<T: SameValue + ?Sized> SameValue for &T {
    fn same_value(&self, other: &Self) -> bool {
        (**self).same_value(*other)
    }
}

impl<T: SameValue + ?Sized> SameValue for Box<T> {
    fn same_value(&self, other: &Self) -> bool {
        (**self).same_value(other)
    }
}

impl<T: SameValue + ?Sized> SameValue for Rc<T> {
    fn same_value(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other) || (**self).same_value(other)
    }
}

impl<T: SameValue> SameValue for Option<T> {
    fn same_value(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same_value(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: SameValue, E: SameValue> SameValue for Result<T, E> {
    fn same_value(&self, other: &Self) -> bool {
        match (self, other) {
            (Ok(a), Ok(b)) => a.same_value(b),
            (Err(a), Err(b)) => a.same_value(b),
            _ => false,
        }
    }
}

impl<T: SameValue> SameValue for [T] {
    fn same_value(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.same_value(b))
    }
}

impl<T: SameValue, const N: usize> SameValue for [T; N] {
    fn same_value(&self, other: &Self) -> bool {
        self.as_slice().same_value(other.as_slice())
    }
}

impl<T: SameValue> SameValue for Vec<T> {
    fn same_value(&self, other: &Self) -> bool {
        self.as_slice().same_value(other.as_slice())
    }
}

macro_rules! tuple_same_value {
    ($(($($name:ident $idx:tt),+)),*) => {
        $(impl<$($name: SameValue),+> SameValue for ($($name,)+) {
            fn same_value(&self, other: &Self) -> bool {
                $(self.$idx.same_value(&other.$idx))&&+
            }
        })*
    };
}

tuple_same_value!((A 0), (A 0, B 1), (A 0, B 1, C 2), (A 0, B 1, C 2, D 3));
