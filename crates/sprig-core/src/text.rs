#![forbid(unsafe_code)]

//! Conversion of values into text content.
//!
//! A [`TextValue`] either renders as a string or is a *hole*: a value that
//! contributes nothing. `bool` and `None` are holes, which lets
//! `show.then_some(label)` style expressions drop out of a child list.

use std::borrow::Cow;
use std::rc::Rc;

/// A value that can appear as text in the document.
pub trait TextValue {
    /// The rendered text, or `None` for a hole.
    fn to_text(&self) -> Option<String>;
}

impl TextValue for str {
    fn to_text(&self) -> Option<String> {
        Some(self.to_owned())
    }
}

impl TextValue for String {
    fn to_text(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl TextValue for Cow<'_, str> {
    fn to_text(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl TextValue for char {
    fn to_text(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl TextValue for bool {
    fn to_text(&self) -> Option<String> {
        None
    }
}

impl TextValue for () {
    fn to_text(&self) -> Option<String> {
        None
    }
}

impl<T: TextValue + ?Sized> TextValue for &T {
    fn to_text(&self) -> Option<String> {
        (**self).to_text()
    }
}

impl<T: TextValue + ?Sized> TextValue for Rc<T> {
    fn to_text(&self) -> Option<String> {
        (**self).to_text()
    }
}

impl<T: TextValue> TextValue for Option<T> {
    fn to_text(&self) -> Option<String> {
        self.as_ref().and_then(TextValue::to_text)
    }
}

macro_rules! integer_text {
    ($($t:ty),*) => {
        $(impl TextValue for $t {
            fn to_text(&self) -> Option<String> {
                Some(self.to_string())
            }
        })*
    };
}

integer_text!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl TextValue for f64 {
    fn to_text(&self) -> Option<String> {
        Some(format_number(*self))
    }
}

impl TextValue for f32 {
    fn to_text(&self) -> Option<String> {
        Some(format_number(f64::from(*self)))
    }
}

/// Format a number the way a document host displays it.
///
/// Integral values drop the fractional part (`1.0` → `"1"`), infinities
/// spell out `Infinity`, and negative zero prints as `"0"`. Magnitudes from
/// `1e21` up and below `1e-6` switch to exponent form with a signed exponent
/// (`1e+21`, `1.5e-7`).
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_owned()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if n == 0.0 {
        "0".to_owned()
    } else if (1e-6..1e21).contains(&n.abs()) {
        n.to_string()
    } else {
        let exp = format!("{n:e}");
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        }
    }
}
