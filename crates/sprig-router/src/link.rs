#![forbid(unsafe_code)]

//! Navigation helpers usable without a router handle.

use sprig_core::EventListener;
use sprig_dom::{Child, Host, MaterializeError, Materializer, PropValue, Props};

use crate::navigator::{Navigator, NavigatorError};
use crate::router::normalize_target;

/// Point `navigator` at `path`, made absolute first (`about` → `/about`).
///
/// This only writes the fragment. Rendering happens when the navigator
/// delivers its change notification.
pub fn navigate<V: Navigator>(navigator: &V, path: &str) -> Result<(), NavigatorError> {
    let target = normalize_target(path);
    tracing::debug!(path = %target, "navigate");
    navigator.set_fragment(&target)
}

/// An `<a>` element that navigates in-page.
///
/// The target is the `href` prop (default `/`). The rendered `href`
/// attribute is `#` + target so the link still works for middle-click and
/// new-tab. Clicking prevents the default action and calls [`navigate`]. Any
/// caller-supplied `onclick` is replaced; other props pass through.
///
/// # Errors
///
/// [`MaterializeError::InvalidPropertyValue`] when `href` is a listener or
/// style map, plus anything [`Materializer::h`] returns.
pub fn link<H, V, I>(
    materializer: &Materializer<H>,
    navigator: &V,
    mut props: Props,
    children: I,
) -> Result<H::Node, MaterializeError>
where
    H: Host,
    V: Navigator,
    I: IntoIterator<Item = Child<H::Node>>,
{
    let target = match props.remove("href") {
        None | Some(PropValue::Absent) => "/".to_owned(),
        Some(PropValue::Scalar(scalar)) => scalar.to_attribute_string(),
        Some(other) => {
            return Err(MaterializeError::InvalidPropertyValue {
                key: "href".to_owned(),
                found: other.type_name(),
            });
        }
    };

    props.retain(|key, _| !key.eq_ignore_ascii_case("onclick"));
    props.insert("href", format!("#{target}"));

    let navigator = navigator.clone();
    props.insert(
        "onclick",
        EventListener::new(move |event| {
            event.prevent_default();
            if let Err(err) = navigate(&navigator, &target) {
                tracing::warn!(%err, path = %target, "link navigation failed");
            }
        }),
    );

    materializer.h("a", props, children)
}
