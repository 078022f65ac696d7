//! Small `Reflect` helpers for APIs `web-sys` does not cover on every browser.

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, NodeList};

/// Whether `target` has a property called `name` (own or inherited).
pub(crate) fn has_property(target: &JsValue, name: &str) -> bool {
    Reflect::has(target, &JsValue::from_str(name)).unwrap_or(false)
}

/// Method `name` of `target`, if it is callable.
pub(crate) fn method(target: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

/// Numeric property, if present.
pub(crate) fn number(target: &JsValue, name: &str) -> Option<f64> {
    Reflect::get(target, &JsValue::from_str(name)).ok()?.as_f64()
}

/// Boolean property; absent or non-boolean reads as `false`.
pub(crate) fn flag(target: &JsValue, name: &str) -> bool {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|value| value.as_bool())
        .unwrap_or(false)
}

/// Plain object literal.
pub(crate) fn object(entries: &[(&str, JsValue)]) -> Object {
    let obj = Object::new();
    for (key, value) in entries {
        let _ = Reflect::set(&obj, &JsValue::from_str(key), value);
    }
    obj
}

/// `element.focus({ preventScroll: true })`.
pub(crate) fn focus_without_scroll(element: &Element) -> bool {
    let Some(focus) = method(element, "focus") else {
        return false;
    };
    let options = object(&[("preventScroll", JsValue::from_bool(true))]);
    focus.call1(element, &options).is_ok()
}

/// Elements of a node list, in document order.
pub(crate) fn elements(list: &NodeList) -> impl Iterator<Item = Element> + '_ {
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
}

/// Readable message for a thrown value.
pub(crate) fn describe(err: &JsValue) -> String {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
