//! Mapping browser `JsValue` errors into `PlannerError`.

use gloo_utils::errors::JsError;
use wasm_bindgen::JsValue;

/// (error name, message) of a thrown JS value
pub fn describe(value: JsValue) -> (String, String) {
    match JsError::try_from(value) {
        Ok(e) => (e.name, e.message),
        Err(not_error) => (String::new(), not_error.to_string()),
    }
}

pub fn is_abort(name: &str) -> bool {
    name == "AbortError"
}
