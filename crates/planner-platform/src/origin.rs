//! Page-origin helpers for resolving a same-origin API base.

use planner_types::{PlannerError, Result};

/// The page origin, e.g. `https://plan.example.com`.
pub fn page_origin() -> Result<String> {
    let window = web_sys::window().ok_or_else(|| PlannerError::JsInterop("no window".into()))?;
    window.location().origin().map_err(|e| {
        let (_, message) = crate::js::describe(e);
        PlannerError::JsInterop(message)
    })
}

/// A base starting with `/` is relative to the page; anything else is
/// already absolute.
pub fn resolve_base(base: &str, origin: &str) -> String {
    if base.starts_with('/') {
        format!("{}{}", origin.trim_end_matches('/'), base)
    } else {
        base.to_string()
    }
}

pub fn resolve_against_page(base: &str) -> Result<String> {
    if base.starts_with('/') {
        Ok(resolve_base(base, &page_origin()?))
    } else {
        Ok(base.to_string())
    }
}

/// Full page URL, used to pick up deep links on startup.
pub fn page_href() -> Result<String> {
    let window = web_sys::window().ok_or_else(|| PlannerError::JsInterop("no window".into()))?;
    window.location().href().map_err(|e| {
        let (_, message) = crate::js::describe(e);
        PlannerError::JsInterop(message)
    })
}
