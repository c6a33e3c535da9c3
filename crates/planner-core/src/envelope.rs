//! Response body decoding and error normalization.
//!
//! Bodies are read as text and decoded once into [`ResponseBody`]; success
//! checks and error messages are derived from that value instead of probing
//! raw JSON at every call site.

use planner_types::{
    ApiError,
    envelope::{ApiEnvelope, ValidationIssue},
};
use serde_json::Value;

/// Every body shape the backend is known to send
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Zero-length (or whitespace) body, e.g. 204
    Empty,
    /// Canonical `{success, data, message, error}`
    Envelope(ApiEnvelope),
    /// Legacy `{detail: "..."}`
    Detail(String),
    /// FastAPI 422 `{detail: [{loc, msg, type}]}`
    Validation(Vec<ValidationIssue>),
    /// Valid JSON of any other shape
    Unrecognized(Value),
    /// Not JSON at all (proxy error pages and the like)
    Text(String),
}

impl ResponseBody {
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return ResponseBody::Empty;
        }
        match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => Self::from_value(value),
            Err(_) => ResponseBody::Text(trimmed.to_string()),
        }
    }

    pub fn from_value(value: Value) -> Self {
        if value.get("success").is_some_and(Value::is_boolean) {
            return match serde_json::from_value::<ApiEnvelope>(value.clone()) {
                Ok(envelope) => ResponseBody::Envelope(envelope),
                Err(_) => ResponseBody::Unrecognized(value),
            };
        }
        match value.get("detail") {
            Some(Value::String(detail)) => ResponseBody::Detail(detail.clone()),
            Some(Value::Array(entries)) => {
                match serde_json::from_value::<Vec<ValidationIssue>>(Value::Array(entries.clone())) {
                    Ok(issues) => ResponseBody::Validation(issues),
                    Err(_) => ResponseBody::Unrecognized(value),
                }
            }
            _ => ResponseBody::Unrecognized(value),
        }
    }

    /// `true` for any body that explicitly reports `success: false`, even
    /// one whose `error` does not fit the canonical envelope.
    pub fn reports_failure(&self) -> bool {
        match self {
            ResponseBody::Envelope(env) => !env.success,
            ResponseBody::Unrecognized(value) => value.get("success") == Some(&Value::Bool(false)),
            _ => false,
        }
    }

    /// Canonical `error.type`, when present.
    pub fn error_type(&self) -> Option<&str> {
        match self {
            ResponseBody::Envelope(env) => env.error.as_ref()?.error_type.as_deref(),
            ResponseBody::Unrecognized(value) => value.get("error")?.get("type")?.as_str(),
            _ => None,
        }
    }

    pub fn correlation_id(&self) -> Option<&str> {
        match self {
            ResponseBody::Envelope(env) => env.error.as_ref()?.correlation_id.as_deref(),
            ResponseBody::Unrecognized(value) => value
                .get("error")
                .and_then(|e| e.get("correlation_id"))
                .or_else(|| value.get("correlation_id"))?
                .as_str(),
            _ => None,
        }
    }

    /// Human-readable failure message, in priority order:
    /// `error.message` → `message` → `detail` → nothing.
    pub fn error_message(&self) -> Option<String> {
        let found = match self {
            ResponseBody::Envelope(env) => env
                .error
                .as_ref()
                .and_then(|e| e.message.clone())
                .or_else(|| env.message.clone()),
            ResponseBody::Detail(detail) => Some(detail.clone()),
            ResponseBody::Validation(issues) => issues.first().map(|i| i.msg.clone()),
            ResponseBody::Unrecognized(value) => message_from_value(value),
            ResponseBody::Empty | ResponseBody::Text(_) => None,
        };
        found.filter(|m| !m.trim().is_empty())
    }

    /// Payload handed back to callers on success.
    pub fn into_data(self) -> Value {
        match self {
            ResponseBody::Empty => Value::Null,
            ResponseBody::Envelope(env) => env.data.unwrap_or(Value::Null),
            ResponseBody::Text(text) => Value::String(text),
            other => other.to_value().unwrap_or(Value::Null),
        }
    }

    /// JSON form of the body, for attaching to an [`ApiError`].
    pub fn to_value(&self) -> Option<Value> {
        match self {
            ResponseBody::Empty | ResponseBody::Text(_) => None,
            ResponseBody::Envelope(env) => serde_json::to_value(env).ok(),
            ResponseBody::Detail(detail) => Some(serde_json::json!({ "detail": detail })),
            ResponseBody::Validation(issues) => Some(serde_json::json!({ "detail": issues })),
            ResponseBody::Unrecognized(value) => Some(value.clone()),
        }
    }
}

fn message_from_value(value: &Value) -> Option<String> {
    let structured = match value.get("error") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(err) => err.get("message").and_then(Value::as_str).map(String::from),
        None => None,
    };
    structured
        .or_else(|| value.get("message").and_then(Value::as_str).map(String::from))
        .or_else(|| match value.get("detail") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Array(entries)) => entries
                .first()
                .and_then(|e| e.get("msg"))
                .and_then(Value::as_str)
                .map(String::from),
            Some(detail) => detail.get("message").and_then(Value::as_str).map(String::from),
            None => None,
        })
}

/// A response counts as successful only if the status is 2xx and the body
/// does not carry `success: false`.
pub fn is_success(status: u16, body: &ResponseBody) -> bool {
    (200..300).contains(&status) && !body.reports_failure()
}

pub fn normalize_error(status: u16, body: &ResponseBody) -> ApiError {
    ApiError {
        message: body
            .error_message()
            .unwrap_or_else(|| format!("Request failed ({})", status)),
        status: Some(status),
        error_type: body.error_type().map(String::from),
        correlation_id: body.correlation_id().map(String::from),
        body: body.to_value(),
    }
}
