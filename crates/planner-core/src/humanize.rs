//! Turns backend and transport errors into sentences fit for the UI.
//!
//! Resolution order: canonical error type → message patterns → HTTP status
//! → contextual rewrite for the action being performed. Messages are
//! sanitized first so identifiers, stack traces and SQL never reach the user.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use planner_types::{ApiError, PlannerError};
use regex::Regex;
use serde_json::Value;

use crate::envelope::ResponseBody;

/// Too generic to say anything useful; falls through to the message text
const GENERIC_ERROR_TYPE: &str = "domain_error";
const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";
const MAX_PRESENTABLE_LEN: usize = 200;

/// What the user was doing when the error happened
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorContext {
    pub action: Option<String>,
    pub resource: Option<String>,
    pub field: Option<String>,
}

impl ErrorContext {
    pub fn action(action: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            ..Default::default()
        }
    }

    pub fn resource(resource: impl Into<String>) -> Self {
        Self {
            resource: Some(resource.into()),
            ..Default::default()
        }
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    fn is_action(&self, action: &str) -> bool {
        self.action.as_deref() == Some(action)
    }

    fn resource_name(&self) -> &str {
        self.resource.as_deref().unwrap_or("item")
    }
}

/// The parts of an error the humanizer looks at
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorFacts {
    pub message: String,
    pub status: Option<u16>,
    pub error_type: Option<String>,
}

impl From<&str> for ErrorFacts {
    fn from(message: &str) -> Self {
        Self {
            message: message.to_string(),
            ..Default::default()
        }
    }
}

impl From<&String> for ErrorFacts {
    fn from(message: &String) -> Self {
        Self::from(message.as_str())
    }
}

impl From<&Value> for ErrorFacts {
    fn from(value: &Value) -> Self {
        if let Some(text) = value.as_str() {
            return Self::from(text);
        }
        let status = value
            .get("status")
            .or_else(|| value.get("status_code"))
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok());
        let body = ResponseBody::from_value(value.clone());
        Self {
            message: body.error_message().unwrap_or_default(),
            status,
            error_type: body.error_type().map(String::from),
        }
    }
}

impl From<&ApiError> for ErrorFacts {
    fn from(e: &ApiError) -> Self {
        Self {
            message: e.message.clone(),
            status: e.status,
            error_type: e.error_type.clone(),
        }
    }
}

impl From<&PlannerError> for ErrorFacts {
    fn from(e: &PlannerError) -> Self {
        match e {
            PlannerError::Api(api) => api.into(),
            PlannerError::Network(detail) => Self {
                message: format!("network error: {}", detail),
                status: None,
                error_type: Some("network_error".to_string()),
            },
            PlannerError::Cancelled => Self {
                message: String::new(),
                status: None,
                error_type: Some("cancelled".to_string()),
            },
            other => Self::from(other.to_string().as_str()),
        }
    }
}

/// Map any error to a non-empty, sanitized, user-facing sentence.
pub fn user_friendly_message(
    error: impl Into<ErrorFacts>,
    context: Option<&ErrorContext>,
) -> String {
    let facts = error.into();
    let ctx_default = ErrorContext::default();
    let ctx = context.unwrap_or(&ctx_default);
    let sanitized = sanitize_message(&facts.message);

    let base = facts
        .error_type
        .as_deref()
        .filter(|t| *t != GENERIC_ERROR_TYPE)
        .and_then(|t| message_for_error_type(t, ctx))
        .or_else(|| match_patterns(&sanitized, ctx))
        .or_else(|| facts.status.and_then(|s| message_for_status(s, ctx)))
        .or_else(|| presentable(&sanitized))
        .unwrap_or_else(|| GENERIC_MESSAGE.to_string());

    rewrite_for_action(base, &sanitized, facts.status, ctx)
}

// ─── Sanitization ────────────────────────────────────────────

static PY_TRACEBACK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Traceback \(most recent call last\):.*$").expect("valid regex"));
static PY_FRAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^\s*File\s+"[^"]*",\s+line\s+\d+.*$"#).expect("valid regex"));
static JS_FRAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*at\s+(?:[^()\n]*\()?[^\s()]+:\d+:\d+\)?\s*$").expect("valid regex")
});
static CORRELATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[\(\[]?\b(correlation|request|trace)[_\s-]?id\b\s*[:=#]?\s*[\w-]*[\)\]]?").expect("valid regex")
});
static UUID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}\b").expect("valid regex")
});
static INTERNAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\bSELECT\s.+\sFROM\b|\bINSERT\s+INTO\b|\bUPDATE\s+\S+\s+SET\b|\bDELETE\s+FROM\b|sqlalchemy|psycopg|asyncpg|IntegrityError|OperationalError|ProgrammingError|Internal Server Error|NoneType|KeyError|AttributeError|\(Background on this error",
    )
    .expect("valid regex")
});
static EMPTY_BRACKETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\s*\)|\[\s*\]").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Strip stack traces, identifiers and internal detail from a message.
/// Returns an empty string when nothing safe remains.
pub fn sanitize_message(message: &str) -> String {
    if INTERNAL.is_match(message) {
        return String::new();
    }
    let text = PY_TRACEBACK.replace_all(message, "");
    let text = PY_FRAME.replace_all(&text, "");
    let text = JS_FRAME.replace_all(&text, "");
    let text = CORRELATION.replace_all(&text, "");
    let text = UUID.replace_all(&text, "");
    let text = EMPTY_BRACKETS.replace_all(&text, "");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim()
        .trim_matches(|c: char| c == ':' || c == ',' || c == '-' || c.is_whitespace())
        .to_string()
}

fn presentable(sanitized: &str) -> Option<String> {
    let ok = !sanitized.is_empty()
        && sanitized.len() <= MAX_PRESENTABLE_LEN
        && !sanitized.starts_with('{')
        && !sanitized.starts_with('<');
    ok.then(|| sanitized.to_string())
}

// ─── Lookup tables ───────────────────────────────────────────

fn message_for_error_type(error_type: &str, ctx: &ErrorContext) -> Option<String> {
    let msg = match error_type {
        "validation_error" => return Some(validation_message(ctx)),
        "not_found" => return Some(not_found_message(ctx)),
        "conflict" | "duplicate" | "already_exists" => return Some(conflict_message(ctx)),
        "unauthorized" | "not_authenticated" => "Please log in to continue.",
        "token_expired" => "Your session has expired. Please log in again.",
        "forbidden" | "permission_denied" => "You don't have permission to do that.",
        "invalid_credentials" => "Incorrect email or password. Please try again.",
        "email_not_verified" => "Please verify your email address before logging in.",
        "rate_limited" | "rate_limit_exceeded" => {
            "You're doing that too often. Please wait a moment and try again."
        }
        "network_error" => {
            "Unable to reach the server. Check your internet connection and try again."
        }
        "cancelled" => "The request was cancelled.",
        "bad_request" => "The request couldn't be processed. Please check your input and try again.",
        "internal_error" | "server_error" => {
            "Something went wrong on our end. Please try again in a moment."
        }
        "service_unavailable" => "The service is temporarily unavailable. Please try again shortly.",
        _ => return None,
    };
    Some(msg.to_string())
}

fn message_for_status(status: u16, ctx: &ErrorContext) -> Option<String> {
    let msg = match status {
        400 => "The request couldn't be processed. Please check your input and try again.",
        401 => "Please log in to continue.",
        403 => "You don't have permission to do that.",
        404 => return Some(not_found_message(ctx)),
        408 => "The request timed out. Please try again.",
        409 => return Some(conflict_message(ctx)),
        413 => "That upload is too large.",
        422 => return Some(validation_message(ctx)),
        429 => "You're doing that too often. Please wait a moment and try again.",
        500 => "Something went wrong on our end. Please try again in a moment.",
        502..=504 => "The service is temporarily unavailable. Please try again shortly.",
        _ => return None,
    };
    Some(msg.to_string())
}

fn not_found_message(ctx: &ErrorContext) -> String {
    format!("We couldn't find that {}.", ctx.resource_name())
}

fn conflict_message(ctx: &ErrorContext) -> String {
    format!("That {} already exists.", ctx.resource_name())
}

fn validation_message(ctx: &ErrorContext) -> String {
    match ctx.field.as_deref() {
        Some(field) => format!("Please check the {} field and try again.", field.replace('_', " ")),
        None => "Some of the information you entered is invalid. Please check and try again."
            .to_string(),
    }
}

// ─── Message patterns ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    InvalidCredentials,
    SessionExpired,
    NotAuthenticated,
    EmailNotVerified,
    Forbidden,
    RateLimited,
    Network,
    AlreadyExists,
    NotFound,
    RequiredField,
    InvalidEmail,
    WeakPassword,
    Validation,
}

static PATTERNS: Lazy<Vec<(Family, Regex)>> = Lazy::new(|| {
    [
        (Family::InvalidCredentials, r"(?i)\b(invalid|incorrect|wrong|bad)\s+((email|username)\s+or\s+password|password|credentials|login)\b|\b(email|username)\s+or\s+password\s+(is\s+)?(incorrect|invalid|wrong)"),
        (Family::SessionExpired, r"(?i)\b(token|session|signature)\s+(has\s+)?expired\b"),
        (Family::NotAuthenticated, r"(?i)not\s+authenticated|could\s+not\s+validate\s+credentials|\bunauthori[sz]ed\b"),
        (Family::EmailNotVerified, r"(?i)\b(email|account)\s+(is\s+)?not\s+(yet\s+)?verified|verify\s+your\s+email"),
        (Family::Forbidden, r"(?i)\bforbidden\b|permission\s+denied|not\s+(allowed|permitted)|insufficient\s+permissions"),
        (Family::RateLimited, r"(?i)rate[\s_-]?limit|too\s+many\s+requests|slow\s+down"),
        (Family::Network, r"(?i)network\s*error|failed\s+to\s+fetch|load\s+failed|connection\s+(refused|reset|closed)|timed?\s*out|unreachable|\boffline\b"),
        (Family::AlreadyExists, r"(?i)already\s+(exists|registered|taken|in\s+use)|\bduplicate\b"),
        (Family::NotFound, r"(?i)not\s+found|does\s+not\s+exist|no\s+such\b"),
        (Family::RequiredField, r"(?i)field\s+required|is\s+required|missing\s+(required\s+)?field"),
        (Family::InvalidEmail, r"(?i)(not\s+a\s+)?valid\s+email|invalid\s+email|email\s+address\s+is\s+invalid"),
        (Family::WeakPassword, r"(?i)password\s+(must|should|needs|is\s+too\s+(short|weak))|at\s+least\s+\d+\s+characters"),
        (Family::Validation, r"(?i)validation\s+(error|failed)|invalid\s+(input|value|data|request)|unprocessable"),
    ]
    .into_iter()
    .map(|(family, pattern)| (family, Regex::new(pattern).expect("valid regex")))
    .collect()
});

fn match_patterns(sanitized: &str, ctx: &ErrorContext) -> Option<String> {
    if sanitized.is_empty() {
        return None;
    }
    let family = PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(sanitized))
        .map(|(family, _)| *family)?;
    let msg = match family {
        Family::InvalidCredentials => "Incorrect email or password. Please try again.",
        Family::SessionExpired => "Your session has expired. Please log in again.",
        Family::NotAuthenticated => "Please log in to continue.",
        Family::EmailNotVerified => "Please verify your email address before logging in.",
        Family::Forbidden => "You don't have permission to do that.",
        Family::RateLimited => "You're doing that too often. Please wait a moment and try again.",
        Family::Network => {
            "Unable to reach the server. Check your internet connection and try again."
        }
        Family::AlreadyExists => return Some(conflict_message(ctx)),
        Family::NotFound => return Some(not_found_message(ctx)),
        Family::RequiredField => "Please fill in all required fields.",
        Family::InvalidEmail => "Please enter a valid email address.",
        Family::WeakPassword => {
            "Your password doesn't meet the requirements. Use at least 8 characters."
        }
        Family::Validation => return Some(validation_message(ctx)),
    };
    Some(msg.to_string())
}

fn rewrite_for_action(
    base: String,
    sanitized: &str,
    status: Option<u16>,
    ctx: &ErrorContext,
) -> String {
    let lower = sanitized.to_lowercase();
    if ctx.is_action("register")
        && (lower.contains("already exists") || lower.contains("already registered"))
    {
        return "An account with this email already exists. Try logging in, or reset your password if you've forgotten it.".to_string();
    }
    if ctx.is_action("login") {
        let credential_related = status == Some(401)
            || lower.contains("password")
            || lower.contains("credentials")
            || lower.contains("username");
        if credential_related {
            return "Incorrect email or password. Please try again.".to_string();
        }
    }
    base
}

// ─── Validation details ──────────────────────────────────────

/// Field name → message for a 422 response, for annotating form inputs.
pub fn field_errors(error: &ApiError) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    let Some(body) = error.body.clone() else {
        return fields;
    };
    if let ResponseBody::Validation(issues) = ResponseBody::from_value(body) {
        for issue in issues {
            if let Some(field) = issue.field() {
                fields
                    .entry(field.to_string())
                    .or_insert_with(|| issue.msg.clone());
            }
        }
    }
    fields
}

// ─── Retry policy ────────────────────────────────────────────

/// Advisory retry data for a failed status; nothing here schedules retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub can_retry: bool,
    pub suggested_delay_ms: Option<u32>,
    pub max_retries: Option<u32>,
}

impl RetryPolicy {
    const NONE: RetryPolicy = RetryPolicy {
        can_retry: false,
        suggested_delay_ms: None,
        max_retries: None,
    };

    const fn retryable(delay_ms: u32, max_retries: u32) -> Self {
        Self {
            can_retry: true,
            suggested_delay_ms: Some(delay_ms),
            max_retries: Some(max_retries),
        }
    }
}

pub fn retry_policy(status: u16) -> RetryPolicy {
    match status {
        429 => RetryPolicy::retryable(5000, 3),
        408 | 502 | 503 | 504 => RetryPolicy::retryable(2000, 3),
        500 => RetryPolicy::retryable(1000, 2),
        _ => RetryPolicy::NONE,
    }
}
