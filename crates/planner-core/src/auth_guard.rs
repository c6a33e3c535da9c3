//! Decides when a failed request means the session is gone.

use crate::envelope::ResponseBody;

/// Canonical error types that mean "your credentials are no longer valid"
const EXPIRY_ERROR_TYPES: [&str; 2] = ["unauthorized", "token_expired"];

/// Query parameter carrying a signed draft token
const DRAFT_TOKEN_PARAM: &str = "token";

pub struct AuthCheck<'a> {
    pub status: u16,
    pub body: &'a ResponseBody,
    /// Whether the session held a user when the request was made
    pub was_ever_authenticated: bool,
    /// Request path, including its query string
    pub path: &'a str,
}

pub fn should_force_logout(check: &AuthCheck<'_>) -> bool {
    if is_draft_token_path(check.path) {
        return false;
    }
    if check.status == 401 {
        return check.was_ever_authenticated;
    }
    match check.body.error_type() {
        Some(t) if EXPIRY_ERROR_TYPES.contains(&t) => check.was_ever_authenticated,
        _ => false,
    }
}

/// `true` when the query string has a parameter named exactly `token`.
/// `refresh_token=...` or `tokenize=...` do not count.
pub fn is_draft_token_path(path: &str) -> bool {
    let Some((_, query)) = path.split_once('?') else {
        return false;
    };
    let query = query.split('#').next().unwrap_or_default();
    url::form_urlencoded::parse(query.as_bytes()).any(|(name, _)| name == DRAFT_TOKEN_PARAM)
}
