//! Deep links the backend puts in emails and assistant replies.

use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeepLink {
    ResetPassword { token: String },
    VerifyEmail { token: String },
    /// A recipe the assistant drafted, opened with its signed token
    RecipeDraft { id: String, token: String },
}

/// Reads the page URL once at startup. Unknown paths, or links missing their
/// token, are not deep links.
pub fn parse_deep_link(href: &str) -> Option<DeepLink> {
    let url = Url::parse(href).ok()?;
    let token = url
        .query_pairs()
        .find(|(k, _)| k == "token")
        .map(|(_, v)| v.into_owned())
        .filter(|t| !t.is_empty())?;

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    match segments.as_slice() {
        ["reset-password"] => Some(DeepLink::ResetPassword { token }),
        ["verify-email"] => Some(DeepLink::VerifyEmail { token }),
        ["drafts", id] => Some(DeepLink::RecipeDraft {
            id: id.to_string(),
            token,
        }),
        _ => None,
    }
}
