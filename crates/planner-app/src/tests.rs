#[cfg(test)]
mod tests {
    use crate::routes::*;

    // ─── Deep Link Tests ─────────────────────────────────────

    #[test]
    fn test_reset_password_link() {
        assert_eq!(
            parse_deep_link("https://plan.example.com/reset-password?token=abc"),
            Some(DeepLink::ResetPassword { token: "abc".to_string() })
        );
    }

    #[test]
    fn test_verify_email_link_with_trailing_slash() {
        assert_eq!(
            parse_deep_link("https://plan.example.com/verify-email/?token=t%2B1"),
            Some(DeepLink::VerifyEmail { token: "t+1".to_string() })
        );
    }

    #[test]
    fn test_draft_link() {
        assert_eq!(
            parse_deep_link("http://localhost:8080/drafts/42?token=sig&x=1"),
            Some(DeepLink::RecipeDraft {
                id: "42".to_string(),
                token: "sig".to_string(),
            })
        );
    }

    #[test]
    fn test_links_without_token_are_ignored() {
        assert_eq!(parse_deep_link("https://plan.example.com/reset-password"), None);
        assert_eq!(parse_deep_link("https://plan.example.com/reset-password?token="), None);
        assert_eq!(
            parse_deep_link("https://plan.example.com/drafts/42?refresh_token=abc"),
            None
        );
    }

    #[test]
    fn test_other_paths_are_ignored() {
        assert_eq!(parse_deep_link("https://plan.example.com/?token=abc"), None);
        assert_eq!(parse_deep_link("https://plan.example.com/recipes?token=abc"), None);
        assert_eq!(parse_deep_link("not a url"), None);
    }
}
