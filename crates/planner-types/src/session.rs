use serde::{Deserialize, Serialize};
use crate::user::UserSummary;

/// Persisted authentication state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserSummary>,
}

impl Session {
    pub fn new(token: impl Into<String>, user: UserSummary) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

/// Why a session ended. Expired sessions get a "please log in again" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoutReason {
    Manual,
    Expired,
}

impl LogoutReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogoutReason::Manual => "manual",
            LogoutReason::Expired => "expired",
        }
    }
}
