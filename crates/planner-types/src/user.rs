use serde::{Deserialize, Serialize};

/// The slice of the user profile kept in the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

impl UserSummary {
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub preferences: Option<UserPreferences>,
}

impl From<&UserProfile> for UserSummary {
    fn from(p: &UserProfile) -> Self {
        Self {
            id: p.id.clone(),
            email: p.email.clone(),
            full_name: p.full_name.clone(),
            is_verified: p.is_verified,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub disliked_ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub household_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_servings: Option<u32>,
    /// Lowercase weekday name, e.g. "monday"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_start_day: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
