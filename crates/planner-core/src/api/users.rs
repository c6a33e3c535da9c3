use planner_types::{
    user::{UserPreferences, UserProfile, UserSummary, UserUpdate},
    Result,
};

use super::endpoint;
use crate::client::ApiClient;

pub async fn me(client: &ApiClient) -> Result<UserProfile> {
    client.get(&endpoint("/users/me")).await
}

/// Update the profile and keep the session's copy of the user in step.
pub async fn update_me(client: &ApiClient, changes: &UserUpdate) -> Result<UserProfile> {
    let profile: UserProfile = client.patch(&endpoint("/users/me"), changes).await?;
    client.session().set_user(UserSummary::from(&profile)).await?;
    Ok(profile)
}

pub async fn get_preferences(client: &ApiClient) -> Result<UserPreferences> {
    let prefs: Option<UserPreferences> = client.get(&endpoint("/users/me/preferences")).await?;
    Ok(prefs.unwrap_or_default())
}

pub async fn update_preferences(client: &ApiClient, prefs: &UserPreferences) -> Result<UserPreferences> {
    client.post(&endpoint("/users/me/preferences"), prefs).await
}
