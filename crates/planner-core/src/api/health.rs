use planner_types::Result;
use serde::Deserialize;

use super::endpoint;
use crate::client::ApiClient;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.as_str(), "ok" | "healthy")
    }
}

pub async fn check(client: &ApiClient) -> Result<HealthStatus> {
    let status: Option<HealthStatus> = client.get(&endpoint("/health")).await?;
    Ok(status.unwrap_or_default())
}
