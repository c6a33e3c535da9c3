use serde::{Deserialize, Serialize};

use crate::{PlannerError, Result};

/// Backend used when no base URL is configured in development and test builds
pub const DEV_API_BASE: &str = "http://localhost:8000";

/// Top-level client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_base: Option<String>,
    pub mode: BuildMode,
    pub storage: StorageConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            mode: BuildMode::Development,
            storage: StorageConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Read the base URL and build mode baked in at compile time.
    pub fn from_build_env() -> Self {
        let mode = if cfg!(debug_assertions) {
            BuildMode::Development
        } else {
            BuildMode::Production
        };
        Self {
            api_base: option_env!("PLANNER_API_BASE_URL").map(String::from),
            mode,
            storage: StorageConfig::default(),
        }
    }

    /// The backend base URL, without a trailing slash.
    ///
    /// Only development and test builds may fall back to [`DEV_API_BASE`];
    /// a production build with no configured base URL is an error.
    pub fn resolve_base_url(&self) -> Result<String> {
        match self.api_base.as_deref().map(str::trim) {
            Some(base) if !base.is_empty() => Ok(base.trim_end_matches('/').to_string()),
            _ if self.mode.allows_dev_fallback() => Ok(DEV_API_BASE.to_string()),
            _ => Err(PlannerError::Config(
                "PLANNER_API_BASE_URL must be set for production builds".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildMode {
    Development,
    Test,
    Production,
}

impl BuildMode {
    pub fn allows_dev_fallback(&self) -> bool {
        matches!(self, BuildMode::Development | BuildMode::Test)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackendType,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendType::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackendType {
    /// Auto-detect best available backend
    Auto,
    LocalStorage,
    Memory,
}
